//! Hardware seam - discrete lines and the byte-exchange primitive.
//!
//! The transport never touches registers itself. Board support code (or a
//! scripted peer in tests) implements:
//!
//! - [`Pins`] - set/clear/read on the four lines wired to the peer
//! - [`ByteExchange`] - a full-duplex, in-place SPI transfer
//!
//! All four lines are active-low on the wire; the transport translates
//! "assert" to [`Pins::clear`] and "release" to [`Pins::set`].

use std::io;

/// Discrete lines between host and peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    /// Host-ready (MRDY), driven by the host.
    HostReady,
    /// Peer-ready (SRDY), driven by the peer.
    PeerReady,
    /// SPI chip select, driven by the host.
    ChipSelect,
    /// Peer reset, driven by the host.
    Reset,
}

/// Logic level of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Driven or read low.
    Low,
    /// Driven or read high.
    High,
}

impl Level {
    /// Level that means "asserted" on an active-low line.
    pub const ASSERTED: Level = Level::Low;
    /// Level that means "released" on an active-low line.
    pub const RELEASED: Level = Level::High;
}

/// Digital I/O on the lines wired to the peer.
pub trait Pins {
    /// Drive `line` high.
    fn set(&mut self, line: Line);

    /// Drive `line` low.
    fn clear(&mut self, line: Line);

    /// Sample the current level of `line`.
    fn read(&mut self, line: Line) -> Level;
}

/// Synchronous full-duplex byte exchange.
///
/// `buf` is clocked out and overwritten in place with the bytes clocked in.
pub trait ByteExchange {
    /// Exchange `buf.len()` bytes with the peer.
    fn exchange(&mut self, buf: &mut [u8]) -> io::Result<()>;
}

impl<T: Pins + ?Sized> Pins for &mut T {
    fn set(&mut self, line: Line) {
        (**self).set(line)
    }

    fn clear(&mut self, line: Line) {
        (**self).clear(line)
    }

    fn read(&mut self, line: Line) -> Level {
        (**self).read(line)
    }
}

impl<T: ByteExchange + ?Sized> ByteExchange for &mut T {
    fn exchange(&mut self, buf: &mut [u8]) -> io::Result<()> {
        (**self).exchange(buf)
    }
}

impl<T: Pins + ?Sized> Pins for Box<T> {
    fn set(&mut self, line: Line) {
        (**self).set(line)
    }

    fn clear(&mut self, line: Line) {
        (**self).clear(line)
    }

    fn read(&mut self, line: Line) -> Level {
        (**self).read(line)
    }
}

impl<T: ByteExchange + ?Sized> ByteExchange for Box<T> {
    fn exchange(&mut self, buf: &mut [u8]) -> io::Result<()> {
        (**self).exchange(buf)
    }
}
