//! Wire format encoding and decoding.
//!
//! Every NPI frame starts with a 3-byte header:
//! ```text
//! ┌──────────┬──────────┬──────────┬─────────────────┐
//! │ Length   │ CMD0     │ CMD1     │ Payload         │
//! │ 1 byte   │ 1 byte   │ 1 byte   │ Length bytes    │
//! └──────────┴──────────┴──────────┴─────────────────┘
//! ```
//!
//! The command identifier is sent high byte (CMD0) first. CMD0 carries the
//! frame type in bits 5-6 and the subsystem in bits 0-4; CMD1 is the opcode.

use std::fmt;

use crate::error::{Result, ZnpError};

/// Header size in bytes (fixed, exactly 3).
pub const HEADER_SIZE: usize = 3;

/// Receive capacity of a single frame payload.
pub const MAX_PAYLOAD_SIZE: usize = 100;

/// Bit masks for the CMD0 byte.
pub mod cmd0 {
    /// Frame type field (bits 5-6).
    pub const TYPE_MASK: u8 = 0b0110_0000;
    /// Shift of the frame type field.
    pub const TYPE_SHIFT: u8 = 5;
    /// Subsystem field (bits 0-4).
    pub const SUBSYSTEM_MASK: u8 = 0b0001_1111;
}

/// Role of a frame on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    /// Host asks the peer for queued data.
    Poll,
    /// Synchronous request (SREQ).
    Request,
    /// Asynchronous, peer-initiated indication (AREQ).
    Indication,
    /// Synchronous response (SRSP).
    Response,
}

impl FrameType {
    fn bits(self) -> u8 {
        match self {
            FrameType::Poll => 0,
            FrameType::Request => 1,
            FrameType::Indication => 2,
            FrameType::Response => 3,
        }
    }

    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => FrameType::Poll,
            1 => FrameType::Request,
            2 => FrameType::Indication,
            _ => FrameType::Response,
        }
    }
}

/// Peer subsystem addressed by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    /// RPC error reporting.
    RpcError,
    /// System interface (reset, version, NV memory).
    Sys,
    /// MAC layer.
    Mac,
    /// Network layer.
    Nwk,
    /// Application framework.
    Af,
    /// ZigBee device objects.
    Zdo,
    /// Simple API.
    Sapi,
    /// Utilities.
    Util,
    /// Debug interface.
    Debug,
    /// Application interface.
    App,
}

impl Subsystem {
    /// Raw 5-bit subsystem number.
    pub fn bits(self) -> u8 {
        match self {
            Subsystem::RpcError => 0,
            Subsystem::Sys => 1,
            Subsystem::Mac => 2,
            Subsystem::Nwk => 3,
            Subsystem::Af => 4,
            Subsystem::Zdo => 5,
            Subsystem::Sapi => 6,
            Subsystem::Util => 7,
            Subsystem::Debug => 8,
            Subsystem::App => 9,
        }
    }

    /// Subsystem for a raw 5-bit number, if the peer defines one.
    pub fn from_bits(bits: u8) -> Option<Self> {
        Some(match bits {
            0 => Subsystem::RpcError,
            1 => Subsystem::Sys,
            2 => Subsystem::Mac,
            3 => Subsystem::Nwk,
            4 => Subsystem::Af,
            5 => Subsystem::Zdo,
            6 => Subsystem::Sapi,
            7 => Subsystem::Util,
            8 => Subsystem::Debug,
            9 => Subsystem::App,
            _ => return None,
        })
    }
}

/// 16-bit command identifier as carried in CMD0/CMD1.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(u16);

impl CommandId {
    /// Wrap a raw identifier.
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Compose an identifier from its fields.
    pub fn from_parts(frame_type: FrameType, subsystem: Subsystem, opcode: u8) -> Self {
        let cmd0 = (frame_type.bits() << cmd0::TYPE_SHIFT) | subsystem.bits();
        Self(u16::from_be_bytes([cmd0, opcode]))
    }

    /// Raw 16-bit value.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// High byte (CMD0).
    #[inline]
    pub fn cmd0(self) -> u8 {
        self.0.to_be_bytes()[0]
    }

    /// Low byte (CMD1), the opcode.
    #[inline]
    pub fn opcode(self) -> u8 {
        self.0.to_be_bytes()[1]
    }

    /// Frame type field.
    #[inline]
    pub fn frame_type(self) -> FrameType {
        FrameType::from_bits((self.cmd0() & cmd0::TYPE_MASK) >> cmd0::TYPE_SHIFT)
    }

    /// Raw subsystem bits.
    #[inline]
    pub fn subsystem_bits(self) -> u8 {
        self.cmd0() & cmd0::SUBSYSTEM_MASK
    }

    /// Decoded subsystem, if known.
    pub fn subsystem(self) -> Option<Subsystem> {
        Subsystem::from_bits(self.subsystem_bits())
    }

    /// Same subsystem and opcode with a different frame type.
    pub fn with_frame_type(self, frame_type: FrameType) -> Self {
        let cmd0 = (self.cmd0() & !cmd0::TYPE_MASK) | (frame_type.bits() << cmd0::TYPE_SHIFT);
        Self(u16::from_be_bytes([cmd0, self.opcode()]))
    }

    /// The SRSP identifier answering this request.
    #[inline]
    pub fn response(self) -> Self {
        self.with_frame_type(FrameType::Response)
    }

    /// Whether both identifiers address the same subsystem and opcode.
    pub fn same_operation(self, other: CommandId) -> bool {
        self.subsystem_bits() == other.subsystem_bits() && self.opcode() == other.opcode()
    }
}

impl fmt::Debug for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommandId({:#06X})", self.0)
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06X}", self.0)
    }
}

impl From<u16> for CommandId {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

/// Decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Payload length in bytes as declared on the wire.
    pub length: u8,
    /// Command identifier.
    pub command: CommandId,
}

impl Header {
    /// Create a new header.
    pub fn new(length: u8, command: CommandId) -> Self {
        Self { length, command }
    }

    /// Encode header to bytes (identifier high byte first).
    ///
    /// # Example
    ///
    /// ```
    /// use znp_client::protocol::{CommandId, Header};
    ///
    /// let bytes = Header::new(2, CommandId::new(0x2605)).encode();
    /// assert_eq!(bytes, [0x02, 0x26, 0x05]);
    /// ```
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let [hi, lo] = self.command.raw().to_be_bytes();
        [self.length, hi, lo]
    }

    /// Decode a header from exactly three bytes.
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        Self {
            length: bytes[0],
            command: CommandId::new(u16::from_be_bytes([bytes[1], bytes[2]])),
        }
    }

    /// Decode header from a buffer.
    ///
    /// Returns `None` if buffer is too short.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        let bytes: &[u8; HEADER_SIZE] = buf.get(..HEADER_SIZE)?.try_into().ok()?;
        Some(Self::from_bytes(bytes))
    }

    /// Reject lengths that would overflow the receive buffer.
    pub fn validate(&self) -> Result<()> {
        let length = self.payload_len();
        if length > MAX_PAYLOAD_SIZE {
            return Err(ZnpError::FrameTooLarge {
                length,
                capacity: MAX_PAYLOAD_SIZE,
            });
        }
        Ok(())
    }

    /// Declared payload length.
    #[inline]
    pub fn payload_len(&self) -> usize {
        usize::from(self.length)
    }
}
