//! Scripted ZNP peer for integration tests.
//!
//! Plays the device side of the SPI handshake: answers requests from a
//! reply queue, raises queued indications on the ready line, and records
//! every request and transfer it sees.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use znp_client::hal::{ByteExchange, Level, Line, Pins};
use znp_client::protocol::{build_frame, CommandId};
use znp_client::zstack::SimpleApi;
use znp_client::NpiTransport;

/// Handshake timeout used by every scripted test.
pub const TEST_TIMEOUT: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Idle,
    /// Request header seen, payload of this length still to come.
    Writing { command: u16, remaining: usize },
    /// Request complete, reply not yet read.
    ReplyReady,
    /// Header sent, these payload bytes still to clock out.
    Reading(Vec<u8>),
}

/// Device side of the link.
pub struct ScriptedPeer {
    mode: Mode,
    host_ready: bool,
    in_reset: bool,
    /// Never answer the handshake.
    pub silent: bool,
    replies: VecDeque<Vec<u8>>,
    indications: VecDeque<Vec<u8>>,
    boot_frame: Option<Vec<u8>>,
    triggers: Vec<(u16, Vec<u8>)>,
    /// Requests received, as (command id, payload).
    pub requests: Vec<(u16, Vec<u8>)>,
    /// Length of every transfer, in order.
    pub exchanges: Vec<usize>,
    /// Number of line writes, reset included.
    pub pin_writes: usize,
}

impl ScriptedPeer {
    pub fn new() -> Self {
        Self {
            mode: Mode::Idle,
            host_ready: false,
            in_reset: false,
            silent: false,
            replies: VecDeque::new(),
            indications: VecDeque::new(),
            boot_frame: None,
            triggers: Vec::new(),
            requests: Vec::new(),
            exchanges: Vec::new(),
            pin_writes: 0,
        }
    }

    fn request_complete(&mut self, command: u16, payload: Vec<u8>) {
        self.requests.push((command, payload));
        let raised: Vec<Vec<u8>> = self
            .triggers
            .iter()
            .filter(|(on, _)| *on == command)
            .map(|(_, frame)| frame.clone())
            .collect();
        self.indications.extend(raised);
        self.mode = Mode::ReplyReady;
    }

    fn start_reading(&mut self, buf: &mut [u8], frame: Vec<u8>) {
        buf.copy_from_slice(&frame[..3]);
        let rest = frame[3..].to_vec();
        self.mode = if rest.is_empty() {
            Mode::Idle
        } else {
            Mode::Reading(rest)
        };
    }
}

impl Pins for ScriptedPeer {
    fn set(&mut self, line: Line) {
        self.pin_writes += 1;
        match line {
            Line::HostReady => self.host_ready = false,
            Line::Reset if self.in_reset => {
                self.in_reset = false;
                self.mode = Mode::Idle;
                self.indications.clear();
                if let Some(frame) = self.boot_frame.clone() {
                    self.indications.push_back(frame);
                }
            }
            _ => {}
        }
    }

    fn clear(&mut self, line: Line) {
        self.pin_writes += 1;
        match line {
            Line::HostReady => self.host_ready = true,
            Line::Reset => self.in_reset = true,
            _ => {}
        }
    }

    fn read(&mut self, _line: Line) -> Level {
        if self.silent {
            return Level::High;
        }
        match &self.mode {
            Mode::Idle if self.host_ready || !self.indications.is_empty() => Level::Low,
            Mode::Idle => Level::High,
            Mode::Writing { .. } | Mode::Reading(_) => Level::Low,
            // Releasing the line signals the reply; with none scripted the peer hangs
            Mode::ReplyReady if self.replies.is_empty() => Level::Low,
            Mode::ReplyReady => Level::High,
        }
    }
}

impl ByteExchange for ScriptedPeer {
    fn exchange(&mut self, buf: &mut [u8]) -> std::io::Result<()> {
        self.exchanges.push(buf.len());

        match std::mem::replace(&mut self.mode, Mode::Idle) {
            Mode::Idle => {
                let is_poll = buf.iter().all(|&b| b == 0);
                if is_poll {
                    let frame = self.indications.pop_front().unwrap_or_else(|| vec![0; 3]);
                    self.start_reading(buf, frame);
                } else {
                    let length = buf[0] as usize;
                    let command = u16::from_be_bytes([buf[1], buf[2]]);
                    buf.fill(0);
                    if length == 0 {
                        self.request_complete(command, Vec::new());
                    } else {
                        self.mode = Mode::Writing {
                            command,
                            remaining: length,
                        };
                    }
                }
            }
            Mode::Writing { command, remaining } => {
                assert_eq!(buf.len(), remaining, "request payload length");
                let payload = buf.to_vec();
                buf.fill(0);
                self.request_complete(command, payload);
            }
            Mode::ReplyReady => {
                let frame = self.replies.pop_front().unwrap_or_else(|| vec![0; 3]);
                self.start_reading(buf, frame);
            }
            Mode::Reading(rest) => {
                let n = buf.len().min(rest.len());
                buf[..n].copy_from_slice(&rest[..n]);
            }
        }
        Ok(())
    }
}

/// One peer seen through both the line and the channel halves.
#[derive(Clone)]
pub struct Peer(Rc<RefCell<ScriptedPeer>>);

impl Peer {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(ScriptedPeer::new())))
    }

    /// Queue a reply to the next request.
    pub fn reply(&self, command: u16, payload: &[u8]) -> &Self {
        self.0
            .borrow_mut()
            .replies
            .push_back(build_frame(CommandId::new(command), payload));
        self
    }

    /// Raise an indication.
    pub fn raise(&self, command: u16, payload: &[u8]) -> &Self {
        self.raise_raw(build_frame(CommandId::new(command), payload))
    }

    /// Raise arbitrary bytes as an indication.
    pub fn raise_raw(&self, bytes: Vec<u8>) -> &Self {
        self.0.borrow_mut().indications.push_back(bytes);
        self
    }

    /// Raise an indication once a request with `on` has been written.
    pub fn raise_after(&self, on: u16, command: u16, payload: &[u8]) -> &Self {
        self.0
            .borrow_mut()
            .triggers
            .push((on, build_frame(CommandId::new(command), payload)));
        self
    }

    /// Frame the peer raises after coming out of reset.
    pub fn boot_with(&self, command: u16, payload: &[u8]) -> &Self {
        self.0.borrow_mut().boot_frame = Some(build_frame(CommandId::new(command), payload));
        self
    }

    pub fn set_silent(&self) {
        self.0.borrow_mut().silent = true;
    }

    pub fn requests(&self) -> Vec<(u16, Vec<u8>)> {
        self.0.borrow().requests.clone()
    }

    pub fn exchanges(&self) -> Vec<usize> {
        self.0.borrow().exchanges.clone()
    }

    pub fn pin_writes(&self) -> usize {
        self.0.borrow().pin_writes
    }

    /// Whether the host currently asserts its ready line.
    pub fn host_ready_asserted(&self) -> bool {
        self.0.borrow().host_ready
    }

    pub fn clear_log(&self) {
        let mut peer = self.0.borrow_mut();
        peer.requests.clear();
        peer.exchanges.clear();
        peer.pin_writes = 0;
    }

    pub fn transport(&self) -> NpiTransport<Peer, Peer> {
        self.api().into_transport()
    }

    pub fn api(&self) -> SimpleApi<Peer, Peer> {
        SimpleApi::builder(self.clone(), self.clone())
            .handshake_timeout(TEST_TIMEOUT)
            .build()
    }
}

impl Pins for Peer {
    fn set(&mut self, line: Line) {
        self.0.borrow_mut().set(line)
    }

    fn clear(&mut self, line: Line) {
        self.0.borrow_mut().clear(line)
    }

    fn read(&mut self, line: Line) -> Level {
        self.0.borrow_mut().read(line)
    }
}

impl ByteExchange for Peer {
    fn exchange(&mut self, buf: &mut [u8]) -> std::io::Result<()> {
        self.0.borrow_mut().exchange(buf)
    }
}
