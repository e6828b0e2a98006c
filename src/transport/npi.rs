//! SPI NPI transport.
//!
//! Frame exchange gated by the two handshake lines:
//!
//! ```text
//! passive receive:  wait SRDY low → MRDY low → header ⇄ 000000 → payload → MRDY high
//! request:          MRDY low → wait SRDY low → header + payload out
//!                   → wait SRDY high → response header/payload in → MRDY high
//! ```
//!
//! The transport knows nothing about command semantics beyond the reset
//! indication it expects after pulsing the reset line.

use bytes::{Bytes, BytesMut};

use crate::codec::PayloadReader;
use crate::error::{Result, ZnpError};
use crate::hal::{ByteExchange, Level, Line, Pins};
use crate::protocol::{Command, CommandId, Frame, Header, HEADER_SIZE, MAX_PAYLOAD_SIZE};

use super::config::TransportConfig;
use super::wait::LineWaiter;

/// Boot information reported by the peer after a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetInfo {
    /// Why the peer reset (power-up, external, watchdog).
    pub reason: u8,
    /// NPI transport protocol revision.
    pub transport_rev: u8,
    /// Product identifier.
    pub product_id: u8,
    /// Firmware release number.
    pub release: u16,
    /// Hardware revision.
    pub hw_rev: u8,
}

impl ResetInfo {
    /// Decode the SYS_RESET_IND payload.
    pub fn decode(payload: Bytes) -> Result<Self> {
        let mut reader = PayloadReader::new(payload, "reset indication");
        Ok(Self {
            reason: reader.u8()?,
            transport_rev: reader.u8()?,
            product_id: reader.u8()?,
            release: reader.u16_le()?,
            hw_rev: reader.u8()?,
        })
    }
}

/// Frame-level transport to the peer.
///
/// Owns the lines and the byte-exchange channel for its lifetime. Every
/// operation takes `&mut self`, so at most one exchange is ever in flight.
pub struct NpiTransport<P, S> {
    pins: P,
    bus: S,
    config: TransportConfig,
    waiter: LineWaiter,
    last_frame: Option<Frame>,
}

impl<P: Pins, S: ByteExchange> NpiTransport<P, S> {
    /// Create a transport with default timings.
    ///
    /// No line is touched until the first operation.
    pub fn new(pins: P, bus: S) -> Self {
        Self::with_config(pins, bus, TransportConfig::default())
    }

    /// Create a transport with custom timings.
    pub fn with_config(pins: P, bus: S, config: TransportConfig) -> Self {
        let waiter = LineWaiter::new(config.handshake_timeout, config.poll_interval);
        Self {
            pins,
            bus,
            config,
            waiter,
            last_frame: None,
        }
    }

    /// Get the timing configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// The most recently received frame.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// Give the lines and channel back.
    pub fn into_parts(self) -> (P, S) {
        (self.pins, self.bus)
    }

    /// Check whether the peer has a frame waiting. Never blocks.
    pub fn has_pending_frame(&mut self) -> bool {
        self.pins.read(Line::PeerReady) == Level::ASSERTED
    }

    /// Receive a frame if one is pending, otherwise return `None` at once.
    pub async fn receive_if_pending(&mut self) -> Result<Option<Frame>> {
        if !self.has_pending_frame() {
            return Ok(None);
        }
        self.passive_receive().await.map(Some)
    }

    /// Wait for the peer to raise a frame and read it.
    pub async fn passive_receive(&mut self) -> Result<Frame> {
        self.waiter
            .until(&mut self.pins, Line::PeerReady, Level::ASSERTED)
            .await?;

        self.assert_lines();
        let result = self.read_frame();
        self.release_lines();

        self.store(result)
    }

    /// Send a synchronous request and read the peer's response.
    ///
    /// `payload` and `length` must agree: either no payload and zero length,
    /// or a payload of exactly `length` bytes. Inconsistent arguments fail
    /// with [`ZnpError::Parameter`] before any line is touched.
    pub async fn request(
        &mut self,
        command: CommandId,
        payload: Option<&[u8]>,
        length: usize,
    ) -> Result<Frame> {
        let payload = Self::check_request(payload, length)?;

        self.assert_lines();
        let result = self.exchange_request(command, payload).await;
        self.release_lines();

        self.store(result)
    }

    /// Send `payload` (possibly empty) as a request and read the response.
    pub async fn call(&mut self, command: CommandId, payload: &[u8]) -> Result<Frame> {
        if payload.is_empty() {
            self.request(command, None, 0).await
        } else {
            self.request(command, Some(payload), payload.len()).await
        }
    }

    /// Pulse the reset line and read the peer's boot indication.
    pub async fn reset_peer(&mut self) -> Result<ResetInfo> {
        self.release_lines();

        self.pins.clear(Line::Reset);
        tokio::time::sleep(self.config.reset_pulse).await;
        self.pins.set(Line::Reset);
        tokio::time::sleep(self.config.boot_delay).await;

        let frame = self.passive_receive().await?;
        let expected = Command::SysResetInd.id();
        if frame.command() != expected {
            tracing::warn!(
                "Expected reset indication after reset, got {}",
                frame.command()
            );
            return Err(ZnpError::UnexpectedFrame {
                expected,
                actual: frame.command(),
            });
        }

        let info = ResetInfo::decode(frame.payload)?;
        tracing::info!(
            "Peer reset: reason {}, product {}, release {:#06X}",
            info.reason,
            info.product_id,
            info.release
        );
        Ok(info)
    }

    fn check_request(payload: Option<&[u8]>, length: usize) -> Result<&[u8]> {
        match payload {
            None if length == 0 => Ok(&[]),
            None => Err(ZnpError::Parameter(format!(
                "Declared length {} without a payload",
                length
            ))),
            Some(_) if length == 0 => Err(ZnpError::Parameter(
                "Payload given with zero declared length".to_string(),
            )),
            Some(bytes) if bytes.len() != length => Err(ZnpError::Parameter(format!(
                "Payload is {} bytes but declared length is {}",
                bytes.len(),
                length
            ))),
            Some(_) if length > MAX_PAYLOAD_SIZE => Err(ZnpError::Parameter(format!(
                "Payload length {} exceeds maximum {}",
                length, MAX_PAYLOAD_SIZE
            ))),
            Some(bytes) => Ok(bytes),
        }
    }

    async fn exchange_request(&mut self, command: CommandId, payload: &[u8]) -> Result<Frame> {
        self.waiter
            .until(&mut self.pins, Line::PeerReady, Level::ASSERTED)
            .await?;

        let mut header = Header::new(payload.len() as u8, command).encode();
        self.bus.exchange(&mut header)?;
        if !payload.is_empty() {
            let mut out = payload.to_vec();
            self.bus.exchange(&mut out)?;
        }
        tracing::debug!("Sent {} ({} bytes)", command, payload.len());

        // Releasing SRDY is the peer's "response ready".
        self.waiter
            .until(&mut self.pins, Line::PeerReady, Level::RELEASED)
            .await?;

        self.read_frame()
    }

    fn read_frame(&mut self) -> Result<Frame> {
        let mut raw = [0u8; HEADER_SIZE];
        self.bus.exchange(&mut raw)?;
        let header = Header::from_bytes(&raw);

        if let Err(e) = header.validate() {
            tracing::error!(
                "Peer sent {} with oversized length {}",
                header.command,
                header.length
            );
            return Err(e);
        }

        let mut payload = BytesMut::zeroed(header.payload_len());
        if !payload.is_empty() {
            self.bus.exchange(&mut payload)?;
        }
        tracing::debug!("Received {} ({} bytes)", header.command, header.length);

        Ok(Frame::new(header, payload.freeze()))
    }

    fn store(&mut self, result: Result<Frame>) -> Result<Frame> {
        let frame = result?;
        self.last_frame = Some(frame.clone());
        Ok(frame)
    }

    fn assert_lines(&mut self) {
        self.pins.clear(Line::HostReady);
        self.pins.clear(Line::ChipSelect);
    }

    fn release_lines(&mut self) {
        self.pins.set(Line::HostReady);
        self.pins.set(Line::ChipSelect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::time::Duration;

    /// Peer that only ever raises the frames queued in it.
    #[derive(Default)]
    struct IndicationPeer {
        outbox: VecDeque<u8>,
        pin_writes: usize,
        exchanges: Vec<usize>,
    }

    impl IndicationPeer {
        fn with_frame(bytes: &[u8]) -> Self {
            Self {
                outbox: bytes.iter().copied().collect(),
                ..Default::default()
            }
        }
    }

    impl Pins for IndicationPeer {
        fn set(&mut self, _line: Line) {
            self.pin_writes += 1;
        }

        fn clear(&mut self, _line: Line) {
            self.pin_writes += 1;
        }

        fn read(&mut self, _line: Line) -> Level {
            if self.outbox.is_empty() {
                Level::High
            } else {
                Level::Low
            }
        }
    }

    impl ByteExchange for IndicationPeer {
        fn exchange(&mut self, buf: &mut [u8]) -> std::io::Result<()> {
            self.exchanges.push(buf.len());
            for byte in buf.iter_mut() {
                *byte = self.outbox.pop_front().unwrap_or(0);
            }
            Ok(())
        }
    }

    /// One peer seen through both the pin and the channel halves.
    #[derive(Clone, Default)]
    struct Shared(Rc<RefCell<IndicationPeer>>);

    impl Shared {
        fn new(peer: IndicationPeer) -> Self {
            Self(Rc::new(RefCell::new(peer)))
        }

        fn transport(&self) -> NpiTransport<Shared, Shared> {
            NpiTransport::with_config(
                self.clone(),
                self.clone(),
                TransportConfig::new().handshake_timeout(Duration::from_millis(5)),
            )
        }
    }

    impl Pins for Shared {
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

    impl ByteExchange for Shared {
        fn exchange(&mut self, buf: &mut [u8]) -> std::io::Result<()> {
            self.0.borrow_mut().exchange(buf)
        }
    }

    #[test]
    fn test_reset_info_decode() {
        let info =
            ResetInfo::decode(Bytes::from_static(&[0x01, 0x02, 0x03, 0x02, 0x01, 0x04])).unwrap();
        assert_eq!(
            info,
            ResetInfo {
                reason: 1,
                transport_rev: 2,
                product_id: 3,
                release: 0x0102,
                hw_rev: 4,
            }
        );

        assert!(ResetInfo::decode(Bytes::from_static(&[0x01, 0x02])).is_err());
    }

    #[test]
    fn test_check_request_consistency() {
        type T = NpiTransport<IndicationPeer, IndicationPeer>;

        assert!(T::check_request(None, 0).is_ok());
        assert!(T::check_request(Some(&[1, 2][..]), 2).is_ok());
        assert!(matches!(
            T::check_request(None, 3),
            Err(ZnpError::Parameter(_))
        ));
        assert!(matches!(
            T::check_request(Some(&[1][..]), 0),
            Err(ZnpError::Parameter(_))
        ));
        assert!(matches!(
            T::check_request(Some(&[1, 2, 3][..]), 2),
            Err(ZnpError::Parameter(_))
        ));
        assert!(matches!(
            T::check_request(Some(&[0; 101][..]), 101),
            Err(ZnpError::Parameter(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_receive_if_pending_idle() {
        let peer = Shared::new(IndicationPeer::default());
        let mut transport = peer.transport();

        assert!(!transport.has_pending_frame());
        assert!(transport.receive_if_pending().await.unwrap().is_none());
        assert!(transport.last_frame().is_none());

        assert!(peer.0.borrow().exchanges.is_empty());
        assert_eq!(peer.0.borrow().pin_writes, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_receive_if_pending_reads_frame() {
        let peer = Shared::new(IndicationPeer::with_frame(&[0x02, 0x46, 0x83, 0x07, 0x00]));
        let mut transport = peer.transport();

        let frame = transport.receive_if_pending().await.unwrap().unwrap();
        assert_eq!(frame.command().raw(), 0x4683);
        assert_eq!(frame.payload(), &[0x07, 0x00]);
        assert_eq!(transport.last_frame(), Some(&frame));

        assert_eq!(peer.0.borrow().exchanges, vec![HEADER_SIZE, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_payload_needs_one_exchange() {
        let peer = Shared::new(IndicationPeer::with_frame(&[0x00, 0x46, 0x80]));
        let mut transport = peer.transport();

        let frame = transport.passive_receive().await.unwrap();
        assert_eq!(frame.payload_len(), 0);
        assert_eq!(peer.0.borrow().exchanges, vec![HEADER_SIZE]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversized_frame_rejected_before_payload() {
        let mut bytes = vec![101, 0x46, 0x87];
        bytes.extend(std::iter::repeat(0xEE).take(101));
        let peer = Shared::new(IndicationPeer::with_frame(&bytes));
        let mut transport = peer.transport();

        let err = transport.passive_receive().await.unwrap_err();
        assert!(matches!(
            err,
            ZnpError::FrameTooLarge {
                length: 101,
                capacity: MAX_PAYLOAD_SIZE
            }
        ));
        assert!(err.is_fatal());
        assert!(transport.last_frame().is_none());

        assert_eq!(peer.0.borrow().exchanges, vec![HEADER_SIZE]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_passive_receive_times_out() {
        let peer = Shared::new(IndicationPeer::default());
        let mut transport = peer.transport();

        let err = transport.passive_receive().await.unwrap_err();
        assert!(matches!(
            err,
            ZnpError::TransportTimeout {
                signal: Line::PeerReady,
                ..
            }
        ));
    }
}
