//! Simple-API command layer.
//!
//! [`SimpleApi`] turns configuration, registration, network and data
//! operations into request/response exchanges over an [`NpiTransport`],
//! and classifies the peer's asynchronous indications into a one-slot
//! cache that the `decode_*` accessors read.
//!
//! # Example
//!
//! ```ignore
//! use znp_client::zstack::{ConfigItem, IndicationKind, Polled, SimpleApi};
//!
//! let mut api = SimpleApi::builder(pins, spi)
//!     .handshake_timeout(Duration::from_millis(500))
//!     .build();
//!
//! api.reset_peer().await?;
//! api.write_config(ConfigItem::PanId, 0xFFFF).await?;
//! api.start_network().await?;
//!
//! if let Polled::Indication(IndicationKind::StartConfirm) = api.poll_indication().await? {
//!     assert!(api.decode_start_confirm()?.is_success());
//! }
//! ```

use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::{LeCodec, PayloadReader};
use crate::error::{Result, ZnpError};
use crate::hal::{ByteExchange, Pins};
use crate::protocol::{Command, Frame, Status, MAX_PAYLOAD_SIZE};
use crate::transport::{NpiTransport, ResetInfo, TransportConfig};

use super::config::{ConfigItem, ConfigValue};
use super::data::{HandleTracker, IncomingPacket, OutgoingPacket};
use super::device::{BindConfirm, DeviceInfo, DeviceInfoParam, DeviceState, FoundDevice};
use super::endpoint::EndpointDescriptor;
use super::indication::{Indication, IndicationKind, Polled};
use super::network::NetworkState;

/// IEEE address sent when a bind targets no particular device.
const NO_IEEE: [u8; 8] = [0; 8];

/// Builder for [`SimpleApi`] and its transport timings.
pub struct SimpleApiBuilder<P, S> {
    pins: P,
    bus: S,
    config: TransportConfig,
}

impl<P: Pins, S: ByteExchange> SimpleApiBuilder<P, S> {
    /// Start from default timings.
    pub fn new(pins: P, bus: S) -> Self {
        Self {
            pins,
            bus,
            config: TransportConfig::default(),
        }
    }

    /// Replace the whole transport configuration.
    pub fn config(mut self, config: TransportConfig) -> Self {
        self.config = config;
        self
    }

    /// Bound on every handshake wait.
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.handshake_timeout(timeout);
        self
    }

    /// Interval between line samples.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config = self.config.poll_interval(interval);
        self
    }

    /// Reset pulse width (at least 2 ms).
    pub fn reset_pulse(mut self, pulse: Duration) -> Self {
        self.config = self.config.reset_pulse(pulse);
        self
    }

    /// Post-reset boot delay (at least 5 ms).
    pub fn boot_delay(mut self, delay: Duration) -> Self {
        self.config = self.config.boot_delay(delay);
        self
    }

    /// Create the transport and wrap it in a command layer.
    pub fn build(self) -> SimpleApi<P, S> {
        SimpleApi::from_transport(NpiTransport::with_config(self.pins, self.bus, self.config))
    }
}

/// Command layer over one peer.
pub struct SimpleApi<P, S> {
    transport: NpiTransport<P, S>,
    last_indication: Option<Indication>,
    handles: HandleTracker,
    state: NetworkState,
    reset_info: Option<ResetInfo>,
}

impl<P: Pins, S: ByteExchange> SimpleApi<P, S> {
    /// Create a command layer with default transport timings.
    pub fn new(pins: P, bus: S) -> Self {
        Self::builder(pins, bus).build()
    }

    /// Start a builder for custom transport timings.
    pub fn builder(pins: P, bus: S) -> SimpleApiBuilder<P, S> {
        SimpleApiBuilder::new(pins, bus)
    }

    /// Wrap an existing transport.
    pub fn from_transport(transport: NpiTransport<P, S>) -> Self {
        Self {
            transport,
            last_indication: None,
            handles: HandleTracker::default(),
            state: NetworkState::default(),
            reset_info: None,
        }
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &NpiTransport<P, S> {
        &self.transport
    }

    /// Get the underlying transport mutably, e.g. for raw requests.
    pub fn transport_mut(&mut self) -> &mut NpiTransport<P, S> {
        &mut self.transport
    }

    /// Drop the command-layer state and return the transport.
    pub fn into_transport(self) -> NpiTransport<P, S> {
        self.transport
    }

    /// Advisory bring-up progress.
    pub fn network_state(&self) -> NetworkState {
        self.state
    }

    /// Boot information from the last successful reset.
    pub fn reset_info(&self) -> Option<&ResetInfo> {
        self.reset_info.as_ref()
    }

    /// The cached indication, if any.
    pub fn last_indication(&self) -> Option<&Indication> {
        self.last_indication.as_ref()
    }

    /// Whether a send with `handle` is still waiting for its confirm.
    pub fn is_handle_in_flight(&self, handle: u8) -> bool {
        self.handles.is_in_flight(handle)
    }

    /// Forget an outstanding send so its handle can be reused.
    ///
    /// Returns whether the handle was outstanding.
    pub fn release_handle(&mut self, handle: u8) -> bool {
        self.handles.release(handle)
    }

    /// Reset the peer and record its boot information.
    ///
    /// Outstanding send handles are forgotten; the peer drops its queue on reset.
    pub async fn reset_peer(&mut self) -> Result<ResetInfo> {
        let info = self.transport.reset_peer().await?;
        self.reset_info = Some(info);
        self.state = NetworkState::Initialized;
        self.handles = HandleTracker::default();
        Ok(info)
    }

    // ---- configuration ----

    /// Write a scalar configuration item using its table width.
    pub async fn write_config(&mut self, item: ConfigItem, value: u32) -> Result<()> {
        let width = item.width().ok_or_else(|| {
            ZnpError::Parameter(format!("{:?} has no scalar width, write it raw", item))
        })?;
        let bytes = LeCodec::encode(value, width)?;
        self.write_config_raw(item, &bytes).await
    }

    /// Write a configuration item from caller-supplied bytes.
    pub async fn write_config_raw(&mut self, item: ConfigItem, bytes: &[u8]) -> Result<()> {
        if bytes.len() > MAX_PAYLOAD_SIZE - 2 {
            return Err(ZnpError::Parameter(format!(
                "Configuration value is {} bytes, maximum is {}",
                bytes.len(),
                MAX_PAYLOAD_SIZE - 2
            )));
        }

        let mut payload = BytesMut::with_capacity(bytes.len() + 2);
        payload.put_u8(item.id());
        payload.put_u8(bytes.len() as u8);
        payload.put_slice(bytes);

        let frame = self
            .transact(Command::ZbWriteConfiguration, &payload)
            .await?;
        expect_status(&frame, "write configuration")?;

        tracing::debug!("Wrote {:?} ({} bytes)", item, bytes.len());
        self.state.advance(NetworkState::Configured);
        Ok(())
    }

    /// Read a configuration item's raw bytes.
    pub async fn read_config(&mut self, item: ConfigItem) -> Result<ConfigValue> {
        let frame = self
            .transact(Command::ZbReadConfiguration, &[item.id()])
            .await?;

        let mut reader = PayloadReader::new(frame.payload, "read configuration response");
        let status = Status::new(reader.u8()?);
        if !status.is_success() {
            return Err(ZnpError::ProtocolStatus(status));
        }
        let echoed = reader.u8()?;
        if echoed != item.id() {
            return Err(ZnpError::Protocol(format!(
                "Read configuration echoed item {:#04X}, requested {:#04X}",
                echoed,
                item.id()
            )));
        }
        let len = reader.u8()? as usize;
        let bytes = reader.bytes(len)?;

        Ok(ConfigValue { item, bytes })
    }

    /// Read a 1, 2 or 4 byte configuration item as an integer.
    pub async fn read_config_value(&mut self, item: ConfigItem) -> Result<u32> {
        self.read_config(item).await?.as_u32()
    }

    // ---- network ----

    /// Register an application endpoint.
    pub async fn register_endpoint(&mut self, descriptor: &EndpointDescriptor) -> Result<()> {
        let payload = descriptor.encode()?;
        let frame = self
            .transact(Command::ZbAppRegisterRequest, &payload)
            .await?;
        expect_status(&frame, "app register")?;
        tracing::debug!("Registered endpoint {}", descriptor.endpoint);
        Ok(())
    }

    /// Ask the peer to start (form or join) the network.
    ///
    /// The outcome arrives later as a start confirm.
    pub async fn start_network(&mut self) -> Result<()> {
        self.transact(Command::ZbStartRequest, &[]).await?;
        self.state.advance(NetworkState::Starting);
        Ok(())
    }

    /// Allow devices to join through `destination` for `timeout` seconds.
    pub async fn permit_joining(&mut self, destination: u16, timeout: u8) -> Result<()> {
        let mut payload = [0u8; 3];
        payload[..2].copy_from_slice(&destination.to_le_bytes());
        payload[2] = timeout;

        let frame = self
            .transact(Command::ZbPermitJoiningRequest, &payload)
            .await?;
        expect_status(&frame, "permit joining")
    }

    /// Create or remove a binding for `command_id`.
    pub async fn bind_device(
        &mut self,
        create: bool,
        command_id: u16,
        peer: Option<[u8; 8]>,
    ) -> Result<()> {
        let mut payload = BytesMut::with_capacity(11);
        payload.put_u8(create as u8);
        payload.put_u16_le(command_id);
        payload.put_slice(&peer.unwrap_or(NO_IEEE));

        self.transact(Command::ZbBindDevice, &payload).await?;
        Ok(())
    }

    /// Accept bind requests for `timeout` seconds.
    pub async fn allow_bind(&mut self, timeout: u8) -> Result<()> {
        self.transact(Command::ZbAllowBind, &[timeout]).await?;
        Ok(())
    }

    /// Look up a device's short address by IEEE address.
    pub async fn find_device(&mut self, ieee: [u8; 8]) -> Result<()> {
        self.transact(Command::ZbFindDeviceRequest, &ieee).await?;
        Ok(())
    }

    /// Query one device information value.
    pub async fn get_device_info(&mut self, param: DeviceInfoParam) -> Result<DeviceInfo> {
        let frame = self
            .transact(Command::ZbGetDeviceInfo, &[param.id()])
            .await?;

        let mut reader = PayloadReader::new(frame.payload, "device info response");
        let echoed = reader.u8()?;
        if echoed != param.id() {
            return Err(ZnpError::Protocol(format!(
                "Device info echoed selector {}, requested {}",
                echoed,
                param.id()
            )));
        }
        let value = reader.bytes(param.width())?;

        Ok(DeviceInfo { param, value })
    }

    // ---- data ----

    /// Queue a packet for transmission.
    ///
    /// Success only means the peer accepted the packet. Delivery is
    /// reported by a send-data confirm carrying the packet's handle; until
    /// then the handle cannot be reused.
    pub async fn send_data(&mut self, packet: &OutgoingPacket, ack: bool, radius: u8) -> Result<()> {
        self.handles.check(packet.handle)?;
        let payload = packet.encode(ack, radius)?;

        let frame = self.transact(Command::ZbSendDataRequest, &payload).await?;
        if let Some(&raw) = frame.payload().first() {
            let status = Status::new(raw);
            if !status.is_success() {
                return Err(ZnpError::ProtocolStatus(status));
            }
            return Err(ZnpError::Protocol(format!(
                "Send data response carried {} unexpected bytes",
                frame.payload_len()
            )));
        }

        self.handles.insert(packet.handle);
        tracing::debug!(
            "Queued {} bytes for {:#06X} (handle {})",
            packet.payload.len(),
            packet.destination,
            packet.handle
        );
        Ok(())
    }

    // ---- indications ----

    /// Read one pending frame, if any, and classify it.
    ///
    /// Returns at once when nothing is pending. Only recognized
    /// indications replace the cache.
    pub async fn poll_indication(&mut self) -> Result<Polled> {
        let frame = match self.transport.receive_if_pending().await? {
            Some(frame) => frame,
            None => return Ok(Polled::Nothing),
        };

        let indication = match Indication::classify(&frame) {
            Some(indication) => indication,
            None => {
                tracing::warn!("Ignoring unrecognized frame {}", frame.command());
                return Ok(Polled::Unrecognized(frame.command()));
            }
        };

        let kind = indication.kind;
        match kind {
            IndicationKind::SendDataConfirm => {
                if let Some(&handle) = indication.payload.first() {
                    self.handles.release(handle);
                }
            }
            IndicationKind::StartConfirm => {
                if indication.payload.first() == Some(&Status::SUCCESS.raw()) {
                    self.state.advance(NetworkState::Joined);
                }
            }
            _ => {}
        }

        tracing::debug!("Classified {} ({} bytes)", kind, indication.payload.len());
        self.last_indication = Some(indication);
        Ok(Polled::Indication(kind))
    }

    /// Status carried by a cached start confirm.
    pub fn decode_start_confirm(&self) -> Result<Status> {
        let mut reader = self.cached(IndicationKind::StartConfirm, "start confirm")?;
        Ok(Status::new(reader.u8()?))
    }

    /// Device state carried by a cached state change.
    pub fn decode_state_change(&self) -> Result<DeviceState> {
        let mut reader = self.cached(IndicationKind::StateChange, "state change")?;
        Ok(DeviceState::from(reader.u8()?))
    }

    /// Command id and status carried by a cached bind confirm.
    pub fn decode_bind_confirm(&self) -> Result<BindConfirm> {
        let payload = self.cached_payload(IndicationKind::BindConfirm)?;
        BindConfirm::decode(payload)
    }

    /// Source address carried by a cached allow-bind confirm.
    pub fn decode_allow_bind_confirm(&self) -> Result<u16> {
        let mut reader = self.cached(IndicationKind::AllowBindConfirm, "allow-bind confirm")?;
        reader.u16_le()
    }

    /// Check a cached send-data confirm for `handle`.
    ///
    /// A confirm for another handle is [`ZnpError::HandleMismatch`], even
    /// when its status is success.
    pub fn decode_send_data_confirm(&self, handle: u8) -> Result<()> {
        let mut reader = self.cached(IndicationKind::SendDataConfirm, "send-data confirm")?;
        let actual = reader.u8()?;
        let status = Status::new(reader.u8()?);

        if actual != handle {
            return Err(ZnpError::HandleMismatch {
                expected: handle,
                actual,
            });
        }
        if !status.is_success() {
            return Err(ZnpError::ProtocolStatus(status));
        }
        Ok(())
    }

    /// Packet carried by a cached receive-data indication.
    pub fn decode_received_data(&self) -> Result<IncomingPacket> {
        let payload = self.cached_payload(IndicationKind::ReceiveData)?;
        IncomingPacket::decode(payload)
    }

    /// Device located by a cached find-device confirm.
    pub fn decode_find_device_confirm(&self) -> Result<FoundDevice> {
        let payload = self.cached_payload(IndicationKind::FindDeviceConfirm)?;
        FoundDevice::decode(payload)
    }

    // ---- internals ----

    /// Send a request and check that the response mirrors it.
    async fn transact(&mut self, command: Command, payload: &[u8]) -> Result<Frame> {
        let frame = self.transport.call(command.id(), payload).await?;

        let expected = command.id().response();
        if frame.command() != expected {
            tracing::warn!("{:?} answered with {}", command, frame.command());
            return Err(ZnpError::UnexpectedFrame {
                expected,
                actual: frame.command(),
            });
        }
        Ok(frame)
    }

    fn cached_payload(&self, expected: IndicationKind) -> Result<Bytes> {
        match &self.last_indication {
            None => Err(ZnpError::NoIndication),
            Some(indication) if indication.kind != expected => Err(ZnpError::TypeMismatch {
                expected,
                found: indication.kind,
            }),
            Some(indication) => Ok(indication.payload.clone()),
        }
    }

    fn cached(&self, expected: IndicationKind, context: &'static str) -> Result<PayloadReader> {
        self.cached_payload(expected)
            .map(|payload| PayloadReader::new(payload, context))
    }

    #[cfg(test)]
    pub(crate) fn set_last_indication(&mut self, kind: IndicationKind, payload: &'static [u8]) {
        self.last_indication = Some(Indication {
            kind,
            payload: Bytes::from_static(payload),
        });
    }
}

/// Check a response whose payload is exactly one status byte.
fn expect_status(frame: &Frame, context: &str) -> Result<()> {
    let raw = match frame.payload() {
        [raw] => *raw,
        other => {
            return Err(ZnpError::Protocol(format!(
                "{} response carried {} bytes, expected a single status byte",
                context,
                other.len()
            )))
        }
    };

    let status = Status::new(raw);
    if status.is_success() {
        Ok(())
    } else {
        tracing::debug!("{} failed with status {}", context, status);
        Err(ZnpError::ProtocolStatus(status))
    }
}
