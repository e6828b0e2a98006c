//! Network bring-up from a declarative profile.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::error::{Result, ZnpError};
use crate::hal::{ByteExchange, Line, Pins};
use crate::transport::ResetInfo;

use super::api::SimpleApi;
use super::config::{ChannelMask, ConfigItem, LogicalType, StartOption};
use super::data::OutgoingPacket;
use super::endpoint::EndpointDescriptor;
use super::indication::{IndicationKind, Polled};

/// Default time allowed for the start confirm to arrive.
pub const DEFAULT_START_TIMEOUT_MS: u64 = 10_000;

/// Parameters applied by [`SimpleApi::bring_up`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkProfile {
    /// What the peer clears from NV before starting.
    pub startup_option: StartOption,
    /// Role the peer takes in the network.
    pub logical_type: LogicalType,
    /// 0xFFFF joins any PAN.
    pub pan_id: u16,
    /// Channels the peer may use.
    pub channels: ChannelMask,
    /// Endpoint to register before starting, if any.
    pub endpoint: Option<EndpointDescriptor>,
    /// Time allowed for the start confirm, in milliseconds.
    pub start_timeout_ms: u64,
}

impl NetworkProfile {
    /// Parse a profile from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Start confirm timeout as a [`Duration`].
    pub fn start_timeout(&self) -> Duration {
        Duration::from_millis(self.start_timeout_ms)
    }
}

impl Default for NetworkProfile {
    fn default() -> Self {
        Self {
            startup_option: StartOption::NoClear,
            logical_type: LogicalType::EndDevice,
            pan_id: 0xFFFF,
            channels: ChannelMask::ALL,
            endpoint: None,
            start_timeout_ms: DEFAULT_START_TIMEOUT_MS,
        }
    }
}

impl<P: Pins, S: ByteExchange> SimpleApi<P, S> {
    /// Reset the peer, configure it, and start the network.
    ///
    /// Returns once a successful start confirm has been classified.
    /// Indications that arrive in the meantime are cached and then
    /// replaced, so callers that care about them should poll themselves.
    pub async fn bring_up(&mut self, profile: &NetworkProfile) -> Result<ResetInfo> {
        let info = self.reset_peer().await?;

        self.write_config(ConfigItem::StartupOption, profile.startup_option.value())
            .await?;
        self.write_config(ConfigItem::LogicalType, profile.logical_type.value())
            .await?;
        self.write_config(ConfigItem::PanId, u32::from(profile.pan_id))
            .await?;
        self.write_config(ConfigItem::ChannelList, profile.channels.bits())
            .await?;

        if let Some(endpoint) = &profile.endpoint {
            self.register_endpoint(endpoint).await?;
        }

        self.start_network().await?;
        let deadline = Instant::now() + profile.start_timeout();
        self.poll_until(IndicationKind::StartConfirm, deadline)
            .await?;

        let status = self.decode_start_confirm()?;
        if !status.is_success() {
            tracing::warn!("Network start failed with status {}", status);
            return Err(ZnpError::ProtocolStatus(status));
        }

        tracing::info!(
            "Network up as {:?} on PAN {:#06X}",
            profile.logical_type,
            profile.pan_id
        );
        Ok(info)
    }

    /// Send a packet and wait for its own send-data confirm.
    ///
    /// Confirms for other handles are skipped.
    pub async fn send_and_confirm(
        &mut self,
        packet: &OutgoingPacket,
        ack: bool,
        radius: u8,
        timeout: Duration,
    ) -> Result<()> {
        self.send_data(packet, ack, radius).await?;

        let deadline = Instant::now() + timeout;
        loop {
            self.poll_until(IndicationKind::SendDataConfirm, deadline)
                .await?;
            match self.decode_send_data_confirm(packet.handle) {
                Err(ZnpError::HandleMismatch { actual, .. }) => {
                    tracing::debug!("Skipping confirm for handle {}", actual);
                }
                result => return result,
            }
        }
    }

    /// Poll until an indication of `kind` is cached or `deadline` passes.
    async fn poll_until(&mut self, kind: IndicationKind, deadline: Instant) -> Result<()> {
        let start = Instant::now();
        let interval = self.transport().config().poll_interval;

        loop {
            match self.poll_indication().await? {
                Polled::Indication(found) if found == kind => return Ok(()),
                Polled::Nothing => tokio::time::sleep(interval).await,
                _ => {}
            }

            if Instant::now() >= deadline {
                let waited = start.elapsed();
                tracing::warn!("No {} after {:?}", kind, waited);
                return Err(ZnpError::TransportTimeout {
                    signal: Line::PeerReady,
                    waited,
                });
            }
        }
    }
}
