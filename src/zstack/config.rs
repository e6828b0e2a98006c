//! Configuration items and their values.
//!
//! Each item has a fixed width on the wire; [`ConfigItem::width`] is the
//! item → width table used by `write_config`.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::codec::LeCodec;
use crate::error::Result;

/// Configuration items understood by the peer's NV store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigItem {
    StartupOption,
    LogicalType,
    ZdoDirectCallback,
    PollRate,
    QueuedPollRate,
    ResponsePollRate,
    PollFailureRetries,
    IndirectMsgTimeout,
    ApsFrameRetries,
    ApsAckWaitDuration,
    BindingTime,
    UserDescriptor,
    PanId,
    ChannelList,
    PreConfigKey,
    PreConfigKeyEnable,
    SecurityMode,
    UseDefaultTclk,
    BroadcastRetries,
    PassiveAckTimeout,
    BroadcastDeliveryTime,
    RouteExpiryTime,
}

impl ConfigItem {
    /// Every known item.
    pub const ALL: [ConfigItem; 22] = [
        ConfigItem::StartupOption,
        ConfigItem::LogicalType,
        ConfigItem::ZdoDirectCallback,
        ConfigItem::PollRate,
        ConfigItem::QueuedPollRate,
        ConfigItem::ResponsePollRate,
        ConfigItem::PollFailureRetries,
        ConfigItem::IndirectMsgTimeout,
        ConfigItem::ApsFrameRetries,
        ConfigItem::ApsAckWaitDuration,
        ConfigItem::BindingTime,
        ConfigItem::UserDescriptor,
        ConfigItem::PanId,
        ConfigItem::ChannelList,
        ConfigItem::PreConfigKey,
        ConfigItem::PreConfigKeyEnable,
        ConfigItem::SecurityMode,
        ConfigItem::UseDefaultTclk,
        ConfigItem::BroadcastRetries,
        ConfigItem::PassiveAckTimeout,
        ConfigItem::BroadcastDeliveryTime,
        ConfigItem::RouteExpiryTime,
    ];

    /// Item identifier on the wire.
    pub fn id(self) -> u8 {
        match self {
            ConfigItem::StartupOption => 0x03,
            ConfigItem::LogicalType => 0x87,
            ConfigItem::ZdoDirectCallback => 0x8F,
            ConfigItem::PollRate => 0x24,
            ConfigItem::QueuedPollRate => 0x25,
            ConfigItem::ResponsePollRate => 0x26,
            ConfigItem::PollFailureRetries => 0x29,
            ConfigItem::IndirectMsgTimeout => 0x2B,
            ConfigItem::ApsFrameRetries => 0x43,
            ConfigItem::ApsAckWaitDuration => 0x44,
            ConfigItem::BindingTime => 0x46,
            ConfigItem::UserDescriptor => 0x81,
            ConfigItem::PanId => 0x83,
            ConfigItem::ChannelList => 0x84,
            ConfigItem::PreConfigKey => 0x62,
            ConfigItem::PreConfigKeyEnable => 0x63,
            ConfigItem::SecurityMode => 0x64,
            ConfigItem::UseDefaultTclk => 0x6D,
            ConfigItem::BroadcastRetries => 0x2E,
            ConfigItem::PassiveAckTimeout => 0x2F,
            ConfigItem::BroadcastDeliveryTime => 0x30,
            ConfigItem::RouteExpiryTime => 0x2C,
        }
    }

    /// Item for a wire identifier.
    pub fn from_id(id: u8) -> Option<Self> {
        ConfigItem::ALL.into_iter().find(|item| item.id() == id)
    }

    /// Scalar width in bytes; `None` for items written as raw buffers.
    pub fn width(self) -> Option<usize> {
        match self {
            ConfigItem::StartupOption
            | ConfigItem::LogicalType
            | ConfigItem::ZdoDirectCallback
            | ConfigItem::PollFailureRetries
            | ConfigItem::IndirectMsgTimeout
            | ConfigItem::ApsFrameRetries
            | ConfigItem::PreConfigKeyEnable
            | ConfigItem::SecurityMode
            | ConfigItem::UseDefaultTclk
            | ConfigItem::PassiveAckTimeout
            | ConfigItem::BroadcastDeliveryTime
            | ConfigItem::RouteExpiryTime => Some(1),

            ConfigItem::PollRate
            | ConfigItem::QueuedPollRate
            | ConfigItem::ResponsePollRate
            | ConfigItem::ApsAckWaitDuration
            | ConfigItem::BindingTime
            | ConfigItem::PanId
            | ConfigItem::BroadcastRetries => Some(2),

            ConfigItem::ChannelList => Some(4),

            ConfigItem::UserDescriptor | ConfigItem::PreConfigKey => None,
        }
    }
}

/// Raw value read back from the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValue {
    /// Item echoed by the peer.
    pub item: ConfigItem,
    /// Value bytes, little-endian for scalar items.
    pub bytes: Bytes,
}

impl ConfigValue {
    /// Interpret the bytes as a 1, 2 or 4 byte scalar.
    pub fn as_u32(&self) -> Result<u32> {
        LeCodec::decode(&self.bytes)
    }
}

/// What the peer clears from NV on its next start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartOption {
    /// Keep configuration and network state.
    #[default]
    NoClear,
    /// Restore default configuration.
    ClearConfig,
    /// Forget network state.
    ClearState,
    /// Clear both.
    ClearAll,
}

impl StartOption {
    /// Value written to [`ConfigItem::StartupOption`].
    pub fn value(self) -> u32 {
        match self {
            StartOption::NoClear => 0x00,
            StartOption::ClearConfig => 0x01,
            StartOption::ClearState => 0x02,
            StartOption::ClearAll => 0x03,
        }
    }
}

/// Role the peer takes in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalType {
    /// Forms the network.
    Coordinator,
    /// Routes for other devices.
    Router,
    /// Sleepy leaf device.
    #[default]
    EndDevice,
}

impl LogicalType {
    /// Value written to [`ConfigItem::LogicalType`].
    pub fn value(self) -> u32 {
        match self {
            LogicalType::Coordinator => 0x00,
            LogicalType::Router => 0x01,
            LogicalType::EndDevice => 0x02,
        }
    }
}

/// Set of 2.4 GHz channels (11-26) the peer may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelMask(u32);

impl ChannelMask {
    /// Every channel from 11 to 26.
    pub const ALL: ChannelMask = ChannelMask(0x07FF_F800);
    /// No channel.
    pub const NONE: ChannelMask = ChannelMask(0);

    /// Lowest valid channel.
    pub const FIRST_CHANNEL: u8 = 11;
    /// Highest valid channel.
    pub const LAST_CHANNEL: u8 = 26;

    /// Wrap a raw mask, dropping bits outside channels 11-26.
    pub fn from_bits(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Mask containing exactly the given channels; out-of-range ones are ignored.
    pub fn from_channels<I: IntoIterator<Item = u8>>(channels: I) -> Self {
        channels
            .into_iter()
            .filter(|c| (Self::FIRST_CHANNEL..=Self::LAST_CHANNEL).contains(c))
            .fold(Self::NONE, |mask, c| Self(mask.0 | (1 << c)))
    }

    /// Raw mask value.
    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Whether `channel` is enabled.
    pub fn contains(self, channel: u8) -> bool {
        (Self::FIRST_CHANNEL..=Self::LAST_CHANNEL).contains(&channel) && self.0 & (1 << channel) != 0
    }
}

impl Default for ChannelMask {
    fn default() -> Self {
        Self::ALL
    }
}
