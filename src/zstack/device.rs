//! Device information and device-level confirm payloads.

use std::fmt;

use bytes::Bytes;

use crate::codec::PayloadReader;
use crate::error::Result;
use crate::protocol::Status;

/// Selector for `get_device_info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceInfoParam {
    /// Current [`DeviceState`].
    State,
    /// Own 64-bit address.
    IeeeAddress,
    /// Own 16-bit network address.
    ShortAddress,
    /// Parent's 16-bit network address.
    ParentShortAddress,
    /// Parent's 64-bit address.
    ParentIeeeAddress,
    /// Operating channel.
    Channel,
    /// 16-bit PAN id.
    PanId,
    /// 64-bit extended PAN id.
    ExtendedPanId,
}

impl DeviceInfoParam {
    /// Every selector.
    pub const ALL: [DeviceInfoParam; 8] = [
        DeviceInfoParam::State,
        DeviceInfoParam::IeeeAddress,
        DeviceInfoParam::ShortAddress,
        DeviceInfoParam::ParentShortAddress,
        DeviceInfoParam::ParentIeeeAddress,
        DeviceInfoParam::Channel,
        DeviceInfoParam::PanId,
        DeviceInfoParam::ExtendedPanId,
    ];

    /// Selector byte on the wire.
    pub fn id(self) -> u8 {
        match self {
            DeviceInfoParam::State => 0,
            DeviceInfoParam::IeeeAddress => 1,
            DeviceInfoParam::ShortAddress => 2,
            DeviceInfoParam::ParentShortAddress => 3,
            DeviceInfoParam::ParentIeeeAddress => 4,
            DeviceInfoParam::Channel => 5,
            DeviceInfoParam::PanId => 6,
            DeviceInfoParam::ExtendedPanId => 7,
        }
    }

    /// Selector for a wire byte.
    pub fn from_id(id: u8) -> Option<Self> {
        DeviceInfoParam::ALL.into_iter().find(|p| p.id() == id)
    }

    /// Number of value bytes the peer returns.
    pub fn width(self) -> usize {
        match self {
            DeviceInfoParam::State | DeviceInfoParam::Channel => 1,
            DeviceInfoParam::ShortAddress
            | DeviceInfoParam::ParentShortAddress
            | DeviceInfoParam::PanId => 2,
            DeviceInfoParam::IeeeAddress
            | DeviceInfoParam::ParentIeeeAddress
            | DeviceInfoParam::ExtendedPanId => 8,
        }
    }
}

/// Value returned by `get_device_info`, little-endian as sent by the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Selector echoed by the peer.
    pub param: DeviceInfoParam,
    /// Value bytes, [`DeviceInfoParam::width`] long.
    pub value: Bytes,
}

impl DeviceInfo {
    /// Value as an integer. Eight-byte values fit exactly.
    pub fn as_u64(&self) -> u64 {
        self.value
            .iter()
            .rev()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
    }

    /// Value as a device state, if this is the state selector.
    pub fn as_state(&self) -> Option<DeviceState> {
        match (self.param, self.value.first()) {
            (DeviceInfoParam::State, Some(&raw)) => Some(DeviceState::from(raw)),
            _ => None,
        }
    }
}

/// Device state reported by the peer's ZDO layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceState {
    /// Initialized, not started.
    Hold,
    /// Starting up.
    Init,
    /// Scanning for networks.
    NwkDiscovery,
    /// Joining a network.
    NwkJoining,
    /// Rejoining a network.
    NwkRejoin,
    /// Joined, not yet authenticated by the trust center.
    EndDeviceUnauthenticated,
    /// Operating as an end device.
    EndDevice,
    /// Operating as a router.
    Router,
    /// Forming a network.
    CoordinatorStarting,
    /// Operating as the coordinator.
    Coordinator,
    /// Lost its parent.
    NwkOrphan,
    /// Value outside the known range, kept as sent.
    Unknown(u8),
}

impl DeviceState {
    /// State byte on the wire.
    pub fn raw(self) -> u8 {
        match self {
            DeviceState::Hold => 0,
            DeviceState::Init => 1,
            DeviceState::NwkDiscovery => 2,
            DeviceState::NwkJoining => 3,
            DeviceState::NwkRejoin => 4,
            DeviceState::EndDeviceUnauthenticated => 5,
            DeviceState::EndDevice => 6,
            DeviceState::Router => 7,
            DeviceState::CoordinatorStarting => 8,
            DeviceState::Coordinator => 9,
            DeviceState::NwkOrphan => 10,
            DeviceState::Unknown(raw) => raw,
        }
    }

    /// Whether the device is operating in a network.
    pub fn is_on_network(self) -> bool {
        matches!(
            self,
            DeviceState::EndDevice | DeviceState::Router | DeviceState::Coordinator
        )
    }
}

impl From<u8> for DeviceState {
    fn from(raw: u8) -> Self {
        match raw {
            0 => DeviceState::Hold,
            1 => DeviceState::Init,
            2 => DeviceState::NwkDiscovery,
            3 => DeviceState::NwkJoining,
            4 => DeviceState::NwkRejoin,
            5 => DeviceState::EndDeviceUnauthenticated,
            6 => DeviceState::EndDevice,
            7 => DeviceState::Router,
            8 => DeviceState::CoordinatorStarting,
            9 => DeviceState::Coordinator,
            10 => DeviceState::NwkOrphan,
            other => DeviceState::Unknown(other),
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceState::Unknown(raw) => write!(f, "unknown ({})", raw),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Outcome of a bind request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindConfirm {
    /// Command id the binding was made for.
    pub command_id: u16,
    /// Outcome reported by the peer.
    pub status: Status,
}

impl BindConfirm {
    pub(crate) fn decode(payload: Bytes) -> Result<Self> {
        let mut reader = PayloadReader::new(payload, "bind confirm");
        Ok(Self {
            command_id: reader.u16_le()?,
            status: Status::new(reader.u8()?),
        })
    }
}

/// Device located by a find-device request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoundDevice {
    /// 16-bit network address.
    pub short_address: u16,
    /// 64-bit address that was searched for.
    pub ieee: [u8; 8],
}

impl FoundDevice {
    /// Decode search type(1) short address(2 LE) IEEE(8).
    pub(crate) fn decode(payload: Bytes) -> Result<Self> {
        let mut reader = PayloadReader::new(payload, "find device confirm");
        let _search_type = reader.u8()?;
        Ok(Self {
            short_address: reader.u16_le()?,
            ieee: reader.array::<8>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_widths() {
        assert_eq!(DeviceInfoParam::State.width(), 1);
        assert_eq!(DeviceInfoParam::Channel.width(), 1);
        assert_eq!(DeviceInfoParam::ShortAddress.width(), 2);
        assert_eq!(DeviceInfoParam::ParentShortAddress.width(), 2);
        assert_eq!(DeviceInfoParam::PanId.width(), 2);
        assert_eq!(DeviceInfoParam::IeeeAddress.width(), 8);
        assert_eq!(DeviceInfoParam::ParentIeeeAddress.width(), 8);
        assert_eq!(DeviceInfoParam::ExtendedPanId.width(), 8);

        for param in DeviceInfoParam::ALL {
            assert_eq!(DeviceInfoParam::from_id(param.id()), Some(param));
        }
        assert_eq!(DeviceInfoParam::from_id(8), None);
    }

    #[test]
    fn test_device_info_value() {
        let info = DeviceInfo {
            param: DeviceInfoParam::ShortAddress,
            value: Bytes::from_static(&[0x34, 0x12]),
        };
        assert_eq!(info.as_u64(), 0x1234);
        assert_eq!(info.as_state(), None);

        let info = DeviceInfo {
            param: DeviceInfoParam::State,
            value: Bytes::from_static(&[0x06]),
        };
        assert_eq!(info.as_state(), Some(DeviceState::EndDevice));
    }

    #[test]
    fn test_device_state_values() {
        for raw in 0..=10u8 {
            let state = DeviceState::from(raw);
            assert!(!matches!(state, DeviceState::Unknown(_)));
            assert_eq!(state.raw(), raw);
        }
        assert_eq!(DeviceState::from(0x42), DeviceState::Unknown(0x42));
        assert_eq!(DeviceState::Unknown(0x42).raw(), 0x42);
        assert!(DeviceState::Router.is_on_network());
        assert!(!DeviceState::NwkJoining.is_on_network());
        assert_eq!(DeviceState::Unknown(99).to_string(), "unknown (99)");
    }

    #[test]
    fn test_bind_confirm_decode() {
        let confirm = BindConfirm::decode(Bytes::from_static(&[0xCD, 0xAB, 0x00])).unwrap();
        assert_eq!(confirm.command_id, 0xABCD);
        assert!(confirm.status.is_success());

        assert!(BindConfirm::decode(Bytes::from_static(&[0xCD])).is_err());
    }

    #[test]
    fn test_found_device_decode() {
        let payload = Bytes::from_static(&[
            0x01, 0x34, 0x12, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08,
        ]);
        let found = FoundDevice::decode(payload).unwrap();
        assert_eq!(found.short_address, 0x1234);
        assert_eq!(found.ieee, [1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
