//! Status codes returned by the peer.
//!
//! The status space spans the MAC, network, APS, ZDO and security layers.
//! Codes are carried through verbatim; the named constants only exist for
//! comparison and display.

use std::fmt;

/// Raw status byte from a response or confirmation.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(u8);

impl Status {
    /// Operation succeeded.
    pub const SUCCESS: Status = Status(0x00);
    /// Generic failure.
    pub const FAILURE: Status = Status(0x01);
    /// Invalid parameter.
    pub const INVALID_PARAMETER: Status = Status(0x02);
    /// NV item not initialized.
    pub const NV_ITEM_UNINIT: Status = Status(0x09);
    /// NV operation failed.
    pub const NV_OPER_FAILED: Status = Status(0x0A);
    /// NV item length mismatch.
    pub const NV_BAD_ITEM_LEN: Status = Status(0x0C);
    /// Out of memory.
    pub const MEM_ERROR: Status = Status(0x10);
    /// Buffer full.
    pub const BUFFER_FULL: Status = Status(0x11);
    /// Unsupported mode.
    pub const UNSUPPORTED_MODE: Status = Status(0x12);
    /// MAC out of memory.
    pub const MAC_MEM_ERROR: Status = Status(0x13);
    /// Device still initializing; reported by start confirmations.
    pub const INIT: Status = Status(0x22);
    /// ZDO invalid endpoint.
    pub const ZDO_INVALID_ENDPOINT: Status = Status(0x82);
    /// ZDO unsupported request.
    pub const ZDO_UNSUPPORTED: Status = Status(0x84);
    /// ZDO timeout.
    pub const ZDO_TIMEOUT: Status = Status(0x85);
    /// ZDO no match.
    pub const ZDO_NO_MATCH: Status = Status(0x86);
    /// ZDO table full.
    pub const ZDO_TABLE_FULL: Status = Status(0x87);
    /// ZDO no bind entry.
    pub const ZDO_NO_BIND_ENTRY: Status = Status(0x88);
    /// Security: no key.
    pub const SEC_NO_KEY: Status = Status(0xA1);
    /// Security: max frame count reached.
    pub const SEC_MAX_FRM_COUNT: Status = Status(0xA3);
    /// APS failure.
    pub const APS_FAIL: Status = Status(0xB1);
    /// APS table full.
    pub const APS_TABLE_FULL: Status = Status(0xB2);
    /// APS illegal request.
    pub const APS_ILLEGAL_REQUEST: Status = Status(0xB3);
    /// APS invalid binding.
    pub const APS_INVALID_BINDING: Status = Status(0xB4);
    /// APS unsupported attribute.
    pub const APS_UNSUPPORTED_ATTRIB: Status = Status(0xB5);
    /// APS not supported.
    pub const APS_NOT_SUPPORTED: Status = Status(0xB6);
    /// APS no acknowledgment.
    pub const APS_NO_ACK: Status = Status(0xB7);
    /// APS duplicate entry.
    pub const APS_DUPLICATE_ENTRY: Status = Status(0xB8);
    /// APS no bound device.
    pub const APS_NO_BOUND_DEVICE: Status = Status(0xB9);
    /// NWK invalid parameter.
    pub const NWK_INVALID_PARAM: Status = Status(0xC1);
    /// NWK invalid request.
    pub const NWK_INVALID_REQUEST: Status = Status(0xC2);
    /// NWK not permitted.
    pub const NWK_NOT_PERMITTED: Status = Status(0xC3);
    /// NWK startup failure.
    pub const NWK_STARTUP_FAILURE: Status = Status(0xC4);
    /// NWK table full.
    pub const NWK_TABLE_FULL: Status = Status(0xC7);
    /// NWK unknown device.
    pub const NWK_UNKNOWN_DEVICE: Status = Status(0xC8);
    /// NWK unsupported attribute.
    pub const NWK_UNSUPPORTED_ATTRIBUTE: Status = Status(0xC9);
    /// NWK no network.
    pub const NWK_NO_NETWORK: Status = Status(0xCA);
    /// NWK leave unconfirmed.
    pub const NWK_LEAVE_UNCONFIRMED: Status = Status(0xCB);
    /// NWK no acknowledgment.
    pub const NWK_NO_ACK: Status = Status(0xCC);
    /// NWK no route.
    pub const NWK_NO_ROUTE: Status = Status(0xCD);
    /// MAC no acknowledgment.
    pub const MAC_NO_ACK: Status = Status(0xE9);

    /// Wrap a raw status byte.
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// Raw status byte.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Check if this is the success code.
    #[inline]
    pub fn is_success(self) -> bool {
        self == Status::SUCCESS
    }

    /// Short name for known codes.
    pub fn name(self) -> Option<&'static str> {
        Some(match self.0 {
            0x00 => "success",
            0x01 => "failure",
            0x02 => "invalid parameter",
            0x09 => "NV item uninitialized",
            0x0A => "NV operation failed",
            0x0C => "NV bad item length",
            0x10 => "memory error",
            0x11 => "buffer full",
            0x12 => "unsupported mode",
            0x13 => "MAC memory error",
            0x22 => "initializing",
            0x82 => "ZDO invalid endpoint",
            0x84 => "ZDO unsupported",
            0x85 => "ZDO timeout",
            0x86 => "ZDO no match",
            0x87 => "ZDO table full",
            0x88 => "ZDO no bind entry",
            0xA1 => "security no key",
            0xA3 => "security max frame count",
            0xB1 => "APS failure",
            0xB2 => "APS table full",
            0xB3 => "APS illegal request",
            0xB4 => "APS invalid binding",
            0xB5 => "APS unsupported attribute",
            0xB6 => "APS not supported",
            0xB7 => "APS no ack",
            0xB8 => "APS duplicate entry",
            0xB9 => "APS no bound device",
            0xC1 => "NWK invalid parameter",
            0xC2 => "NWK invalid request",
            0xC3 => "NWK not permitted",
            0xC4 => "NWK startup failure",
            0xC7 => "NWK table full",
            0xC8 => "NWK unknown device",
            0xC9 => "NWK unsupported attribute",
            0xCA => "NWK no network",
            0xCB => "NWK leave unconfirmed",
            0xCC => "NWK no ack",
            0xCD => "NWK no route",
            0xE9 => "MAC no ack",
            _ => return None,
        })
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status({:#04X})", self.0)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{:#04X} ({})", self.0, name),
            None => write!(f, "{:#04X}", self.0),
        }
    }
}

impl From<u8> for Status {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}
