//! Classification of asynchronous indications.

use std::fmt;

use bytes::Bytes;

use crate::protocol::{Command, CommandId, Frame};

/// Indications the command layer recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicationKind {
    StartConfirm,
    StateChange,
    BindConfirm,
    AllowBindConfirm,
    SendDataConfirm,
    ReceiveData,
    FindDeviceConfirm,
}

impl IndicationKind {
    /// Classify an identifier; `None` if it is not a recognized indication.
    pub fn from_id(id: CommandId) -> Option<Self> {
        match Command::from_id(id)? {
            Command::ZbStartConfirm => Some(IndicationKind::StartConfirm),
            Command::ZdoStateChangeInd => Some(IndicationKind::StateChange),
            Command::ZbBindConfirm => Some(IndicationKind::BindConfirm),
            Command::ZbAllowBindConfirm => Some(IndicationKind::AllowBindConfirm),
            Command::ZbSendDataConfirm => Some(IndicationKind::SendDataConfirm),
            Command::ZbReceiveDataIndication => Some(IndicationKind::ReceiveData),
            Command::ZbFindDeviceConfirm => Some(IndicationKind::FindDeviceConfirm),
            _ => None,
        }
    }

    /// Identifier of this indication.
    pub fn command(self) -> Command {
        match self {
            IndicationKind::StartConfirm => Command::ZbStartConfirm,
            IndicationKind::StateChange => Command::ZdoStateChangeInd,
            IndicationKind::BindConfirm => Command::ZbBindConfirm,
            IndicationKind::AllowBindConfirm => Command::ZbAllowBindConfirm,
            IndicationKind::SendDataConfirm => Command::ZbSendDataConfirm,
            IndicationKind::ReceiveData => Command::ZbReceiveDataIndication,
            IndicationKind::FindDeviceConfirm => Command::ZbFindDeviceConfirm,
        }
    }
}

impl fmt::Display for IndicationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndicationKind::StartConfirm => "start confirm",
            IndicationKind::StateChange => "state change",
            IndicationKind::BindConfirm => "bind confirm",
            IndicationKind::AllowBindConfirm => "allow-bind confirm",
            IndicationKind::SendDataConfirm => "send-data confirm",
            IndicationKind::ReceiveData => "receive data",
            IndicationKind::FindDeviceConfirm => "find-device confirm",
        };
        f.write_str(name)
    }
}

/// A classified indication held until the next one replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indication {
    pub kind: IndicationKind,
    pub payload: Bytes,
}

impl Indication {
    /// Classify a frame; `None` for anything that is not a recognized indication.
    pub fn classify(frame: &Frame) -> Option<Self> {
        IndicationKind::from_id(frame.command()).map(|kind| Self {
            kind,
            payload: frame.payload.clone(),
        })
    }
}

/// Result of one `poll_indication` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polled {
    /// The peer had nothing pending.
    Nothing,
    /// A recognized indication was cached.
    Indication(IndicationKind),
    /// A frame arrived but is not a recognized indication; the cache is untouched.
    Unrecognized(CommandId),
}

impl Polled {
    /// The cached kind, if a recognized indication arrived.
    pub fn kind(self) -> Option<IndicationKind> {
        match self {
            Polled::Indication(kind) => Some(kind),
            _ => None,
        }
    }
}
