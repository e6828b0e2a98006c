//! The peer's command table.
//!
//! Identifiers are mirrored bit-for-bit from the Z-Stack ZNP interface.
//! Requests map to their responses through [`Command::response`]; frames
//! read off the wire are matched back with [`Command::from_id`].

use super::wire_format::{CommandId, FrameType};

/// Every command and indication the host knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // System interface
    SysResetReq,
    SysResetInd,
    SysVersion,
    SysOsalNvItemInit,
    SysOsalNvRead,
    SysOsalNvWrite,
    SysRandom,
    SysAdcRead,
    SysGpio,
    SysSetTime,
    SysGetTime,
    SysOsalNvDelete,
    SysOsalNvLength,
    SysSetTxPower,

    // Configuration interface
    ZbReadConfiguration,
    ZbWriteConfiguration,

    // Simple API
    ZbAppRegisterRequest,
    ZbStartRequest,
    ZbPermitJoiningRequest,
    ZbBindDevice,
    ZbAllowBind,
    ZbSendDataRequest,
    ZbGetDeviceInfo,
    ZbFindDeviceRequest,

    // Simple API callbacks
    ZbStartConfirm,
    ZbBindConfirm,
    ZbAllowBindConfirm,
    ZbSendDataConfirm,
    ZbFindDeviceConfirm,
    ZbReceiveDataIndication,

    // ZDO callbacks
    ZdoStateChangeInd,
}

impl Command {
    /// All known commands, in table order.
    pub const ALL: [Command; 31] = [
        Command::SysResetReq,
        Command::SysResetInd,
        Command::SysVersion,
        Command::SysOsalNvItemInit,
        Command::SysOsalNvRead,
        Command::SysOsalNvWrite,
        Command::SysRandom,
        Command::SysAdcRead,
        Command::SysGpio,
        Command::SysSetTime,
        Command::SysGetTime,
        Command::SysOsalNvDelete,
        Command::SysOsalNvLength,
        Command::SysSetTxPower,
        Command::ZbReadConfiguration,
        Command::ZbWriteConfiguration,
        Command::ZbAppRegisterRequest,
        Command::ZbStartRequest,
        Command::ZbPermitJoiningRequest,
        Command::ZbBindDevice,
        Command::ZbAllowBind,
        Command::ZbSendDataRequest,
        Command::ZbGetDeviceInfo,
        Command::ZbFindDeviceRequest,
        Command::ZbStartConfirm,
        Command::ZbBindConfirm,
        Command::ZbAllowBindConfirm,
        Command::ZbSendDataConfirm,
        Command::ZbFindDeviceConfirm,
        Command::ZbReceiveDataIndication,
        Command::ZdoStateChangeInd,
    ];

    /// Identifier as sent on the wire.
    pub fn id(self) -> CommandId {
        CommandId::new(match self {
            Command::SysResetReq => 0x4100,
            Command::SysResetInd => 0x4180,
            Command::SysVersion => 0x2102,
            Command::SysOsalNvItemInit => 0x2107,
            Command::SysOsalNvRead => 0x2108,
            Command::SysOsalNvWrite => 0x2109,
            Command::SysRandom => 0x210C,
            Command::SysAdcRead => 0x210D,
            Command::SysGpio => 0x210E,
            Command::SysSetTime => 0x2110,
            Command::SysGetTime => 0x2111,
            Command::SysOsalNvDelete => 0x2112,
            Command::SysOsalNvLength => 0x2113,
            Command::SysSetTxPower => 0x2114,
            Command::ZbReadConfiguration => 0x2604,
            Command::ZbWriteConfiguration => 0x2605,
            Command::ZbAppRegisterRequest => 0x260A,
            Command::ZbStartRequest => 0x2600,
            Command::ZbPermitJoiningRequest => 0x2608,
            Command::ZbBindDevice => 0x2601,
            Command::ZbAllowBind => 0x2602,
            Command::ZbSendDataRequest => 0x2603,
            Command::ZbGetDeviceInfo => 0x2606,
            Command::ZbFindDeviceRequest => 0x2607,
            Command::ZbStartConfirm => 0x4680,
            Command::ZbBindConfirm => 0x4681,
            Command::ZbAllowBindConfirm => 0x4682,
            Command::ZbSendDataConfirm => 0x4683,
            Command::ZbFindDeviceConfirm => 0x4685,
            Command::ZbReceiveDataIndication => 0x4687,
            Command::ZdoStateChangeInd => 0x45C0,
        })
    }

    /// Look up a request or indication by its identifier.
    ///
    /// Responses are not in the table; match them with [`Command::response`].
    pub fn from_id(id: CommandId) -> Option<Self> {
        Command::ALL.into_iter().find(|command| command.id() == id)
    }

    /// Whether this command is answered by a synchronous response.
    #[inline]
    pub fn is_request(self) -> bool {
        self.id().frame_type() == FrameType::Request
    }

    /// Whether the peer sends this unsolicited.
    #[inline]
    pub fn is_indication(self) -> bool {
        self.id().frame_type() == FrameType::Indication
    }

    /// Identifier of the synchronous response, for requests.
    pub fn response(self) -> Option<CommandId> {
        self.is_request().then(|| self.id().response())
    }
}

impl From<Command> for CommandId {
    fn from(command: Command) -> Self {
        command.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_round_trip() {
        for command in Command::ALL {
            assert_eq!(Command::from_id(command.id()), Some(command));
        }
        assert_eq!(Command::from_id(CommandId::new(0x6605)), None);
    }

    #[test]
    fn test_request_responses() {
        assert_eq!(
            Command::ZbWriteConfiguration.response(),
            Some(CommandId::new(0x6605))
        );
        assert_eq!(
            Command::ZbAppRegisterRequest.response(),
            Some(CommandId::new(0x660A))
        );
        assert_eq!(
            Command::SysVersion.response(),
            Some(CommandId::new(0x6102))
        );
        assert_eq!(Command::ZbStartConfirm.response(), None);
    }

    #[test]
    fn test_reset_request_is_asynchronous() {
        // The reset request is an AREQ: no synchronous response follows.
        assert!(!Command::SysResetReq.is_request());
        assert!(Command::SysResetInd.is_indication());
    }

    #[test]
    fn test_indications() {
        let indications: Vec<_> = Command::ALL
            .into_iter()
            .filter(|c| c.is_indication())
            .collect();
        assert_eq!(indications.len(), 9);
        assert!(indications.contains(&Command::ZdoStateChangeInd));
    }
}
