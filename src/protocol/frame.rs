//! Frame struct with typed accessors.
//!
//! Represents a complete NPI frame with header and payload.
//! Uses `bytes::Bytes` so frames can be cached and cloned cheaply.
//!
//! # Example
//!
//! ```
//! use znp_client::protocol::{CommandId, Frame};
//!
//! let frame = Frame::from_parts(CommandId::new(0x4683), &[0x07, 0x00]).unwrap();
//!
//! assert_eq!(frame.command().raw(), 0x4683);
//! assert_eq!(frame.payload(), &[0x07, 0x00]);
//! assert!(frame.is_indication());
//! ```

use bytes::Bytes;

use crate::error::{Result, ZnpError};

use super::command::Command;
use super::wire_format::{CommandId, FrameType, Header, HEADER_SIZE, MAX_PAYLOAD_SIZE};

/// A complete protocol frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Decoded header.
    pub header: Header,
    /// Payload bytes, exactly `header.length` long.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame from header and payload.
    pub fn new(header: Header, payload: Bytes) -> Self {
        debug_assert_eq!(header.payload_len(), payload.len());
        Self { header, payload }
    }

    /// Create a frame from an identifier and raw bytes (copies data).
    ///
    /// A payload longer than [`MAX_PAYLOAD_SIZE`] is [`ZnpError::FrameTooLarge`].
    pub fn from_parts(command: CommandId, payload: &[u8]) -> Result<Self> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(ZnpError::FrameTooLarge {
                length: payload.len(),
                capacity: MAX_PAYLOAD_SIZE,
            });
        }
        Ok(Self {
            header: Header::new(payload.len() as u8, command),
            payload: Bytes::copy_from_slice(payload),
        })
    }

    /// Get a reference to the payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get the payload length.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Get the command identifier.
    #[inline]
    pub fn command(&self) -> CommandId {
        self.header.command
    }

    /// Look the identifier up in the command table.
    pub fn known_command(&self) -> Option<Command> {
        Command::from_id(self.header.command)
    }

    /// Check if this is a synchronous response.
    #[inline]
    pub fn is_response(&self) -> bool {
        self.header.command.frame_type() == FrameType::Response
    }

    /// Check if this is an unsolicited indication.
    #[inline]
    pub fn is_indication(&self) -> bool {
        self.header.command.frame_type() == FrameType::Indication
    }
}

/// Build a complete frame as a single byte vector.
///
/// # Example
///
/// ```
/// use znp_client::protocol::{build_frame, CommandId};
///
/// let bytes = build_frame(CommandId::new(0x2602), &[0x10]);
/// assert_eq!(bytes, vec![0x01, 0x26, 0x02, 0x10]);
/// ```
pub fn build_frame(command: CommandId, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(&Header::new(payload.len() as u8, command).encode());
    buf.extend_from_slice(payload);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let frame = Frame::from_parts(CommandId::new(0x6605), &[0x00]).unwrap();

        assert_eq!(frame.command(), CommandId::new(0x6605));
        assert_eq!(frame.header.length, 1);
        assert_eq!(frame.payload(), &[0x00]);
        assert!(frame.is_response());
        assert!(!frame.is_indication());
    }

    #[test]
    fn test_frame_empty_payload() {
        let frame = Frame::new(Header::new(0, CommandId::new(0x6600)), Bytes::new());

        assert_eq!(frame.payload_len(), 0);
        assert!(frame.payload().is_empty());
    }

    #[test]
    fn test_known_command() {
        let frame = Frame::from_parts(CommandId::new(0x45C0), &[0x06]).unwrap();
        assert_eq!(frame.known_command(), Some(Command::ZdoStateChangeInd));

        let frame = Frame::from_parts(CommandId::new(0x4FFF), &[]).unwrap();
        assert_eq!(frame.known_command(), None);
    }

    #[test]
    fn test_from_parts_rejects_oversized_payload() {
        let frame = Frame::from_parts(CommandId::new(0x4687), &[0u8; MAX_PAYLOAD_SIZE]).unwrap();
        assert_eq!(frame.payload_len(), MAX_PAYLOAD_SIZE);

        let err = Frame::from_parts(CommandId::new(0x4687), &[0u8; MAX_PAYLOAD_SIZE + 1])
            .unwrap_err();
        assert!(matches!(
            err,
            ZnpError::FrameTooLarge {
                length: 101,
                capacity: MAX_PAYLOAD_SIZE
            }
        ));
    }

    #[test]
    fn test_build_frame_matches_header() {
        let bytes = build_frame(CommandId::new(0x2604), &[0x83]);

        assert_eq!(bytes.len(), HEADER_SIZE + 1);
        let header = Header::decode(&bytes).unwrap();
        assert_eq!(header.length, 1);
        assert_eq!(header.command.raw(), 0x2604);
        assert_eq!(&bytes[HEADER_SIZE..], &[0x83]);
    }
}
