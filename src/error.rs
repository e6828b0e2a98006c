//! Error types for znp-client.

use std::time::Duration;

use thiserror::Error;

use crate::hal::Line;
use crate::protocol::{CommandId, Status};
use crate::zstack::IndicationKind;

/// Main error type for all transport and Simple API operations.
#[derive(Debug, Error)]
pub enum ZnpError {
    /// The byte-exchange primitive failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request arguments were rejected before any line was touched.
    #[error("Parameter error: {0}")]
    Parameter(String),

    /// A handshake line never reached the expected level.
    #[error("Timed out after {waited:?} waiting for {signal:?}")]
    TransportTimeout {
        /// Line that was being sampled.
        signal: Line,
        /// Time spent waiting before giving up.
        waited: Duration,
    },

    /// The peer answered with a frame other than the one expected.
    #[error("Unexpected frame: expected {expected}, got {actual}")]
    UnexpectedFrame {
        /// Identifier the caller was waiting for.
        expected: CommandId,
        /// Identifier actually received.
        actual: CommandId,
    },

    /// The peer returned a non-success status byte.
    #[error("Peer returned status {0}")]
    ProtocolStatus(Status),

    /// The peer declared a payload longer than the receive capacity.
    #[error("Frame length {length} exceeds capacity {capacity}")]
    FrameTooLarge {
        /// Length byte reported by the peer.
        length: usize,
        /// Fixed receive capacity.
        capacity: usize,
    },

    /// A frame carried a payload that does not match its command layout.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A decode accessor was called against a different cached indication.
    #[error("Cached indication is {found:?}, not {expected:?}")]
    TypeMismatch {
        /// Kind the accessor decodes.
        expected: IndicationKind,
        /// Kind currently cached.
        found: IndicationKind,
    },

    /// No indication has been classified yet.
    #[error("No indication cached")]
    NoIndication,

    /// A send-data confirmation belongs to another handle.
    #[error("Send confirm is for handle {actual}, not {expected}")]
    HandleMismatch {
        /// Handle the caller asked about.
        expected: u8,
        /// Handle carried by the cached confirm.
        actual: u8,
    },

    /// A send with this handle is still awaiting its confirmation.
    #[error("Handle {0} already has an unconfirmed send")]
    HandleInFlight(u8),

    /// Network profile (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ZnpError {
    /// Whether the link is in an unknown state and the peer should be reset.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ZnpError::FrameTooLarge { .. })
    }

    /// Whether the caller may retry the same operation with its own backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ZnpError::TransportTimeout { .. } | ZnpError::ProtocolStatus(_)
        )
    }
}

/// Result type alias using ZnpError.
pub type Result<T> = std::result::Result<T, ZnpError>;
