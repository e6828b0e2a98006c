//! Transport module - handshake-gated frame exchange with the peer.
//!
//! Provides:
//! - [`NpiTransport`] - passive receive, request/response, peer reset
//! - [`TransportConfig`] - handshake timeout and reset timings
//! - [`ResetInfo`] - the boot indication decoded after a reset

mod config;
mod npi;
mod wait;

pub use config::{
    TransportConfig, DEFAULT_BOOT_DELAY, DEFAULT_HANDSHAKE_TIMEOUT, DEFAULT_POLL_INTERVAL,
    DEFAULT_RESET_PULSE,
};
pub use npi::{NpiTransport, ResetInfo};
