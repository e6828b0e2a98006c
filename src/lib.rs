//! # znp-client
//!
//! Host-side driver for a Z-Stack network processor (ZNP) reached over the
//! SPI Network Processor Interface.
//!
//! The host is master of the SPI bus; the peer signals when it has data or
//! is ready to answer through a dedicated ready line.
//!
//! ## Architecture
//!
//! - **HAL** ([`hal`]): the four lines and the byte-exchange channel, supplied by the caller
//! - **Transport** ([`transport`]): handshake-gated frames, `len | cmd0 | cmd1 | payload`
//! - **Command layer** ([`zstack`]): configuration, network, binding and data operations
//!
//! ## Example
//!
//! ```ignore
//! use znp_client::zstack::{NetworkProfile, OutgoingPacket, SimpleApi};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> znp_client::Result<()> {
//!     let mut api = SimpleApi::new(pins, spi);
//!     api.bring_up(&NetworkProfile::default()).await?;
//!
//!     let packet = OutgoingPacket::new(0x0000, 0xABCD, 1, vec![0x01, 0x02]);
//!     api.send_and_confirm(&packet, true, 0x0F, Duration::from_secs(5)).await?;
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod error;
pub mod hal;
pub mod protocol;
pub mod transport;
pub mod zstack;

pub use error::{Result, ZnpError};
pub use transport::NpiTransport;
pub use zstack::SimpleApi;
