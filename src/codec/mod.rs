//! Codec module - encoding/decoding of payload fields.
//!
//! - [`LeCodec`] - little-endian scalars of 1, 2 or 4 bytes
//! - [`PayloadReader`] - bounds-checked sequential reads over a frame payload
//!
//! # Design
//!
//! Codecs are marker structs with static methods rather than trait objects.
//! Every typed command in [`crate::zstack`] builds its payload with
//! `bytes::BufMut` and reads responses through [`PayloadReader`].

mod le;
mod reader;

pub use le::{LeCodec, SCALAR_WIDTHS};
pub use reader::PayloadReader;
