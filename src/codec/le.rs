//! Little-endian scalar codec.
//!
//! Configuration values, addresses and command ids inside payloads are all
//! little-endian, in widths of 1, 2 or 4 bytes.
//!
//! # Example
//!
//! ```
//! use znp_client::codec::LeCodec;
//!
//! let encoded = LeCodec::encode(0xFFFF, 2).unwrap();
//! assert_eq!(&encoded[..], &[0xFF, 0xFF]);
//! assert_eq!(LeCodec::decode(&encoded).unwrap(), 0xFFFF);
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Result, ZnpError};

/// Widths a scalar may be encoded in.
pub const SCALAR_WIDTHS: [usize; 3] = [1, 2, 4];

/// Codec for little-endian unsigned scalars.
pub struct LeCodec;

impl LeCodec {
    /// Encode `value` into exactly `width` bytes.
    ///
    /// Fails if the width is not 1, 2 or 4, or if the value does not fit.
    pub fn encode(value: u32, width: usize) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(width);
        Self::encode_into(&mut buf, value, width)?;
        Ok(buf.freeze())
    }

    /// Append `value` to `buf` in exactly `width` bytes.
    pub fn encode_into<B: BufMut>(buf: &mut B, value: u32, width: usize) -> Result<()> {
        if !SCALAR_WIDTHS.contains(&width) {
            return Err(ZnpError::Parameter(format!(
                "Scalar width {} is not 1, 2 or 4",
                width
            )));
        }
        if !Self::fits(value, width) {
            return Err(ZnpError::Parameter(format!(
                "Value {:#X} does not fit in {} byte(s)",
                value, width
            )));
        }
        buf.put_uint_le(u64::from(value), width);
        Ok(())
    }

    /// Decode a 1, 2 or 4 byte little-endian value.
    pub fn decode(bytes: &[u8]) -> Result<u32> {
        if !SCALAR_WIDTHS.contains(&bytes.len()) {
            return Err(ZnpError::Protocol(format!(
                "Scalar width {} is not 1, 2 or 4",
                bytes.len()
            )));
        }
        Ok(bytes
            .iter()
            .rev()
            .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte)))
    }

    /// Check whether `value` is representable in `width` bytes.
    #[inline]
    pub fn fits(value: u32, width: usize) -> bool {
        width >= 4 || value >> (8 * width) == 0
    }
}
