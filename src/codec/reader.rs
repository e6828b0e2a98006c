//! Bounds-checked payload reader.
//!
//! Wraps `bytes::Buf` so that a short payload turns into a
//! [`ZnpError::Protocol`] instead of a panic.

use bytes::{Buf, Bytes};

use crate::error::{Result, ZnpError};

/// Sequential reader over a frame payload.
pub struct PayloadReader {
    buf: Bytes,
    context: &'static str,
}

impl PayloadReader {
    /// Create a reader; `context` names the payload in error messages.
    pub fn new(buf: Bytes, context: &'static str) -> Self {
        Self { buf, context }
    }

    fn need(&self, n: usize) -> Result<()> {
        if self.buf.remaining() < n {
            return Err(ZnpError::Protocol(format!(
                "{} payload truncated: need {} more byte(s), have {}",
                self.context,
                n,
                self.buf.remaining()
            )));
        }
        Ok(())
    }

    /// Read one byte.
    pub fn u8(&mut self) -> Result<u8> {
        self.need(1)?;
        Ok(self.buf.get_u8())
    }

    /// Read a little-endian u16.
    pub fn u16_le(&mut self) -> Result<u16> {
        self.need(2)?;
        Ok(self.buf.get_u16_le())
    }

    /// Read a fixed-size array.
    pub fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.need(N)?;
        let mut out = [0u8; N];
        self.buf.copy_to_slice(&mut out);
        Ok(out)
    }

    /// Split off the next `n` bytes without copying.
    pub fn bytes(&mut self, n: usize) -> Result<Bytes> {
        self.need(n)?;
        Ok(self.buf.split_to(n))
    }

    /// Bytes left unread.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }
}
