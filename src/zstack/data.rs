//! Application data packets and send-handle bookkeeping.

use std::collections::HashSet;

use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::PayloadReader;
use crate::error::{Result, ZnpError};
use crate::protocol::MAX_PAYLOAD_SIZE;

/// Bytes of the send-data request that precede the payload.
const SEND_HEADER_LEN: usize = 8;

/// Largest application payload that fits in one send-data request.
pub const MAX_DATA_PAYLOAD: usize = MAX_PAYLOAD_SIZE - SEND_HEADER_LEN;

/// Short address that targets the bound device(s).
pub const BOUND_DESTINATION: u16 = 0xFFFE;

/// Short address that broadcasts to every device.
pub const BROADCAST_DESTINATION: u16 = 0xFFFF;

/// Data to send to another device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingPacket {
    pub destination: u16,
    pub command_id: u16,
    /// Correlates the send with its confirm.
    pub handle: u8,
    pub payload: Bytes,
}

impl OutgoingPacket {
    pub fn new(destination: u16, command_id: u16, handle: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            destination,
            command_id,
            handle,
            payload: payload.into(),
        }
    }

    /// Encode the send-data request payload.
    pub fn encode(&self, ack: bool, radius: u8) -> Result<Bytes> {
        if self.payload.len() > MAX_DATA_PAYLOAD {
            return Err(ZnpError::Parameter(format!(
                "Data payload is {} bytes, maximum is {}",
                self.payload.len(),
                MAX_DATA_PAYLOAD
            )));
        }

        let mut buf = BytesMut::with_capacity(SEND_HEADER_LEN + self.payload.len());
        buf.put_u16_le(self.destination);
        buf.put_u16_le(self.command_id);
        buf.put_u8(self.handle);
        buf.put_u8(ack as u8);
        buf.put_u8(radius);
        buf.put_u8(self.payload.len() as u8);
        buf.put_slice(&self.payload);
        Ok(buf.freeze())
    }
}

/// Data received from another device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingPacket {
    pub source: u16,
    pub command_id: u16,
    pub payload: Bytes,
}

impl IncomingPacket {
    /// Decode a receive-data indication payload.
    pub fn decode(payload: Bytes) -> Result<Self> {
        let mut reader = PayloadReader::new(payload, "receive data indication");
        let source = reader.u16_le()?;
        let command_id = reader.u16_le()?;
        let len = reader.u16_le()? as usize;
        let payload = reader.bytes(len)?;
        Ok(Self {
            source,
            command_id,
            payload,
        })
    }
}

/// Handles of sends that have not been confirmed yet.
#[derive(Debug, Default)]
pub(crate) struct HandleTracker {
    in_flight: HashSet<u8>,
}

impl HandleTracker {
    /// Fail if `handle` is already waiting for its confirm.
    pub(crate) fn check(&self, handle: u8) -> Result<()> {
        if self.in_flight.contains(&handle) {
            return Err(ZnpError::HandleInFlight(handle));
        }
        Ok(())
    }

    pub(crate) fn insert(&mut self, handle: u8) {
        self.in_flight.insert(handle);
    }

    /// Returns whether the handle was outstanding.
    pub(crate) fn release(&mut self, handle: u8) -> bool {
        self.in_flight.remove(&handle)
    }

    pub(crate) fn is_in_flight(&self, handle: u8) -> bool {
        self.in_flight.contains(&handle)
    }
}
