//! Application endpoint registration.

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ZnpError};

/// Maximum number of command ids in each direction.
pub const MAX_COMMANDS: usize = 10;

const RESERVED: u8 = 0xFF;

/// Endpoint the application registers with the peer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    pub endpoint: u8,
    pub profile_id: u16,
    pub device_id: u16,
    pub device_version: u8,
    /// Command ids this endpoint consumes.
    #[serde(default)]
    pub input_commands: Vec<u16>,
    /// Command ids this endpoint produces.
    #[serde(default)]
    pub output_commands: Vec<u16>,
}

impl EndpointDescriptor {
    /// Create a descriptor with empty command lists.
    pub fn new(endpoint: u8, profile_id: u16, device_id: u16, device_version: u8) -> Self {
        Self {
            endpoint,
            profile_id,
            device_id,
            device_version,
            input_commands: Vec::new(),
            output_commands: Vec::new(),
        }
    }

    /// Set the input command list.
    pub fn inputs(mut self, commands: impl Into<Vec<u16>>) -> Self {
        self.input_commands = commands.into();
        self
    }

    /// Set the output command list.
    pub fn outputs(mut self, commands: impl Into<Vec<u16>>) -> Self {
        self.output_commands = commands.into();
        self
    }

    /// Encode as the app-register payload.
    pub fn encode(&self) -> Result<Bytes> {
        check_list("input", &self.input_commands)?;
        check_list("output", &self.output_commands)?;

        let len = 8 + 2 * (self.input_commands.len() + self.output_commands.len());
        let mut buf = BytesMut::with_capacity(len);
        buf.put_u8(self.endpoint);
        buf.put_u16_le(self.profile_id);
        buf.put_u16_le(self.device_id);
        buf.put_u8(self.device_version);
        buf.put_u8(RESERVED);
        put_list(&mut buf, &self.input_commands);
        put_list(&mut buf, &self.output_commands);
        Ok(buf.freeze())
    }
}

fn check_list(direction: &str, commands: &[u16]) -> Result<()> {
    if commands.len() > MAX_COMMANDS {
        return Err(ZnpError::Parameter(format!(
            "{} {} commands exceed maximum {}",
            commands.len(),
            direction,
            MAX_COMMANDS
        )));
    }
    Ok(())
}

fn put_list(buf: &mut BytesMut, commands: &[u16]) {
    buf.put_u8(commands.len() as u8);
    for &id in commands {
        buf.put_u16_le(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let descriptor = EndpointDescriptor::new(1, 0x000A, 0x0001, 1)
            .inputs(vec![0x1234])
            .outputs(vec![0xABCD, 0xABCE]);

        let bytes = descriptor.encode().unwrap();
        assert_eq!(
            &bytes[..],
            &[
                0x01, 0x0A, 0x00, 0x01, 0x00, 0x01, 0xFF, // header
                0x01, 0x34, 0x12, // inputs
                0x02, 0xCD, 0xAB, 0xCE, 0xAB, // outputs
            ]
        );
    }

    #[test]
    fn test_empty_lists() {
        let bytes = EndpointDescriptor::new(8, 0x0104, 0x0002, 0).encode().unwrap();
        assert_eq!(bytes.len(), 9);
        assert_eq!(&bytes[7..], &[0x00, 0x00]);
    }

    #[test]
    fn test_too_many_commands() {
        let descriptor = EndpointDescriptor::new(1, 1, 1, 1).outputs(vec![0u16; 11]);
        assert!(matches!(descriptor.encode(), Err(ZnpError::Parameter(_))));

        let descriptor = EndpointDescriptor::new(1, 1, 1, 1).inputs(vec![0u16; 11]);
        assert!(matches!(descriptor.encode(), Err(ZnpError::Parameter(_))));

        let descriptor = EndpointDescriptor::new(1, 1, 1, 1)
            .inputs(vec![0u16; MAX_COMMANDS])
            .outputs(vec![0u16; MAX_COMMANDS]);
        assert_eq!(descriptor.encode().unwrap().len(), 48);
    }

    #[test]
    fn test_json_defaults_lists() {
        let json = r#"{"endpoint":1,"profile_id":10,"device_id":1,"device_version":1}"#;
        let descriptor: EndpointDescriptor = serde_json::from_str(json).unwrap();
        assert!(descriptor.input_commands.is_empty());
        assert!(descriptor.output_commands.is_empty());
    }
}
