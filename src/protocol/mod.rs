//! Protocol module - wire format, command table, status codes and frames.
//!
//! This module implements the NPI framing shared by both directions:
//! - 3-byte header encoding/decoding
//! - Command identifiers split into frame type, subsystem and opcode
//! - The closed table of commands and indications the host understands
//! - Frame struct with typed accessors

mod command;
mod frame;
mod status;
mod wire_format;

pub use command::Command;
pub use frame::{build_frame, Frame};
pub use status::Status;
pub use wire_format::{
    cmd0, CommandId, FrameType, Header, Subsystem, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
