//! Simple-API command layer.
//!
//! Provides:
//! - [`SimpleApi`] - configuration, network, binding and data operations
//! - [`NetworkProfile`] - declarative bring-up parameters
//! - Typed payloads for requests, responses and indications

mod api;
mod config;
mod data;
mod device;
mod endpoint;
mod indication;
mod network;
mod profile;

pub use api::{SimpleApi, SimpleApiBuilder};
pub use config::{ChannelMask, ConfigItem, ConfigValue, LogicalType, StartOption};
pub use data::{
    IncomingPacket, OutgoingPacket, BOUND_DESTINATION, BROADCAST_DESTINATION, MAX_DATA_PAYLOAD,
};
pub use device::{BindConfirm, DeviceInfo, DeviceInfoParam, DeviceState, FoundDevice};
pub use endpoint::{EndpointDescriptor, MAX_COMMANDS};
pub use indication::{Indication, IndicationKind, Polled};
pub use network::NetworkState;
pub use profile::{NetworkProfile, DEFAULT_START_TIMEOUT_MS};
