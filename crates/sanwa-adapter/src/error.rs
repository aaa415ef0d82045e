//! Error types for the adapter runtime.

use sanwa_hid_protocol::{PortIndex, SanwaError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::sink::PortHandle;

/// The host input subsystem refused to register a port.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("host refused to register {name}: {reason}")]
pub struct RegistrationError {
    pub name: String,
    pub reason: String,
}

impl RegistrationError {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Failed to start transport: {0}")]
    Start(String),

    #[error("Failed to open transport: {0}")]
    Open(String),

    #[error("Read failed: {0}")]
    Read(String),

    #[error("Write to output report {report_id} failed: {reason}")]
    Write { report_id: u8, reason: String },

    #[error("Transport disconnected")]
    Disconnected,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingError {
    #[error("No port is addressed by report id {0}")]
    UnknownPort(u8),
}

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Unsupported device {vendor_id:04x}:{product_id:04x}")]
    UnknownDevice { vendor_id: u16, product_id: u16 },

    #[error("Failed to register {port}: {source}")]
    Registration {
        port: PortIndex,
        #[source]
        source: RegistrationError,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("{0} has no rumble capability")]
    RumbleUnsupported(PortIndex),

    #[error("No port owns handle {0}")]
    UnknownHandle(PortHandle),

    #[error("Adapter is shut down")]
    Closed,

    #[error("Decode error: {0}")]
    Decode(#[from] SanwaError),

    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type AdapterResult<T> = Result<T, AdapterError>;
