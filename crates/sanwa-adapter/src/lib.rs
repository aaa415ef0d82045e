//! Runtime core for the Sanwa two-port DualShock adapter.
//!
//! [`SanwaAdapter`] sits between a raw HID transport and the host's input
//! subsystem. It probes the device, registers one logical gamepad per
//! socket, routes decoded input reports to the right port and forwards
//! force-feedback requests to the adapter through a per-port serialized
//! [`RumbleDispatcher`].
//!
//! The transport and the host input sink are collaborators passed in by the
//! caller (see [`Transport`] and [`InputSink`]); [`mock`] provides recording
//! implementations of both for tests.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod adapter;
pub mod config;
pub mod error;
pub mod mock;
pub mod port;
pub mod registry;
pub mod rumble;
pub mod sink;
pub mod transport;

pub use adapter::SanwaAdapter;
pub use config::{AdapterConfig, ButtonMapConfig, ButtonMapPreset, ConfigError};
pub use error::{AdapterError, AdapterResult, RegistrationError, RoutingError, TransportError};
pub use port::Port;
pub use registry::PortRegistry;
pub use rumble::RumbleDispatcher;
pub use sink::{InputSink, PortHandle, PortRegistration};
pub use transport::Transport;
