//! Sanwa two-port DualShock adapter HID protocol: input decoding and rumble encoding.
//!
//! The adapter (VID `0x0D9D`, PID `0x3012`) exposes two controller sockets
//! through one HID interface. Each input report starts with a report id
//! naming the socket (1 or 2), followed by four analog axis bytes and three
//! button bytes. Later hardware revisions accept a 4-byte rumble output
//! report per socket.
//!
//! This crate is intentionally I/O-free. Decoding and encoding are pure
//! functions over byte slices and fixed-size arrays, so they can be tested
//! without hardware.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod capabilities;
pub mod hat;
pub mod ids;
pub mod input;
pub mod output;
pub mod types;

pub use capabilities::{AbsAxisInfo, CapabilityDescriptor, RumbleCapability};
pub use hat::{HAT_CENTERED, HatDirection, hat_to_axes};
pub use ids::{PRODUCT_ID, VENDOR_ID, is_sanwa, product_name};
pub use input::{
    DecodedReport, InputDecoder, InputEvent, PortSnapshot, REPORT_LEN, SanwaInputReport,
    parse_input_report,
};
pub use output::{
    OutputChannel, RUMBLE_REPORT_LEN, RumbleReport, encode_rumble, encode_stop, scale_magnitude,
};
pub use types::{
    AXIS_BYTES, AxisId, AxisLayout, BUTTON_COUNT, ButtonId, ButtonMap, HardwareRevision,
    PortIndex,
};

use sanwa_hid_common::HidCommonError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SanwaError {
    #[error("Invalid report size: expected at least {expected}, got {actual}")]
    ReportTooShort { expected: usize, actual: usize },

    #[error("No port is addressed by report id {0}")]
    UnknownPort(u8),

    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),

    #[error("HID error: {0}")]
    Hid(#[from] HidCommonError),
}

pub type SanwaResult<T> = Result<T, SanwaError>;
