//! Common HID utilities for the Sanwa adapter crates
//!
//! This crate provides the small pieces shared between the protocol codec and
//! the runtime: a bounds-checked cursor over report bytes, a report builder
//! used by test fixtures, and the identity record of an enumerated HID
//! device.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod device_info;
pub mod report_parser;

pub use device_info::*;
pub use report_parser::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HidCommonError {
    #[error("Unexpected end of report: needed {needed} more byte(s) at offset {offset}")]
    UnexpectedEnd { offset: usize, needed: usize },
}

pub type HidCommonResult<T> = Result<T, HidCommonError>;
