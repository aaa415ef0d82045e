//! Shared test utilities for the Sanwa adapter crates.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with good error messages and `#[track_caller]`
//! - [`fixtures`] - Raw input report builders
//! - [`prelude`] - Convenience re-exports
//!
//! ```rust,ignore
//! use sanwa_test_helpers::prelude::*;
//! ```

#![deny(unsafe_op_in_unsafe_fn)]

pub mod fixtures;
pub mod must;
pub mod prelude;

pub use must::*;
