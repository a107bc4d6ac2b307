//! Structured logging facility
//!
//! - Single initialization point via `init(profile)`
//! - Boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! `compare` owns the start/end events of a comparison. The differencer and
//! resolver only emit `tracing::debug!` events for internal details such as
//! truncated reference cycles or dangling references.
//!
//! # Usage
//!
//! ```rust
//! use schemadiff_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
