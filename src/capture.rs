//! Capture subsystem
//!
//! Turns an untrusted form submission into a record ready for storage.
//!
//! Components:
//! - `submission`: body validation with field-level violations.
//! - `client_meta`: origin address and agent derived from request headers.
//! - `scenario`: the closed set of demonstration scenarios and their teaching data.

pub mod client_meta;
pub mod scenario;
pub mod submission;

pub use client_meta::ClientMeta;
pub use scenario::Scenario;
pub use submission::CaptureSubmission;
