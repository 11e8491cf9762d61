//! Demonstration session management.
//!
//! A demonstration session is everything captured since the last reset. This
//! module ties validation, request metadata and storage together behind the
//! operations the HTTP layer exposes.

/// Submodule for the session manager implementation.
pub mod session_manager;
/// Submodule for export documents.
pub mod types;

pub use session_manager::SessionManager;
pub use types::ExportDocument;
