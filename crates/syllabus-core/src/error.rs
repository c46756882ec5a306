//! Error types module
//!
//! Validation failures are raised before any network activity and are
//! handled locally by the caller. Transport and download errors live in the
//! API client crate next to the code that produces them.

/// Errors that block a submission before it reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Select at least one PDF file.")]
    NoFilesSelected,

    #[error("Invalid semester start date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}
