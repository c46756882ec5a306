//! Data models for the application
//!
//! Everything here lives for at most one submission cycle: the file
//! selection and options owned by the presentation layer, the request
//! routing target, the raw response and its classification, and the
//! single-variant submission state.

mod output;
mod selection;
mod submission;

// Re-export all models for convenient imports
pub use output::*;
pub use selection::*;
pub use submission::*;
