//! Syllabus Core Library
//!
//! Domain types, error taxonomy, configuration, response classification and
//! UI state projection shared by the API client and the CLI.

pub mod classify;
pub mod config;
pub mod error;
pub mod models;
pub mod projection;

// Re-export commonly used types
pub use classify::classify;
pub use config::ClientConfig;
pub use error::ValidationError;
pub use models::{
    ClassifiedOutput, FileSelectionStore, OperationTarget, OutputFormat, SelectedFile,
    SubmissionOptions, SubmissionState, UploadResult,
};
pub use projection::{project, UiProjection};
