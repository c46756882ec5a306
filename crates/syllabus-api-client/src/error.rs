//! Error types for the submission pipeline.

use std::path::PathBuf;

use syllabus_core::ValidationError;

/// The request could not complete, or the service answered with a failure status.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to build request: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Failed to send request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Saving the payload locally failed.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to save {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Save task failed: {0}")]
    Join(String),
}

/// Every way a call to `SubmissionController::submit` can fail.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("A submission is already in progress")]
    Busy,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Download(#[from] DownloadError),
}

impl SubmitError {
    /// Message shown to the user in the `Failed` state.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Busy => "A submission is already in progress.".to_string(),
            SubmitError::Validation(err) => err.to_string(),
            SubmitError::Transport(TransportError::Status { status, .. }) => format!(
                "The service could not generate the output (HTTP {}).",
                status.as_u16()
            ),
            SubmitError::Transport(_) => {
                "Could not reach the service. Check the API URL and try again.".to_string()
            }
            SubmitError::Download(err) => format!("Could not save the generated file: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_mention_the_code() {
        let err = SubmitError::from(TransportError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        });
        assert_eq!(
            err.user_message(),
            "The service could not generate the output (HTTP 502)."
        );
        assert!(err.to_string().contains("upstream down"));
    }

    #[test]
    fn validation_message_is_passed_through() {
        let err = SubmitError::from(ValidationError::NoFilesSelected);
        assert_eq!(err.user_message(), "Select at least one PDF file.");
    }
}
