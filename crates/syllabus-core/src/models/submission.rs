use serde::{Deserialize, Serialize};

use super::selection::SubmissionOptions;

/// Which of the two remote operations a submission invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationTarget {
    /// `POST /syllabus`: documents in, summary document out.
    SyllabusOnly,
    /// `POST /generar`: documents plus optional `semester_start`, any output.
    Combined,
}

impl OperationTarget {
    pub fn from_options(options: &SubmissionOptions) -> Self {
        if options.schedule_attached {
            OperationTarget::Combined
        } else {
            OperationTarget::SyllabusOnly
        }
    }

    /// Path relative to the configured base URL.
    pub fn path(&self) -> &'static str {
        match self {
            OperationTarget::SyllabusOnly => "/syllabus",
            OperationTarget::Combined => "/generar",
        }
    }
}

impl std::fmt::Display for OperationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationTarget::SyllabusOnly => write!(f, "syllabus_only"),
            OperationTarget::Combined => write!(f, "combined"),
        }
    }
}

/// Lifecycle of one submission as a single tagged value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Uploading(u8),
    Finalizing,
    Succeeded(String),
    Failed(String),
}

impl SubmissionState {
    /// States from which a new submission may start.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::Idle | SubmissionState::Succeeded(_) | SubmissionState::Failed(_)
        )
    }

    pub fn is_in_flight(&self) -> bool {
        !self.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_follows_schedule_flag() {
        let plain = SubmissionOptions::default();
        assert_eq!(
            OperationTarget::from_options(&plain),
            OperationTarget::SyllabusOnly
        );
        assert_eq!(OperationTarget::SyllabusOnly.path(), "/syllabus");

        let scheduled = SubmissionOptions::new(true, None);
        assert_eq!(
            OperationTarget::from_options(&scheduled),
            OperationTarget::Combined
        );
        assert_eq!(OperationTarget::Combined.path(), "/generar");
    }

    #[test]
    fn only_terminal_states_accept_submissions() {
        assert!(SubmissionState::Idle.is_terminal());
        assert!(SubmissionState::Succeeded("a.pdf".into()).is_terminal());
        assert!(SubmissionState::Failed("boom".into()).is_terminal());
        assert!(SubmissionState::Validating.is_in_flight());
        assert!(SubmissionState::Uploading(40).is_in_flight());
        assert!(SubmissionState::Finalizing.is_in_flight());
    }

    #[test]
    fn state_serializes_tagged() {
        let json = serde_json::to_value(SubmissionState::Uploading(42)).unwrap();
        assert_eq!(json["state"], "uploading");
        assert_eq!(json["value"], 42);

        let json = serde_json::to_value(SubmissionState::Idle).unwrap();
        assert_eq!(json["state"], "idle");
    }
}
