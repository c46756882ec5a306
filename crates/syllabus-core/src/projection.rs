//! UI state projection
//!
//! The presentation layer never tracks loading/progress/status/error flags
//! of its own. It renders whatever `project` derives from the current
//! `SubmissionState`, so every render is consistent with the controller.

use serde::Serialize;

use crate::models::SubmissionState;

pub const LABEL_READY: &str = "Generate";
pub const LABEL_BUSY: &str = "Generating...";

/// Everything the presentation layer shows for one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiProjection {
    pub label: &'static str,
    pub submit_enabled: bool,
    pub percent_visible: bool,
    pub percent_value: u8,
    pub status_text: Option<String>,
    pub error_text: Option<String>,
}

/// Pure projection from submission state to view data.
pub fn project(state: &SubmissionState) -> UiProjection {
    let label = if state.is_in_flight() {
        LABEL_BUSY
    } else {
        LABEL_READY
    };

    let (percent_visible, percent_value) = match state {
        SubmissionState::Uploading(percent) => (true, (*percent).min(100)),
        SubmissionState::Finalizing => (true, 100),
        _ => (false, 0),
    };

    let status_text = match state {
        SubmissionState::Idle | SubmissionState::Failed(_) => None,
        SubmissionState::Validating => Some("Checking selected files...".to_string()),
        SubmissionState::Uploading(percent) => {
            Some(format!("Uploading files... {}%", (*percent).min(100)))
        }
        SubmissionState::Finalizing => Some("Processing response...".to_string()),
        SubmissionState::Succeeded(filename) => Some(format!("Downloaded {}", filename)),
    };

    let error_text = match state {
        SubmissionState::Failed(message) => Some(message.clone()),
        _ => None,
    };

    UiProjection {
        label,
        submit_enabled: state.is_terminal(),
        percent_visible,
        percent_value,
        status_text,
        error_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_shows_nothing() {
        let view = project(&SubmissionState::Idle);
        assert_eq!(view.label, LABEL_READY);
        assert!(view.submit_enabled);
        assert!(!view.percent_visible);
        assert_eq!(view.status_text, None);
        assert_eq!(view.error_text, None);
    }

    #[test]
    fn uploading_shows_percent_and_disables_submit() {
        let view = project(&SubmissionState::Uploading(37));
        assert_eq!(view.label, LABEL_BUSY);
        assert!(!view.submit_enabled);
        assert!(view.percent_visible);
        assert_eq!(view.percent_value, 37);
        assert_eq!(view.status_text.as_deref(), Some("Uploading files... 37%"));
        assert_eq!(view.error_text, None);
    }

    #[test]
    fn out_of_range_percent_is_clamped() {
        let view = project(&SubmissionState::Uploading(250));
        assert_eq!(view.percent_value, 100);
    }

    #[test]
    fn finalizing_is_busy_at_full_progress() {
        let view = project(&SubmissionState::Finalizing);
        assert!(!view.submit_enabled);
        assert_eq!(view.percent_value, 100);
    }

    #[test]
    fn failed_has_error_and_no_progress() {
        let view = project(&SubmissionState::Failed("Service unavailable".into()));
        assert!(view.submit_enabled);
        assert!(!view.percent_visible);
        assert_eq!(view.status_text, None);
        assert_eq!(view.error_text.as_deref(), Some("Service unavailable"));
    }

    #[test]
    fn succeeded_reports_filename() {
        let view = project(&SubmissionState::Succeeded("resultados.zip".into()));
        assert_eq!(view.label, LABEL_READY);
        assert_eq!(view.status_text.as_deref(), Some("Downloaded resultados.zip"));
        assert_eq!(view.error_text, None);
    }

    #[test]
    fn projection_is_repeatable() {
        let state = SubmissionState::Uploading(5);
        assert_eq!(project(&state), project(&state));
    }
}
