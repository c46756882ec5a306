use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use syllabus_core::{project, SelectedFile, SubmissionState, UiProjection};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const RENDER_FALLBACK: &str = "Something went wrong while displaying the submission status.";

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Read the given paths as a file selection. Only PDFs are accepted; other
/// paths are skipped with a warning.
pub async fn pick_pdfs(paths: &[PathBuf]) -> anyhow::Result<Vec<SelectedFile>> {
    let mut selected = Vec::with_capacity(paths.len());
    for path in paths {
        if !is_pdf(path) {
            tracing::warn!(path = %path.display(), "Skipping non-PDF file");
            continue;
        }
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document.pdf");
        selected.push(SelectedFile::new(name, PDF_CONTENT_TYPE, bytes.into()));
    }
    Ok(selected)
}

/// One status line for a projected state.
pub fn render_line(view: &UiProjection) -> String {
    if let Some(error) = &view.error_text {
        return format!("error: {}", error);
    }
    let status = view.status_text.as_deref().unwrap_or(view.label);
    if view.percent_visible {
        format!("[{:>3}%] {}", view.percent_value, status)
    } else {
        status.to_string()
    }
}

#[derive(Serialize)]
struct StateEvent<'a> {
    #[serde(flatten)]
    state: &'a SubmissionState,
    view: UiProjection,
}

/// Render a state as a text line or a JSON object.
pub fn render_state(state: &SubmissionState, json: bool) -> anyhow::Result<String> {
    let view = project(state);
    if json {
        serde_json::to_string(&StateEvent { state, view }).context("Serialize state")
    } else {
        Ok(render_line(&view))
    }
}

/// Run a render function, replacing any fault with a static fallback line.
pub fn render_or_fallback<F>(render: F) -> String
where
    F: FnOnce() -> anyhow::Result<String>,
{
    match panic::catch_unwind(AssertUnwindSafe(render)) {
        Ok(Ok(line)) => line,
        Ok(Err(err)) => {
            tracing::error!(error = %err, "Render failed");
            RENDER_FALLBACK.to_string()
        }
        Err(_) => {
            tracing::error!("Render panicked");
            RENDER_FALLBACK.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn render_uploading_line() {
        let line = render_line(&project(&SubmissionState::Uploading(7)));
        assert_eq!(line, "[  7%] Uploading files... 7%");
    }

    #[test]
    fn render_failed_line() {
        let line = render_line(&project(&SubmissionState::Failed("boom".into())));
        assert_eq!(line, "error: boom");
    }

    #[test]
    fn render_idle_uses_label() {
        let line = render_line(&project(&SubmissionState::Idle));
        assert_eq!(line, "Generate");
    }

    #[test]
    fn render_json_includes_state_and_view() {
        let line = render_state(&SubmissionState::Uploading(50), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["state"], "uploading");
        assert_eq!(value["value"], 50);
        assert_eq!(value["view"]["percent_value"], 50);
        assert_eq!(value["view"]["label"], "Generating...");
    }

    #[test]
    fn fallback_replaces_faults() {
        assert_eq!(render_or_fallback(|| Ok("fine".to_string())), "fine");
        assert_eq!(
            render_or_fallback(|| Err(anyhow::anyhow!("bad"))),
            RENDER_FALLBACK
        );
        assert_eq!(
            render_or_fallback(|| -> anyhow::Result<String> { panic!("render bug") }),
            RENDER_FALLBACK
        );
    }

    #[tokio::test]
    async fn pick_pdfs_skips_other_types() {
        let dir = tempdir().unwrap();
        let pdf = dir.path().join("Syllabus.PDF");
        let txt = dir.path().join("notes.txt");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();
        std::fs::write(&txt, b"hello").unwrap();

        let picked = pick_pdfs(&[pdf, txt]).await.unwrap();

        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].name, "Syllabus.PDF");
        assert_eq!(picked[0].content_type, PDF_CONTENT_TYPE);
        assert_eq!(&picked[0].bytes[..], b"%PDF-1.4");
    }

    #[tokio::test]
    async fn pick_pdfs_reports_missing_files() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.pdf");
        let err = pick_pdfs(&[missing]).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
