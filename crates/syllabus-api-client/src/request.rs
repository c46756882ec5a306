//! Multipart request construction.

use chrono::NaiveDate;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use syllabus_core::models::DATE_FORMAT;
use syllabus_core::{OperationTarget, SelectedFile, SubmissionOptions};

use crate::error::TransportError;
use crate::progress::{reporting_stream, ProgressSender};

pub const FILES_FIELD: &str = "files";
pub const SEMESTER_START_FIELD: &str = "semester_start";

/// A ready-to-send submission: one `files` part per selected file plus
/// `semester_start` when the options call for it.
#[derive(Debug)]
pub struct SubmissionRequest {
    pub target: OperationTarget,
    pub form: Form,
    /// Bytes of file content in the body, the progress denominator.
    pub total_bytes: u64,
    pub semester_start: Option<NaiveDate>,
}

impl SubmissionRequest {
    pub fn build(
        files: &[SelectedFile],
        options: &SubmissionOptions,
        progress: ProgressSender,
    ) -> Result<Self, TransportError> {
        let target = OperationTarget::from_options(options);
        let semester_start = options.semester_start();

        let mut form = Form::new();
        let mut total_bytes = 0u64;
        for file in files {
            let length = file.size();
            let body = Body::wrap_stream(reporting_stream(file.bytes.clone(), progress.clone()));
            let part = Part::stream_with_length(body, length)
                .file_name(file.name.clone())
                .mime_str(&file.content_type)
                .map_err(TransportError::Build)?;
            form = form.part(FILES_FIELD, part);
            total_bytes += length;
        }

        if let Some(date) = semester_start {
            form = form.text(SEMESTER_START_FIELD, date.format(DATE_FORMAT).to_string());
        }

        Ok(Self {
            target,
            form,
            total_bytes,
            semester_start,
        })
    }
}
