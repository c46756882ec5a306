use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Wire format for `semester_start`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A document the user picked. Contents are opaque to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Shorthand for a PDF file, the only type the picker hands over.
    pub fn pdf(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self::new(name, "application/pdf", bytes.into())
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Ordered set of files the user intends to submit.
///
/// Only the file picker replaces the selection; the controller reads it
/// during a submission and clears it after a successful one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelectionStore {
    files: Vec<SelectedFile>,
}

impl FileSelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// File-picker callback: the new selection replaces the old one.
    pub fn on_files_selected(&mut self, files: Vec<SelectedFile>) {
        self.files = files;
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sum of all file sizes, used as the upload progress denominator.
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(SelectedFile::size).sum()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }
}

/// Auxiliary intent that changes which remote operation is invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionOptions {
    pub schedule_attached: bool,
    pub reference_date: Option<NaiveDate>,
}

impl SubmissionOptions {
    pub fn new(schedule_attached: bool, reference_date: Option<NaiveDate>) -> Self {
        Self {
            schedule_attached,
            reference_date,
        }
    }

    /// Parse a `YYYY-MM-DD` reference date.
    pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
        NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidDate(value.to_string()))
    }

    /// The date to transmit as `semester_start`, if any.
    ///
    /// The reference date only travels with a schedule attachment.
    pub fn semester_start(&self) -> Option<NaiveDate> {
        if self.schedule_attached {
            self.reference_date
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
