use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Raw response from the remote service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadResult {
    pub bytes: Bytes,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
}

/// Kind of artifact the service returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Calendar,
    Summary,
    Bundle,
    Unknown,
}

/// Filename and format recovered from response metadata. The filename is
/// never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedOutput {
    pub filename: String,
    pub mime_type: String,
    pub format: OutputFormat,
}
