//! Response classification
//!
//! Derives a local filename and an output format from the transport
//! metadata of a service response. `classify` is total: every input,
//! including a response with no headers at all, yields a usable filename.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::{ClassifiedOutput, OutputFormat, UploadResult};

pub const CALENDAR_FILENAME: &str = "calendario_unificado.ics";
pub const SUMMARY_FILENAME: &str = "resumen_syllabus.pdf";
pub const BUNDLE_FILENAME: &str = "resultados.zip";
pub const FALLBACK_FILENAME: &str = "download";
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

static FILENAME_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|;)\s*filename\s*=\s*(?:"([^"]*)"|([^;]*))"#)
        .expect("filename pattern is valid")
});

/// Classify a raw response into a filename, MIME type and format.
pub fn classify(result: &UploadResult) -> ClassifiedOutput {
    let content_type = result.content_type.as_deref().map(str::trim);
    let format = format_for(content_type);
    let mime_type = match content_type {
        Some(ct) if !ct.is_empty() => ct.to_string(),
        _ => FALLBACK_MIME_TYPE.to_string(),
    };

    if let Some(filename) = result
        .content_disposition
        .as_deref()
        .and_then(filename_from_disposition)
    {
        return ClassifiedOutput {
            filename,
            mime_type,
            format,
        };
    }

    let filename = match format {
        OutputFormat::Calendar => CALENDAR_FILENAME,
        OutputFormat::Summary => SUMMARY_FILENAME,
        OutputFormat::Bundle => BUNDLE_FILENAME,
        OutputFormat::Unknown => {
            tracing::debug!(
                content_type = ?result.content_type,
                "No routable response metadata, using fallback filename"
            );
            FALLBACK_FILENAME
        }
    };

    ClassifiedOutput {
        filename: filename.to_string(),
        mime_type,
        format,
    }
}

/// Extract the `filename=` value from a `Content-Disposition` header.
///
/// Returns `None` when there is no token or it is empty after trimming.
pub fn filename_from_disposition(disposition: &str) -> Option<String> {
    let captures = FILENAME_TOKEN.captures(disposition)?;
    let raw = captures.get(1).or_else(|| captures.get(2))?.as_str();
    let name = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Map a content type to an output format by prefix, ignoring case and parameters.
pub fn format_for(content_type: Option<&str>) -> OutputFormat {
    let Some(content_type) = content_type else {
        return OutputFormat::Unknown;
    };
    let normalized = content_type.trim().to_ascii_lowercase();
    if normalized.starts_with("text/calendar") {
        OutputFormat::Calendar
    } else if normalized.starts_with("application/pdf") {
        OutputFormat::Summary
    } else if normalized.starts_with("application/zip") {
        OutputFormat::Bundle
    } else {
        OutputFormat::Unknown
    }
}
