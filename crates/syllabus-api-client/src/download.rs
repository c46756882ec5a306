//! Local download trigger
//!
//! The payload is written into a temporary file inside the download
//! directory and only renamed to its final name once fully flushed. The
//! temporary file is removed when its handle drops, so an error on any path
//! before the rename leaves nothing behind.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use syllabus_core::classify::FALLBACK_FILENAME;

use crate::error::DownloadError;

/// Suffixes tried as `name (n).ext` before giving up on a free name.
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Where a payload ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedDownload {
    pub path: PathBuf,
    pub filename: String,
    pub mime_type: String,
    pub size: u64,
}

/// Materializes a binary payload as a local file.
#[async_trait]
pub trait DownloadTrigger: Send + Sync {
    async fn save(
        &self,
        bytes: Bytes,
        mime_type: &str,
        filename: &str,
    ) -> Result<SavedDownload, DownloadError>;
}

/// Saves downloads into a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalDownloads {
    dir: PathBuf,
}

impl LocalDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DownloadTrigger for LocalDownloads {
    async fn save(
        &self,
        bytes: Bytes,
        mime_type: &str,
        filename: &str,
    ) -> Result<SavedDownload, DownloadError> {
        let dir = self.dir.clone();
        let name = sanitize_filename(filename);
        let size = bytes.len() as u64;

        let path = tokio::task::spawn_blocking(move || write_download(&dir, &name, &bytes))
            .await
            .map_err(|e| DownloadError::Join(e.to_string()))??;

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(FALLBACK_FILENAME)
            .to_string();

        tracing::info!(path = %path.display(), size, mime_type, "Saved download");

        Ok(SavedDownload {
            path,
            filename,
            mime_type: mime_type.to_string(),
            size,
        })
    }
}

/// Reduce a server-supplied name to a plain file name inside the download directory.
pub fn sanitize_filename(filename: &str) -> String {
    let normalized = filename.replace('\\', "/");
    let name = Path::new(&normalized)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");
    let name: String = name.chars().filter(|c| !c.is_control()).collect();
    let name = name.trim();

    if name.is_empty() || name == "." || name == ".." {
        FALLBACK_FILENAME.to_string()
    } else {
        name.to_string()
    }
}

/// `report.pdf` -> `report (2).pdf`
fn candidate_name(filename: &str, attempt: u32) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{} ({}).{}", stem, attempt, ext),
        None => format!("{} ({})", stem, attempt),
    }
}

fn write_download(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
    std::fs::create_dir_all(dir)?;

    let mut handle = tempfile::Builder::new()
        .prefix(".syllabus-")
        .suffix(".part")
        .tempfile_in(dir)?;
    handle.write_all(bytes)?;
    handle.as_file().sync_all()?;

    let mut attempt = 0;
    loop {
        let target = dir.join(candidate_name(filename, attempt));
        match handle.persist_noclobber(&target) {
            Ok(_) => return Ok(target),
            Err(err)
                if err.error.kind() == io::ErrorKind::AlreadyExists
                    && attempt < MAX_NAME_ATTEMPTS =>
            {
                handle = err.file;
                attempt += 1;
            }
            Err(err) => {
                return Err(DownloadError::Persist {
                    path: target,
                    source: err.error,
                })
            }
        }
    }
}
