//! HTTP client for the syllabus processing service.
//!
//! Provides the transport (`ApiClient`), multipart request building with
//! upload progress, the local download trigger, and the
//! `SubmissionController` that drives one submission end to end.
//! The CLI uses this crate directly.

pub mod controller;
pub mod download;
pub mod error;
pub mod progress;
pub mod request;

use reqwest::header::{HeaderMap, HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use syllabus_core::{ClientConfig, UploadResult};

pub use controller::SubmissionController;
pub use download::{DownloadTrigger, LocalDownloads, SavedDownload};
pub use error::{DownloadError, SubmitError, TransportError};
pub use request::SubmissionRequest;

/// HTTP client bound to one service origin.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(TransportError::Build)?;

        Ok(Self {
            client,
            base_url: config.resolved_base_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET request. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let url = self.build_url(path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(TransportError::Request)?;

        let response = ensure_success(response).await?;
        response.json().await.map_err(TransportError::Body)
    }

    /// POST multipart form and return the raw payload with its transport metadata.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<UploadResult, TransportError> {
        let url = self.build_url(path);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(TransportError::Request)?;

        let response = ensure_success(response).await?;

        let content_type = header_text(response.headers(), CONTENT_TYPE);
        let content_disposition = header_text(response.headers(), CONTENT_DISPOSITION);

        let bytes = response.bytes().await.map_err(TransportError::Body)?;

        Ok(UploadResult {
            bytes,
            content_type,
            content_disposition,
        })
    }

    /// Service liveness check (`GET /health`).
    pub async fn health(&self) -> Result<serde_json::Value, TransportError> {
        self.get("/health").await
    }
}

/// Header value as text. Non-ASCII bytes (raw UTF-8 filenames) are decoded
/// lossily instead of dropping the whole value.
fn header_text(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}

async fn ensure_success(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(TransportError::Status { status, body })
}
