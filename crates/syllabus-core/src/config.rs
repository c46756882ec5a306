//! Configuration module
//!
//! The client configuration is built once at process start and passed into
//! the API client by value. Nothing reads the environment after that.

use std::env;
use std::path::PathBuf;

/// Origin used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Remote service origin. `None` means the default origin.
    pub base_url: Option<String>,
    /// Directory downloads are saved into.
    pub download_dir: PathBuf,
    /// Request timeout. `None` leaves the transport default in place.
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            download_dir: PathBuf::from("."),
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Load from environment: SYLLABUS_API_URL (or API_URL),
    /// SYLLABUS_DOWNLOAD_DIR, SYLLABUS_HTTP_TIMEOUT_SECS.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let base_url = env::var("SYLLABUS_API_URL")
            .or_else(|_| env::var("API_URL"))
            .ok()
            .filter(|s| !s.trim().is_empty());

        let download_dir = env::var("SYLLABUS_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let timeout_secs = match env::var("SYLLABUS_HTTP_TIMEOUT_SECS") {
            Ok(value) => Some(value.trim().parse::<u64>().map_err(|_| {
                anyhow::anyhow!("SYLLABUS_HTTP_TIMEOUT_SECS must be a valid number")
            })?),
            Err(_) => None,
        };

        Ok(Self {
            base_url,
            download_dir,
            timeout_secs,
        })
    }

    /// Base URL without a trailing slash, falling back to the default origin.
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if base_url.is_some() {
            self.base_url = base_url;
        }
        self
    }

    pub fn with_download_dir(mut self, download_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = download_dir {
            self.download_dir = dir;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_origin_when_unset() {
        let config = ClientConfig::default();
        assert_eq!(config.resolved_base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config =
            ClientConfig::default().with_base_url(Some("https://api.example.com/".to_string()));
        assert_eq!(config.resolved_base_url(), "https://api.example.com");
    }

    #[test]
    fn overrides_only_apply_when_present() {
        let config = ClientConfig {
            base_url: Some("http://a".to_string()),
            download_dir: PathBuf::from("/tmp/out"),
            timeout_secs: Some(5),
        };
        let same = config.clone().with_base_url(None).with_download_dir(None);
        assert_eq!(same, config);

        let changed = config.with_download_dir(Some(PathBuf::from("/tmp/other")));
        assert_eq!(changed.download_dir, PathBuf::from("/tmp/other"));
    }

    #[test]
    fn from_env_reads_timeout() {
        env::set_var("SYLLABUS_HTTP_TIMEOUT_SECS", "7");
        let config = ClientConfig::from_env();
        env::remove_var("SYLLABUS_HTTP_TIMEOUT_SECS");
        assert_eq!(config.unwrap().timeout_secs, Some(7));
    }
}
