//! Application configuration
//!
//! `config.json` in the config directory, every field optional. Environment
//! variables win over the file.

use crate::catalog::SurahId;
use crate::storage::{self, StorageError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_API_BASE_URL: &str = "https://quranapi.pages.dev/api";

pub const ENV_API_URL: &str = "SLOWQURAN_API_URL";
pub const ENV_ARABIC_FONT: &str = "SLOWQURAN_ARABIC_FONT";
pub const ENV_LOG: &str = "SLOWQURAN_LOG";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base of the surah endpoint; `/{id}.json` is appended.
    pub api_base_url: String,
    /// None means requests wait as long as the server does.
    pub request_timeout_secs: Option<u64>,
    /// tracing-subscriber filter directive used when no env filter is set.
    pub log_filter: String,
    /// Font file with Arabic glyphs, loaded at startup.
    pub arabic_font: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: None,
            log_filter: "info".to_string(),
            arabic_font: None,
        }
    }
}

impl AppConfig {
    /// Config file plus environment overrides. An unreadable file is
    /// returned next to the defaults so the caller can log it once a
    /// subscriber exists.
    pub fn load() -> (Self, Option<StorageError>) {
        let (config, error) = match Self::load_from(&storage::config_dir().join(CONFIG_FILE)) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        };
        (config.with_overrides(|key| std::env::var(key).ok()), error)
    }

    /// A missing file is not an error and yields the defaults.
    pub fn load_from(path: &Path) -> storage::Result<Self> {
        match storage::load_json(path) {
            Err(StorageError::NotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Apply overrides from a key lookup (the process environment in practice).
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(font) = lookup(ENV_ARABIC_FONT).filter(|v| !v.trim().is_empty()) {
            self.arabic_font = Some(PathBuf::from(font));
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            self.log_filter = filter;
        }
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn surah_url(&self, id: SurahId) -> String {
        format!("{}/{}.json", self.api_base_url.trim_end_matches('/'), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surah_url() {
        let config = AppConfig::default();
        assert_eq!(config.surah_url(2), "https://quranapi.pages.dev/api/2.json");
        let config = AppConfig { api_base_url: "http://localhost:8080/api/".into(), ..AppConfig::default() };
        assert_eq!(config.surah_url(114), "http://localhost:8080/api/114.json");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "request_timeout_secs": 10 }"#).unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_missing_or_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(AppConfig::load_from(&dir.path().join("nope.json")).unwrap(), AppConfig::default());
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(AppConfig::load_from(&path), Err(StorageError::Json(_))));
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::default().with_overrides(|key| match key {
            ENV_API_URL => Some("http://mirror.local/api".into()),
            ENV_ARABIC_FONT => Some("/usr/share/fonts/amiri.ttf".into()),
            ENV_LOG => Some("  ".into()),
            _ => None,
        });
        assert_eq!(config.api_base_url, "http://mirror.local/api");
        assert_eq!(config.arabic_font, Some(PathBuf::from("/usr/share/fonts/amiri.ttf")));
        assert_eq!(config.log_filter, "info");
    }
}
