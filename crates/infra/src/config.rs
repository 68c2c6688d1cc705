//! Process configuration from environment variables.

use std::path::PathBuf;

use catalog_observability::LogFormat;

pub const ENV_STORAGE_ROOT: &str = "CATALOG_STORAGE_ROOT";
pub const ENV_DOCUMENT_PATH: &str = "CATALOG_DOCUMENT_PATH";
pub const ENV_PUBLIC_BASE_URL: &str = "CATALOG_PUBLIC_BASE_URL";
pub const ENV_LOG_FORMAT: &str = "CATALOG_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory backing the local object storage.
    pub storage_root: PathBuf,
    /// JSON file holding the persisted catalog document.
    pub document_path: PathBuf,
    /// Public URL prefix for object links; `file://` URLs when unset.
    pub public_base_url: Option<String>,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("./storage"),
            document_path: PathBuf::from("./catalog.json"),
            public_base_url: None,
            log_format: LogFormat::Json,
        }
    }
}

/// A setting that was present but unusable, so its default was kept.
///
/// Returned rather than logged: configuration is read before the tracing
/// subscriber exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub key: &'static str,
    pub message: String,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

impl AppConfig {
    pub fn from_env() -> (Self, Vec<ConfigIssue>) {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset and an
    /// unparseable log format falls back to JSON.
    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<ConfigIssue>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();
        let mut issues = Vec::new();

        let log_format = match get(ENV_LOG_FORMAT).map(|raw| raw.parse::<LogFormat>()) {
            Some(Ok(format)) => format,
            Some(Err(e)) => {
                issues.push(ConfigIssue {
                    key: ENV_LOG_FORMAT,
                    message: e.to_string(),
                });
                defaults.log_format
            }
            None => defaults.log_format,
        };

        let config = Self {
            storage_root: get(ENV_STORAGE_ROOT)
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_root),
            document_path: get(ENV_DOCUMENT_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.document_path),
            public_base_url: get(ENV_PUBLIC_BASE_URL),
            log_format,
        };
        (config, issues)
    }
}
