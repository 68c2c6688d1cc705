use std::path::PathBuf;

use thiserror::Error;

/// Gateway operation error.
///
/// These are **infrastructure errors** (storage reachability, IO, encoding) as
/// opposed to domain errors. Callers decide whether to surface or degrade.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid folder path: {0}")]
    InvalidPath(#[from] catalog_core::DomainError),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("request rejected: {0}")]
    Rejected(String),
}

impl GatewayError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
