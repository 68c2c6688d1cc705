use std::path::{Path, PathBuf};

use async_trait::async_trait;

use catalog_domain::Document;

use super::r#trait::{Ack, PersistenceGateway};
use crate::error::GatewayError;

/// Stores the document as pretty-printed JSON in a single file.
///
/// Saves write a sibling temp file and rename it over the target, so a
/// crashed save never leaves a truncated document behind.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "catalog.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl PersistenceGateway for JsonFilePersistence {
    async fn load(&self) -> Result<Document, GatewayError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GatewayError::NotFound(self.path.display().to_string()));
            }
            Err(e) => return Err(GatewayError::io(&self.path, e)),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn save(&self, document: &Document) -> Result<Ack, GatewayError> {
        let bytes = serde_json::to_vec_pretty(document)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| GatewayError::io(parent, e))?;
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| GatewayError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| GatewayError::io(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "saved catalog document");
        Ok(Ack::now())
    }
}
