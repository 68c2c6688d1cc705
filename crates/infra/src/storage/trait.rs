use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Metadata of one stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub filename: String,
    pub url: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

/// Objects found under one product folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAssets {
    pub images: Vec<FileInfo>,
    pub downloads: Vec<FileInfo>,
}

/// Group → Range → ProductCode → assets.
pub type ObjectTree = BTreeMap<String, BTreeMap<String, BTreeMap<String, ProductAssets>>>;

/// Folder-level access to the external object store.
///
/// ## Semantics
///
/// - `list_all_folders` returns every folder prefix up to depth 3 as a
///   `/`-joined path without leading or trailing slash. Implementations may
///   cache; `force_refresh` bypasses the cache.
/// - `create_folder` is idempotent: creating an existing folder succeeds.
/// - `fetch_objects_structured` groups objects by their product folder,
///   optionally restricted to a (case-insensitive) path prefix.
#[async_trait]
pub trait ObjectStorageGateway: Send + Sync {
    async fn list_all_folders(&self, force_refresh: bool) -> Result<Vec<String>, GatewayError>;

    async fn create_folder(&self, path: &str) -> Result<(), GatewayError>;

    async fn fetch_objects_structured(
        &self,
        prefix: Option<&str>,
    ) -> Result<ObjectTree, GatewayError>;
}

#[async_trait]
impl<S> ObjectStorageGateway for Arc<S>
where
    S: ObjectStorageGateway + ?Sized,
{
    async fn list_all_folders(&self, force_refresh: bool) -> Result<Vec<String>, GatewayError> {
        (**self).list_all_folders(force_refresh).await
    }

    async fn create_folder(&self, path: &str) -> Result<(), GatewayError> {
        (**self).create_folder(path).await
    }

    async fn fetch_objects_structured(
        &self,
        prefix: Option<&str>,
    ) -> Result<ObjectTree, GatewayError> {
        (**self).fetch_objects_structured(prefix).await
    }
}

/// Case-insensitive "is `path` under `prefix`" on whole segments.
pub(crate) fn matches_prefix(path_segments: &[&str], prefix: Option<&str>) -> bool {
    let Some(prefix) = prefix else {
        return true;
    };
    let wanted: Vec<String> = prefix
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect();
    wanted.len() <= path_segments.len()
        && wanted
            .iter()
            .zip(path_segments)
            .all(|(w, s)| *w == s.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_matching_is_per_segment_and_case_insensitive() {
        let path = ["Shelter", "Peninsula", "K301"];
        assert!(matches_prefix(&path, None));
        assert!(matches_prefix(&path, Some("shelter")));
        assert!(matches_prefix(&path, Some("/SHELTER/peninsula/")));
        assert!(!matches_prefix(&path, Some("Shel")));
        assert!(!matches_prefix(&path, Some("Shelter/Peninsula/K301/extra")));
    }
}
