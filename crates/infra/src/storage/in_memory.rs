use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use catalog_core::FolderPath;

use super::r#trait::{FileInfo, ObjectStorageGateway, ObjectTree, matches_prefix};
use super::{is_image, with_ancestors};
use crate::error::GatewayError;

#[derive(Debug, Default)]
struct State {
    /// Listing entries in insertion order, exact-match deduplicated.
    folders: Vec<String>,
    objects: Vec<(FolderPath, FileInfo)>,
    unavailable: bool,
    /// Lowercased paths whose creation is rejected.
    failing: HashSet<String>,
    create_calls: usize,
}

/// In-memory object store.
///
/// Intended for tests/dev. Supports outage and per-path failure injection.
#[derive(Debug, Default)]
pub struct InMemoryObjectStorage {
    state: RwLock<State>,
}

impl InMemoryObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the listing verbatim (spelling and order preserved).
    pub fn with_folders<I, S>(folders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = State::default();
        for folder in folders {
            let folder = folder.into();
            if !state.folders.contains(&folder) {
                state.folders.push(folder);
            }
        }
        Self {
            state: RwLock::new(state),
        }
    }

    /// Register an object under a product folder (`Group/Range/Code`).
    pub fn put_object(&self, product_path: &str, filename: &str, size: u64) -> Result<(), GatewayError> {
        let path = FolderPath::parse(product_path)?;
        let info = FileInfo {
            filename: filename.to_string(),
            url: format!("memory://{path}/{filename}"),
            size,
            modified: Utc::now(),
        };
        let mut state = self.write()?;
        for folder in with_ancestors(&path) {
            if !state.folders.contains(&folder) {
                state.folders.push(folder);
            }
        }
        state.objects.push((path, info));
        Ok(())
    }

    /// Simulate the backend being unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        if let Ok(mut state) = self.state.write() {
            state.unavailable = unavailable;
        }
    }

    /// Make `create_folder(path)` fail (matched case-insensitively).
    pub fn fail_creates_for(&self, path: &str) {
        if let Ok(mut state) = self.state.write() {
            state.failing.insert(path.trim_matches('/').to_lowercase());
        }
    }

    pub fn folders(&self) -> Vec<String> {
        self.state
            .read()
            .map(|s| s.folders.clone())
            .unwrap_or_default()
    }

    pub fn create_calls(&self) -> usize {
        self.state.read().map(|s| s.create_calls).unwrap_or(0)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, GatewayError> {
        let state = self
            .state
            .read()
            .map_err(|_| GatewayError::Unavailable("lock poisoned".to_string()))?;
        if state.unavailable {
            return Err(GatewayError::Unavailable("in-memory storage offline".to_string()));
        }
        Ok(state)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, State>, GatewayError> {
        let state = self
            .state
            .write()
            .map_err(|_| GatewayError::Unavailable("lock poisoned".to_string()))?;
        if state.unavailable {
            return Err(GatewayError::Unavailable("in-memory storage offline".to_string()));
        }
        Ok(state)
    }
}

#[async_trait]
impl ObjectStorageGateway for InMemoryObjectStorage {
    async fn list_all_folders(&self, _force_refresh: bool) -> Result<Vec<String>, GatewayError> {
        Ok(self.read()?.folders.clone())
    }

    async fn create_folder(&self, path: &str) -> Result<(), GatewayError> {
        let parsed = FolderPath::parse(path)?;
        let mut state = self.write()?;
        state.create_calls += 1;

        if state.failing.contains(&parsed.to_string().to_lowercase()) {
            return Err(GatewayError::Rejected(format!("create refused for '{parsed}'")));
        }
        for folder in with_ancestors(&parsed) {
            if !state.folders.contains(&folder) {
                state.folders.push(folder);
            }
        }
        Ok(())
    }

    async fn fetch_objects_structured(
        &self,
        prefix: Option<&str>,
    ) -> Result<ObjectTree, GatewayError> {
        let state = self.read()?;
        let mut tree = ObjectTree::new();

        for (path, info) in &state.objects {
            let segments: Vec<&str> = path.segments().iter().map(String::as_str).collect();
            let [group, range, code] = segments.as_slice() else {
                continue;
            };
            if !matches_prefix(&segments, prefix) {
                continue;
            }
            let assets = tree
                .entry(group.to_string())
                .or_default()
                .entry(range.to_string())
                .or_default()
                .entry(code.to_string())
                .or_default();
            if is_image(&info.filename) {
                assets.images.push(info.clone());
            } else {
                assets.downloads.push(info.clone());
            }
        }

        Ok(tree)
    }
}
