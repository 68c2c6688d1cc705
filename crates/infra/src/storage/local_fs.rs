use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use catalog_core::FolderPath;

use super::is_image;
use super::r#trait::{FileInfo, ObjectStorageGateway, ObjectTree, matches_prefix};
use crate::error::GatewayError;

/// Object storage backed by a local directory.
///
/// Folders map 1:1 onto directories under `root`; files directly inside a
/// depth-3 directory are that product's objects. The folder listing is
/// cached until `force_refresh` or a successful `create_folder`.
#[derive(Debug)]
pub struct LocalFsObjectStorage {
    root: PathBuf,
    base_url: Option<String>,
    cache: Mutex<Option<Vec<String>>>,
}

impl LocalFsObjectStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            base_url: None,
            cache: Mutex::new(None),
        }
    }

    /// Public URL prefix for object links (defaults to `file://` URLs).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir_for(&self, path: &FolderPath) -> PathBuf {
        path.segments()
            .iter()
            .fold(self.root.clone(), |dir, segment| dir.join(segment))
    }

    fn url_for(&self, relative: &str, file: &Path) -> String {
        match &self.base_url {
            Some(base) => format!("{base}/{relative}"),
            None => format!("file://{}", file.display()),
        }
    }
}

#[async_trait]
impl ObjectStorageGateway for LocalFsObjectStorage {
    async fn list_all_folders(&self, force_refresh: bool) -> Result<Vec<String>, GatewayError> {
        let mut cache = self.cache.lock().await;
        if !force_refresh {
            if let Some(folders) = cache.as_ref() {
                return Ok(folders.clone());
            }
        }

        let root = self.root.clone();
        let folders = tokio::task::spawn_blocking(move || walk_folders(&root))
            .await
            .map_err(|e| GatewayError::Unavailable(format!("listing task failed: {e}")))??;

        tracing::debug!(root = %self.root.display(), count = folders.len(), "listed storage folders");
        *cache = Some(folders.clone());
        Ok(folders)
    }

    async fn create_folder(&self, path: &str) -> Result<(), GatewayError> {
        let parsed = FolderPath::parse(path)?;
        let dir = self.dir_for(&parsed);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| GatewayError::io(&dir, e))?;

        *self.cache.lock().await = None;
        tracing::debug!(path = %parsed, "created storage folder");
        Ok(())
    }

    async fn fetch_objects_structured(
        &self,
        prefix: Option<&str>,
    ) -> Result<ObjectTree, GatewayError> {
        let root = self.root.clone();
        let files = tokio::task::spawn_blocking(move || walk_product_files(&root))
            .await
            .map_err(|e| GatewayError::Unavailable(format!("listing task failed: {e}")))??;

        let mut tree = ObjectTree::new();
        for file in files {
            let segments = [file.group.as_str(), file.range.as_str(), file.code.as_str()];
            if !matches_prefix(&segments, prefix) {
                continue;
            }
            let relative = format!("{}/{}/{}/{}", file.group, file.range, file.code, file.filename);
            let info = FileInfo {
                url: self.url_for(&relative, &file.full_path),
                filename: file.filename,
                size: file.size,
                modified: file.modified,
            };
            let assets = tree
                .entry(file.group)
                .or_default()
                .entry(file.range)
                .or_default()
                .entry(file.code)
                .or_default();
            if is_image(&info.filename) {
                assets.images.push(info);
            } else {
                assets.downloads.push(info);
            }
        }
        Ok(tree)
    }
}

/// Sorted subdirectory names of `dir`; hidden entries are skipped.
fn subdirs(dir: &Path) -> Result<Vec<String>, GatewayError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| GatewayError::io(dir, e))? {
        let entry = entry.map_err(|e| GatewayError::io(dir, e))?;
        let is_dir = entry
            .file_type()
            .map_err(|e| GatewayError::io(entry.path(), e))?
            .is_dir();
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_dir && !name.starts_with('.') {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

fn walk_folders(root: &Path) -> Result<Vec<String>, GatewayError> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for group in subdirs(root)? {
        let group_dir = root.join(&group);
        out.push(group.clone());
        for range in subdirs(&group_dir)? {
            let range_dir = group_dir.join(&range);
            out.push(format!("{group}/{range}"));
            for product in subdirs(&range_dir)? {
                out.push(format!("{group}/{range}/{product}"));
            }
        }
    }
    Ok(out)
}

struct ProductFile {
    group: String,
    range: String,
    code: String,
    filename: String,
    full_path: PathBuf,
    size: u64,
    modified: DateTime<Utc>,
}

fn walk_product_files(root: &Path) -> Result<Vec<ProductFile>, GatewayError> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for group in subdirs(root)? {
        let group_dir = root.join(&group);
        for range in subdirs(&group_dir)? {
            let range_dir = group_dir.join(&range);
            for code in subdirs(&range_dir)? {
                let product_dir = range_dir.join(&code);
                let mut entries = Vec::new();
                for entry in fs::read_dir(&product_dir).map_err(|e| GatewayError::io(&product_dir, e))? {
                    let entry = entry.map_err(|e| GatewayError::io(&product_dir, e))?;
                    let meta = entry.metadata().map_err(|e| GatewayError::io(entry.path(), e))?;
                    let filename = entry.file_name().to_string_lossy().into_owned();
                    if !meta.is_file() || filename.starts_with('.') {
                        continue;
                    }
                    let modified = meta
                        .modified()
                        .map(DateTime::<Utc>::from)
                        .unwrap_or_else(|_| Utc::now());
                    entries.push(ProductFile {
                        group: group.clone(),
                        range: range.clone(),
                        code: code.clone(),
                        full_path: entry.path(),
                        filename,
                        size: meta.len(),
                        modified,
                    });
                }
                entries.sort_by(|a, b| a.filename.cmp(&b.filename));
                out.extend(entries);
            }
        }
    }
    Ok(out)
}
