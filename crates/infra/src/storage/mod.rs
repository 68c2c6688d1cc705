//! Object storage boundary.
//!
//! The catalog only does folder-level bookkeeping against storage: list the
//! folder tree, create folders, and read a structured view of the objects
//! under product folders. File transfer is not part of this boundary.

pub mod in_memory;
pub mod local_fs;
pub mod r#trait;

pub use in_memory::InMemoryObjectStorage;
pub use local_fs::LocalFsObjectStorage;
pub use r#trait::{FileInfo, ObjectStorageGateway, ObjectTree, ProductAssets};

/// File extensions treated as product images; everything else is a download.
const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "webp", "svg", "avif"];

pub(crate) fn is_image(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Every ancestor prefix of `path`, shallowest first, including `path` itself.
pub(crate) fn with_ancestors(path: &catalog_core::FolderPath) -> Vec<String> {
    let segments = path.segments();
    (1..=segments.len())
        .map(|n| segments[..n].join("/"))
        .collect()
}
