//! `catalog-core`: foundation building blocks for the catalog taxonomy.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! slug-derived identifiers, folder paths and the shared error model.

pub mod entity;
pub mod error;
pub mod folder_path;
pub mod id;
pub mod value_object;

pub use entity::{Entity, EntityKind};
pub use error::{DomainError, DomainResult};
pub use folder_path::FolderPath;
pub use id::{GroupId, ProductId, RangeId, slugify};
pub use value_object::ValueObject;
