//! Catalog domain module.
//!
//! This crate contains the product taxonomy (Group → Range → Product), the
//! normalized store that owns it, canonical path resolution and the wizard
//! document transform. Everything here is deterministic domain logic (no IO).

pub mod document;
pub mod model;
pub mod path;
pub mod store;

pub use document::{
    Document, ProductDetail, Step, WizardExtras, export_data, import_data,
};
pub use model::{
    EntityRef, GroupPatch, NewGroup, NewProduct, NewRange, OptionGroup, OptionValue, Product,
    ProductGroup, ProductPatch, ProductRange, RangePatch,
};
pub use path::{EntityPath, PathResolver, folder_segment, sanitize};
pub use store::{AddOutcome, CatalogStore, StoreStats};
