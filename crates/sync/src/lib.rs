//! Reconciliation between the local catalog and remote storage folders.
//!
//! - [`classify`] compares the store against a flat folder listing, per level.
//! - [`plan`] turns remote-only folders into store mutations, item by item.
//! - [`engine`] wires both to an [`ObjectStorageGateway`] (listing, push,
//!   media browsing).
//!
//! [`ObjectStorageGateway`]: catalog_infra::ObjectStorageGateway

pub mod classify;
pub mod engine;
pub mod error;
pub mod keys;
pub mod plan;
pub mod report;

pub use classify::classify;
pub use engine::ReconciliationEngine;
pub use error::{ActionError, ImportError};
pub use keys::{NameKey, NameKeyMap};
pub use plan::{ImportPlan, ItemPlan, NameIndex, PlannedAction, plan_import};
pub use report::{
    BatchResult, ItemError, LevelCounts, LevelReport, SyncItem, SyncReport, SyncStatus,
};
