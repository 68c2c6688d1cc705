//! Reconciliation results.

use serde::Serialize;

use catalog_core::EntityKind;
use catalog_domain::EntityRef;

use crate::error::ActionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncStatus {
    /// Present locally and remotely (case-insensitive).
    Synced,
    /// Present locally, missing remotely.
    SiteOnly,
    /// Present remotely, missing locally.
    RemoteOnly,
    /// Local entity without a resolvable parent chain; never compared.
    Ungrouped,
}

/// One classified entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncItem {
    pub kind: EntityKind,
    /// Display path for local entries, the first-seen remote spelling for
    /// remote-only entries, the bare name/code for ungrouped entries.
    pub path: String,
    pub status: SyncStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelCounts {
    /// `synced + site_only + remote_only`.
    pub total: usize,
    pub synced: usize,
    pub site_only: usize,
    pub remote_only: usize,
    pub ungrouped: usize,
}

impl LevelCounts {
    pub(crate) fn record(&mut self, status: SyncStatus) {
        match status {
            SyncStatus::Synced => self.synced += 1,
            SyncStatus::SiteOnly => self.site_only += 1,
            SyncStatus::RemoteOnly => self.remote_only += 1,
            SyncStatus::Ungrouped => self.ungrouped += 1,
        }
        self.total = self.synced + self.site_only + self.remote_only;
    }

    fn merge(self, other: Self) -> Self {
        Self {
            total: self.total + other.total,
            synced: self.synced + other.synced,
            site_only: self.site_only + other.site_only,
            remote_only: self.remote_only + other.remote_only,
            ungrouped: self.ungrouped + other.ungrouped,
        }
    }
}

/// Classification of one taxonomy level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelReport {
    pub kind: EntityKind,
    pub items: Vec<SyncItem>,
    pub counts: LevelCounts,
}

impl LevelReport {
    pub(crate) fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
            counts: LevelCounts::default(),
        }
    }

    pub(crate) fn push(&mut self, item: SyncItem) {
        self.counts.record(item.status);
        self.items.push(item);
    }

    pub fn with_status(&self, status: SyncStatus) -> impl Iterator<Item = &SyncItem> {
        self.items.iter().filter(move |i| i.status == status)
    }
}

/// Full three-level comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// `false` when the remote listing failed and an empty one was assumed.
    pub remote_available: bool,
    pub groups: LevelReport,
    pub ranges: LevelReport,
    pub products: LevelReport,
}

impl SyncReport {
    pub fn level(&self, kind: EntityKind) -> &LevelReport {
        match kind {
            EntityKind::Group => &self.groups,
            EntityKind::Range => &self.ranges,
            EntityKind::Product => &self.products,
        }
    }

    /// Levels in taxonomy order.
    pub fn levels(&self) -> [&LevelReport; 3] {
        EntityKind::ALL.map(|kind| self.level(kind))
    }

    pub fn totals(&self) -> LevelCounts {
        self.levels()
            .into_iter()
            .fold(LevelCounts::default(), |acc, l| acc.merge(l.counts))
    }

    fn paths_with(&self, status: SyncStatus) -> Vec<String> {
        self.levels()
            .into_iter()
            .flat_map(|l| l.with_status(status))
            .map(|i| i.path.clone())
            .collect()
    }

    /// Push candidates, shallowest level first.
    pub fn site_only_paths(&self) -> Vec<String> {
        self.paths_with(SyncStatus::SiteOnly)
    }

    /// Import candidates, shallowest level first.
    pub fn remote_only_paths(&self) -> Vec<String> {
        self.paths_with(SyncStatus::RemoteOnly)
    }
}

/// Failure of one batch item.
#[derive(Debug, Serialize)]
pub struct ItemError {
    pub path: String,
    pub error: ActionError,
}

/// Outcome of a best-effort push or import batch.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub success_count: usize,
    pub errors: Vec<ItemError>,
}

impl BatchResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn fail(&mut self, path: impl Into<String>, error: impl Into<ActionError>) {
        self.errors.push(ItemError {
            path: path.into(),
            error: error.into(),
        });
    }
}
