//! Reconciliation engine: classification, push and import against a storage
//! gateway.
//!
//! The engine holds no catalog state. The store is passed in per call, so a
//! caller decides when (and whether) to persist after an import.

use catalog_core::FolderPath;
use catalog_domain::CatalogStore;
use catalog_infra::{GatewayError, ObjectStorageGateway, ObjectTree};
use tracing::{info, warn};

use crate::classify::classify;
use crate::plan::{ImportPlan, plan_import, run_import};
use crate::report::{BatchResult, SyncReport};

pub struct ReconciliationEngine<S> {
    storage: S,
}

impl<S> ReconciliationEngine<S>
where
    S: ObjectStorageGateway,
{
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Remote listing, or an empty one (with `false`) when storage is
    /// unreachable.
    pub async fn remote_folders(&self, force_refresh: bool) -> (Vec<String>, bool) {
        match self.storage.list_all_folders(force_refresh).await {
            Ok(folders) => (folders, true),
            Err(e) => {
                warn!(error = %e, "folder listing failed; treating remote as empty");
                (Vec::new(), false)
            }
        }
    }

    /// Fetch the listing (fail-open) and classify the store against it.
    pub async fn analyze(&self, store: &CatalogStore, force_refresh: bool) -> SyncReport {
        let (folders, available) = self.remote_folders(force_refresh).await;
        let report = classify(store, &folders, available);

        let totals = report.totals();
        info!(
            remote_available = available,
            synced = totals.synced,
            site_only = totals.site_only,
            remote_only = totals.remote_only,
            ungrouped = totals.ungrouped,
            "catalog analyzed"
        );
        report
    }

    /// Create each folder remotely, parents first. Best effort: failures are
    /// collected and the batch continues.
    pub async fn push(&self, paths: &[String]) -> BatchResult {
        let mut ordered: Vec<&String> = paths.iter().collect();
        ordered.sort_by_key(|p| FolderPath::parse(p).map(|f| f.depth()).unwrap_or(0));

        let mut result = BatchResult::default();
        for path in ordered {
            match self.storage.create_folder(path).await {
                Ok(()) => result.success_count += 1,
                Err(e) => {
                    warn!(path = %path, error = %e, "push item failed");
                    result.fail(path.as_str(), e);
                }
            }
        }

        info!(
            requested = paths.len(),
            succeeded = result.success_count,
            failed = result.errors.len(),
            "push finished"
        );
        result
    }

    /// Create (or reuse) local entities for each remote folder.
    ///
    /// Items already applied stay applied when a later item fails.
    pub fn import(&self, store: &mut CatalogStore, paths: &[String]) -> BatchResult {
        let result = run_import(store, paths, |_| {});
        info!(
            requested = paths.len(),
            succeeded = result.success_count,
            failed = result.errors.len(),
            "import finished"
        );
        result
    }

    /// What `import` would do, without mutating `store`.
    pub fn plan_import(&self, store: &CatalogStore, paths: &[String]) -> ImportPlan {
        plan_import(store, paths)
    }

    /// Objects grouped by product folder, optionally under `prefix`.
    pub async fn media_tree(&self, prefix: Option<&str>) -> Result<ObjectTree, GatewayError> {
        self.storage
            .fetch_objects_structured(prefix)
            .await
            .inspect_err(|e| warn!(prefix = ?prefix, error = %e, "media listing failed"))
    }
}
