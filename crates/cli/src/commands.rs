use std::process::ExitCode;

use anyhow::{Context as _, Result};
use serde::Serialize;

use catalog_domain::{CatalogStore, export_data, import_data};
use catalog_infra::{
    AppConfig, GatewayError, JsonFilePersistence, LocalFsObjectStorage, PersistenceGateway,
};
use catalog_sync::{BatchResult, ReconciliationEngine};

pub struct Context {
    persistence: JsonFilePersistence,
    engine: ReconciliationEngine<LocalFsObjectStorage>,
}

impl Context {
    pub fn new(config: AppConfig) -> Self {
        let mut storage = LocalFsObjectStorage::new(&config.storage_root);
        if let Some(base_url) = &config.public_base_url {
            storage = storage.with_base_url(base_url);
        }
        Self {
            persistence: JsonFilePersistence::new(&config.document_path),
            engine: ReconciliationEngine::new(storage),
        }
    }

    /// The saved catalog, or an empty one when nothing was saved yet.
    async fn load_store(&self) -> Result<CatalogStore> {
        let mut store = CatalogStore::new();
        match self.persistence.load().await {
            Ok(doc) => import_data(&mut store, &doc),
            Err(GatewayError::NotFound(path)) => {
                tracing::info!(%path, "no saved catalog, starting empty");
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("loading catalog from {}", self.persistence.path().display())
                });
            }
        }
        Ok(store)
    }

    async fn save_store(&self, store: &CatalogStore) -> Result<()> {
        let ack = self
            .persistence
            .save(&export_data(store))
            .await
            .with_context(|| format!("saving catalog to {}", self.persistence.path().display()))?;
        tracing::info!(saved_at = %ack.saved_at, "catalog saved");
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("encoding output")?;
    println!("{out}");
    Ok(())
}

fn batch_exit(result: &BatchResult) -> ExitCode {
    if result.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

pub async fn status(ctx: &Context, refresh: bool) -> Result<ExitCode> {
    let store = ctx.load_store().await?;
    let report = ctx.engine.analyze(&store, refresh).await;
    print_json(&report)?;
    Ok(ExitCode::SUCCESS)
}

pub async fn push(ctx: &Context, all: bool, paths: Vec<String>) -> Result<ExitCode> {
    let paths = if all {
        let store = ctx.load_store().await?;
        ctx.engine.analyze(&store, true).await.site_only_paths()
    } else {
        paths
    };

    let result = ctx.engine.push(&paths).await;
    print_json(&result)?;
    Ok(batch_exit(&result))
}

pub async fn import(ctx: &Context, all: bool, paths: Vec<String>, dry_run: bool) -> Result<ExitCode> {
    let mut store = ctx.load_store().await?;
    let paths = if all {
        let report = ctx.engine.analyze(&store, true).await;
        if !report.remote_available {
            anyhow::bail!("storage is unavailable; nothing to import");
        }
        report.remote_only_paths()
    } else {
        paths
    };

    if dry_run {
        let plan = ctx.engine.plan_import(&store, &paths);
        print_json(&plan)?;
        return Ok(if plan.errors.is_empty() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let result = ctx.engine.import(&mut store, &paths);
    if result.success_count > 0 {
        ctx.save_store(&store).await?;
    }
    print_json(&result)?;
    Ok(batch_exit(&result))
}

pub async fn export(ctx: &Context) -> Result<ExitCode> {
    let store = ctx.load_store().await?;
    print_json(&export_data(&store))?;
    Ok(ExitCode::SUCCESS)
}

pub async fn media(ctx: &Context, prefix: Option<&str>) -> Result<ExitCode> {
    let tree = ctx
        .engine
        .media_tree(prefix)
        .await
        .context("listing storage objects")?;
    print_json(&tree)?;
    Ok(ExitCode::SUCCESS)
}
