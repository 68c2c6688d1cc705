use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use catalog_infra::AppConfig;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "catalog-sync")]
#[command(about = "Reconcile the product catalog with storage folders", long_about = None)]
struct Cli {
    /// Storage directory (overrides CATALOG_STORAGE_ROOT)
    #[arg(long, global = true)]
    storage_root: Option<PathBuf>,

    /// Catalog document file (overrides CATALOG_DOCUMENT_PATH)
    #[arg(long, global = true)]
    document: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare the catalog with the storage folders
    Status {
        /// Bypass the folder listing cache
        #[arg(long)]
        refresh: bool,
    },
    /// Create storage folders for catalog entries missing remotely
    Push(Selection),
    /// Create catalog entries for storage folders missing locally
    Import {
        #[command(flatten)]
        selection: Selection,
        /// Print the planned changes without saving anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the catalog as a wizard document
    Export,
    /// List product images and downloads
    Media {
        /// Only folders under this path (e.g. Shelter/Peninsula)
        prefix: Option<String>,
    },
}

#[derive(Args, Debug)]
struct Selection {
    /// Every candidate from the current status
    #[arg(long, conflicts_with = "paths")]
    all: bool,

    /// Folder paths such as Shelter/Peninsula/K301
    #[arg(required_unless_present = "all")]
    paths: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let (mut config, issues) = AppConfig::from_env();
    if let Some(root) = cli.storage_root {
        config.storage_root = root;
    }
    if let Some(document) = cli.document {
        config.document_path = document;
    }

    catalog_observability::tracing::init_with(config.log_format);
    for issue in &issues {
        tracing::warn!(key = issue.key, error = %issue.message, "ignoring configuration value");
    }
    tracing::debug!(?config, "configuration loaded");

    let ctx = commands::Context::new(config);
    match cli.command {
        Command::Status { refresh } => commands::status(&ctx, refresh).await,
        Command::Push(selection) => commands::push(&ctx, selection.all, selection.paths).await,
        Command::Import { selection, dry_run } => {
            commands::import(&ctx, selection.all, selection.paths, dry_run).await
        }
        Command::Export => commands::export(&ctx).await,
        Command::Media { prefix } => commands::media(&ctx, prefix.as_deref()).await,
    }
}
