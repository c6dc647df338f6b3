//! `steamdex catalog` - enumerate the remote catalog and merge it into
//! the local one.

use anyhow::{Context, Result};
use clap::Args;
use std::time::Duration;
use tracing::info;

use steamdex_fetch::SteamClient;
use steamdex_store::ReconcileStore;

use crate::Cli;

/// Arguments for the catalog command.
#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

/// Runs the catalog refresh.
pub async fn run(args: &CatalogArgs, cli: &Cli) -> Result<()> {
    let store = ReconcileStore::new(cli.data_dir());
    let client = SteamClient::with_timeout(Duration::from_secs(args.timeout))
        .context("Failed to build HTTP client")?;

    info!("Fetching app list");
    let entries = client
        .app_list()
        .await
        .context("Failed to fetch the app list")?;
    info!(count = entries.len(), "App list fetched");

    let mut catalog = store.load_catalog().await;
    let before = catalog.len();
    let added = catalog.merge(&entries);

    if added > 0 {
        store
            .save_catalog(&catalog)
            .await
            .context("Failed to save the catalog")?;
    }

    if !cli.quiet {
        println!("Catalog: {} apps ({} new)", catalog.len(), added);
        if added == 0 && before > 0 {
            println!("Already up to date.");
        }
    }

    Ok(())
}
