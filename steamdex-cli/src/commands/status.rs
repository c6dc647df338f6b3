//! `steamdex status` - report reconciliation progress.

use anyhow::Result;

use steamdex_store::{IdSetKind, ReconcileStore};
use steamdex_sync::plan;

use crate::Cli;

/// Prints counts for every artifact plus the derived pending number.
pub async fn run(cli: &Cli) -> Result<()> {
    let store = ReconcileStore::new(cli.data_dir());

    let catalog = store.load_catalog().await;
    let details = store.load_details().await;
    let failed = store.load_ids(IdSetKind::Failed).await;
    let non_existent = store.load_ids(IdSetKind::NonExistent).await;
    let pending = plan::pending_ids(&catalog, &details, &non_existent).len();

    println!("Data directory: {}", store.data_dir().display());
    println!("Catalog:        {} apps", catalog.len());
    println!("Resolved:       {} details", details.len());
    println!("Failed:         {} ids", failed.len());
    println!("Non-existent:   {} ids", non_existent.len());
    println!("Pending:        {} apps", pending);

    if catalog.is_empty() {
        println!("\nThe catalog is empty. Run `steamdex catalog` to populate it.");
    } else if pending == 0 && failed.is_empty() {
        println!("\nFully reconciled.");
    } else if pending > 0 {
        println!("\nRun `steamdex sync` to fetch the pending apps.");
    } else {
        println!("\nRun `steamdex sweep` to retry the failed apps.");
    }

    Ok(())
}
