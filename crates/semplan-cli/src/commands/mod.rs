pub mod add;
pub mod edit;
pub mod init;
pub mod list;
pub mod search;
pub mod semester;
pub mod summary;
pub mod year;

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;

use semplan_catalog::config::{create_catalog, load_config_from};
use semplan_catalog::SemplanConfig;
use semplan_core::placement::{Changes, Command};
use semplan_core::planner::Planner;
use semplan_core::storage::FileStorage;
use semplan_core::store::ProgramStore;
use semplan_core::traits::{Notice, NoticeKind, Notifier};

/// Console notifier.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notice: Notice) {
        let label = match notice.kind {
            NoticeKind::Rejected => "Rejected",
            NoticeKind::CatalogFailure => "Catalog unavailable",
        };
        eprintln!("  {label}: {}", notice.message);
    }
}

/// Load the config and the plan stored in its data directory.
pub fn open_store(config_path: Option<PathBuf>) -> Result<(SemplanConfig, ProgramStore)> {
    let config = load_config_from(config_path.as_deref())?;
    tracing::debug!("plan records in {}", config.data_dir.display());
    let storage = FileStorage::new(&config.data_dir);
    let store = ProgramStore::load(Arc::new(storage));
    Ok((config, store))
}

/// Like [`open_store`], with a catalog client attached.
pub fn open_planner(config_path: Option<PathBuf>) -> Result<Planner> {
    let (config, store) = open_store(config_path)?;
    let catalog = create_catalog(&config.catalog)?;
    Ok(Planner::new(store, catalog, Arc::new(StderrNotifier)))
}

/// Apply a single command to the stored plan and report the outcome.
pub fn apply(config_path: Option<PathBuf>, command: Command) -> Result<Changes> {
    let (_, mut store) = open_store(config_path)?;
    let changes = store.execute(command)?;
    if changes.is_empty() {
        println!("No changes.");
    }
    Ok(changes)
}

/// Parse a command-line value with the type's own parser.
pub fn parse<T>(value: &str) -> Result<T>
where
    T: FromStr<Err = String>,
{
    value.parse().map_err(anyhow::Error::msg)
}
