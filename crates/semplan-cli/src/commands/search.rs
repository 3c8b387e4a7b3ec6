//! The `semplan search` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use super::open_planner;

pub async fn execute(config_path: Option<PathBuf>, query: String, limit: usize) -> Result<()> {
    anyhow::ensure!(limit >= 1, "limit must be at least 1");

    let mut planner = open_planner(config_path)?;
    let count = planner
        .load_catalog()
        .await
        .context("could not load the module list")?;

    let hits = planner.search(&query, limit);
    if hits.is_empty() {
        println!("No modules match '{query}' ({count} searched).");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Code", "Title", "Planned"]);
    for hit in hits {
        let planned = planner
            .state()
            .find_by_code(&hit.module_code)
            .map(|m| m.semester.to_string())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(&hit.module_code),
            Cell::new(&hit.title),
            Cell::new(planned),
        ]);
    }
    println!("{table}");

    Ok(())
}
