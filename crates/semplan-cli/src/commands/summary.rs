//! The `semplan summary` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use semplan_core::planner::PlanSummary;
use semplan_core::quota::WindowQuota;

use super::open_store;

pub fn execute(config_path: Option<PathBuf>, format: String) -> Result<()> {
    let (_, store) = open_store(config_path)?;
    let summary = PlanSummary::from_state(store.state());

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        "table" => print_summary(&summary),
        other => anyhow::bail!("unknown format: '{other}' (expected table or json)"),
    }

    Ok(())
}

fn print_summary(summary: &PlanSummary) {
    let mut table = Table::new();
    table.set_header(vec!["Semester", "Modules", "MCs", "Graded MCs", "Average"]);

    for semester in &summary.semesters {
        table.add_row(vec![
            Cell::new(semester.semester),
            Cell::new(semester.module_count),
            Cell::new(semester.score.total_credits),
            Cell::new(semester.score.graded_credits),
            Cell::new(format!("{:.2}", semester.score.average)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Cumulative"),
        Cell::new(summary.module_count),
        Cell::new(summary.cumulative.total_credits),
        Cell::new(summary.cumulative.graded_credits),
        Cell::new(format!("{:.2}", summary.cumulative.average)),
    ]);

    println!("Program start: {}", summary.program_start);
    println!("{table}");

    let mut quota = Table::new();
    quota.set_header(vec!["Exemption window", "Cap", "Used", "Remaining", "4-MC slots"]);
    quota.add_row(quota_row("First", &summary.quota.first));
    quota.add_row(quota_row("Second", &summary.quota.second));
    println!("{quota}");
}

fn quota_row(name: &str, window: &WindowQuota) -> Vec<Cell> {
    vec![
        Cell::new(name),
        Cell::new(window.cap),
        Cell::new(window.used),
        Cell::new(window.remaining),
        Cell::new(window.slots),
    ]
}
