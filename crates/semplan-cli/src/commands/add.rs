//! The `semplan add` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use semplan_core::planner::AddOutcome;
use semplan_core::semester::SemesterLabel;

use super::{open_planner, parse};

pub async fn execute(config_path: Option<PathBuf>, code: String, semester: String) -> Result<()> {
    let semester: SemesterLabel = parse(&semester)?;
    let mut planner = open_planner(config_path)?;

    if planner.state().find_by_code(code.trim()).is_none() {
        planner
            .load_catalog()
            .await
            .context("could not load the module list")?;
    }

    match planner
        .add_module(&code, semester)
        .await
        .with_context(|| format!("could not add {}", code.trim()))?
    {
        AddOutcome::Added(id) => {
            if let Some(module) = planner.state().module(id) {
                println!(
                    "Added {} {} ({} MCs) to {semester} as module {id}",
                    module.module_code, module.title, module.module_credit
                );
            }
        }
        AddOutcome::AlreadyPresent(id) => {
            println!("{} is already planned as module {id}", code.trim().to_uppercase());
        }
    }

    Ok(())
}
