//! The `semplan semester` commands.

use std::path::PathBuf;

use anyhow::Result;

use semplan_core::placement::Command;
use semplan_core::semester::SemesterLabel;

use super::{apply, open_store, parse};

pub fn list(config_path: Option<PathBuf>) -> Result<()> {
    let (_, store) = open_store(config_path)?;
    let state = store.state();

    println!("Program start: {}", state.settings().program_start);
    for label in state.catalog().labels() {
        let marker = if state.active_semesters().contains(label) {
            "*"
        } else {
            " "
        };
        let count = state.modules_in(label).len();
        if count > 0 {
            println!("{marker} {label} ({count} modules)");
        } else {
            println!("{marker} {label}");
        }
    }
    Ok(())
}

pub fn add(config_path: Option<PathBuf>, semester: &str) -> Result<()> {
    let semester: SemesterLabel = parse(semester)?;
    if !apply(config_path, Command::AddSemester { semester })?.is_empty() {
        println!("Opened {semester}");
    }
    Ok(())
}

pub fn remove(config_path: Option<PathBuf>, semester: &str) -> Result<()> {
    let semester: SemesterLabel = parse(semester)?;
    if !apply(config_path, Command::RemoveSemester { semester })?.is_empty() {
        println!("Removed {semester}");
    }
    Ok(())
}
