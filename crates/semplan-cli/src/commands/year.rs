//! The `semplan year` commands.

use std::path::PathBuf;

use anyhow::Result;

use semplan_core::placement::Command;
use semplan_core::semester::YearWindow;

use super::{apply, parse};

pub fn add(config_path: Option<PathBuf>, year: &str) -> Result<()> {
    let year: YearWindow = parse(year)?;
    if !apply(config_path, Command::AddYear { year })?.is_empty() {
        println!("Showing {year}");
    }
    Ok(())
}

pub fn remove(config_path: Option<PathBuf>, year: &str) -> Result<()> {
    let year: YearWindow = parse(year)?;
    if !apply(config_path, Command::RemoveYear { year })?.is_empty() {
        println!("Removed {year}");
    }
    Ok(())
}

pub fn select(config_path: Option<PathBuf>, year: &str) -> Result<()> {
    let year: YearWindow = parse(year)?;
    if !apply(config_path, Command::SelectYear { year })?.is_empty() {
        println!("Selected {year}");
    }
    Ok(())
}
