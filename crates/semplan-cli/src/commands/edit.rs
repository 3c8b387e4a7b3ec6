//! Plan edits that need no catalog access.

use std::path::PathBuf;

use anyhow::Result;

use semplan_core::grade::Grade;
use semplan_core::model::{ModuleId, Toggle};
use semplan_core::placement::Command;
use semplan_core::semester::{ProgramStart, SemesterLabel};

use super::{apply, parse};

pub fn remove(config_path: Option<PathBuf>, id: &str) -> Result<()> {
    let id: ModuleId = parse(id)?;
    if !apply(config_path, Command::RemoveModule { id })?.is_empty() {
        println!("Removed module {id}");
    }
    Ok(())
}

pub fn grade(config_path: Option<PathBuf>, id: &str, grade: &str) -> Result<()> {
    let id: ModuleId = parse(id)?;
    let grade: Option<Grade> = match grade.trim() {
        "" | "none" | "-" => None,
        symbol => Some(parse(symbol)?),
    };
    if !apply(config_path, Command::UpdateGrade { id, grade })?.is_empty() {
        match grade {
            Some(g) => println!("Module {id} graded {g}"),
            None => println!("Cleared grade of module {id}"),
        }
    }
    Ok(())
}

pub fn exempt(config_path: Option<PathBuf>, id: &str) -> Result<()> {
    let id: ModuleId = parse(id)?;
    if !apply(config_path, Command::ToggleExemption { id })?.is_empty() {
        println!("Toggled exemption of module {id}");
    }
    Ok(())
}

pub fn move_module(
    config_path: Option<PathBuf>,
    id: &str,
    to: &str,
    index: Option<usize>,
) -> Result<()> {
    let id: ModuleId = parse(id)?;
    let target: SemesterLabel = parse(to)?;
    if !apply(config_path, Command::MoveModule { id, target, index })?.is_empty() {
        println!("Moved module {id} to {target}");
    }
    Ok(())
}

pub fn set_start(config_path: Option<PathBuf>, start: &str) -> Result<()> {
    let start: ProgramStart = parse(start)?;
    if !apply(config_path, Command::ChangeProgramStart { start })?.is_empty() {
        println!("Program start set to {start}");
    }
    Ok(())
}

pub fn tier(config_path: Option<PathBuf>, tier: &str) -> Result<()> {
    let high = match tier.trim().to_lowercase().as_str() {
        "high" => true,
        "standard" => false,
        other => anyhow::bail!("unknown exemption tier: '{other}' (expected high or standard)"),
    };
    if !apply(config_path, Command::SetExemptionTier { high })?.is_empty() {
        println!("Exemption tier set to {}", tier.trim().to_lowercase());
    }
    Ok(())
}

pub fn toggle(config_path: Option<PathBuf>, name: &str, state: &str) -> Result<()> {
    let toggle: Toggle = parse(name)?;
    let enabled = match state.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" => true,
        "off" | "false" | "no" => false,
        other => anyhow::bail!("invalid toggle state: '{other}' (expected on or off)"),
    };
    if !apply(config_path, Command::SetToggle { toggle, enabled })?.is_empty() {
        println!("{toggle} {}", if enabled { "on" } else { "off" });
    }
    Ok(())
}
