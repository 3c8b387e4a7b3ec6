//! The `semplan init` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use semplan_core::placement::Command;
use semplan_core::semester::ProgramStart;

use super::{open_store, parse};

pub fn execute(config_path: Option<PathBuf>, start: Option<String>) -> Result<()> {
    if config_path.is_none() {
        if std::path::Path::new("semplan.toml").exists() {
            println!("semplan.toml already exists, skipping.");
        } else {
            std::fs::write("semplan.toml", SAMPLE_CONFIG)?;
            println!("Created semplan.toml");
        }
    }

    let (config, mut store) = open_store(config_path)?;
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("failed to create {}", config.data_dir.display()))?;

    if let Some(start) = start {
        let start: ProgramStart = parse(&start)?;
        store.execute(Command::ChangeProgramStart { start })?;
    }
    store.save_all();

    let state = store.state();
    println!(
        "Plan for {} stored in {} ({} modules)",
        state.settings().program_start,
        config.data_dir.display(),
        state.modules().len()
    );

    println!("\nNext steps:");
    println!("  1. Run: semplan search <query>");
    println!("  2. Run: semplan add <code> --semester \"{}\"", state.catalog().first_window()[0]);
    println!("  3. Run: semplan summary");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# semplan configuration

# Directory holding the plan records
# data_dir = "${HOME}/.local/share/semplan"

[catalog]
base_url = "https://api.nusmods.com/v2"
# academic_year = "2024-2025"
timeout_secs = 30
"#;
