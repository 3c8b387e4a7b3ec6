//! The `semplan list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use semplan_core::model::Module;
use semplan_core::state::ProgramState;

use super::open_store;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let (_, store) = open_store(config_path)?;
    let state = store.state();

    println!("Program start: {}", state.settings().program_start);
    if let Some(year) = state.visible_years().selected {
        println!("Selected year: {year}");
    }

    for semester in state.active_semesters() {
        let modules = state.modules_in(semester);
        let score = semplan_core::scoring::aggregate_semester(state.modules(), semester);
        println!(
            "\n{semester}: {} modules, {} MCs, average {:.2}",
            modules.len(),
            score.total_credits,
            score.average
        );
        if modules.is_empty() {
            continue;
        }
        if state.ui_toggles().compact_view {
            for module in modules {
                println!("  {}", compact_line(state, module));
            }
        } else {
            println!("{}", module_table(state, &modules));
        }
    }

    if state.ui_toggles().show_exemption_panel {
        let quota = state.quota();
        println!(
            "\nExemption quota: {} MCs left in the first window, {} MCs left in the second",
            quota.first.remaining, quota.second.remaining
        );
    }

    Ok(())
}

fn grade_cell(module: &Module) -> String {
    match module.letter_grade {
        Some(grade) if module.is_exempted => format!("{grade} (S/U)"),
        Some(grade) => grade.to_string(),
        None => "-".to_string(),
    }
}

fn compact_line(state: &ProgramState, module: &Module) -> String {
    let mut line = format!(
        "[{}] {} {} MCs {}",
        module.id,
        module.module_code,
        module.module_credit,
        grade_cell(module)
    );
    if state.ui_toggles().show_grade_points {
        if let Some(points) = module.grade_points() {
            line.push_str(&format!(" ({points:.1})"));
        }
    }
    line
}

fn module_table(state: &ProgramState, modules: &[&Module]) -> Table {
    let show_points = state.ui_toggles().show_grade_points;

    let mut header = vec!["ID", "Code", "Title", "MCs", "Grade"];
    if show_points {
        header.push("Points");
    }

    let mut table = Table::new();
    table.set_header(header);
    for module in modules {
        let mut row = vec![
            Cell::new(module.id),
            Cell::new(&module.module_code),
            Cell::new(&module.title),
            Cell::new(module.module_credit),
            Cell::new(grade_cell(module)),
        ];
        if show_points {
            row.push(Cell::new(
                module
                    .grade_points()
                    .map(|p| format!("{p:.1}"))
                    .unwrap_or_default(),
            ));
        }
        table.add_row(row);
    }
    table
}
