//! Placement commands.
//!
//! Every change to the plan is expressed as a [`Command`] and applied with
//! [`ProgramState::apply`]. A command either commits completely or leaves
//! the state untouched; the return value names the records that changed so
//! the store can persist exactly those.

use crate::error::Rejection;
use crate::grade::Grade;
use crate::model::{AcademicSettings, Module, ModuleId, Toggle};
use crate::quota::window_of;
use crate::semester::{ProgramStart, SemesterCatalog, SemesterLabel, YearWindow};
use crate::state::{ProgramState, RecordKey};
use crate::traits::ModuleDetail;

/// A state transition on the plan.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Append a resolved module to a semester. No-op if the code is taken.
    AddModule {
        detail: ModuleDetail,
        semester: SemesterLabel,
    },
    RemoveModule {
        id: ModuleId,
    },
    /// Set (or clear) the grade. Always reverts any exemption.
    UpdateGrade {
        id: ModuleId,
        grade: Option<Grade>,
    },
    ToggleExemption {
        id: ModuleId,
    },
    /// Move a module to `target`, at `index` within that semester's modules
    /// (appended when `None` or past the end).
    MoveModule {
        id: ModuleId,
        target: SemesterLabel,
        index: Option<usize>,
    },
    RemoveSemester {
        semester: SemesterLabel,
    },
    RemoveYear {
        year: YearWindow,
    },
    ChangeProgramStart {
        start: ProgramStart,
    },
    AddSemester {
        semester: SemesterLabel,
    },
    AddYear {
        year: YearWindow,
    },
    SelectYear {
        year: YearWindow,
    },
    SetExemptionTier {
        high: bool,
    },
    SetToggle {
        toggle: Toggle,
        enabled: bool,
    },
}

/// Records touched by a committed command. Empty for a no-op.
pub type Changes = Vec<RecordKey>;

impl ProgramState {
    /// Apply a command atomically.
    pub fn apply(&mut self, command: Command) -> Result<Changes, Rejection> {
        match command {
            Command::AddModule { detail, semester } => self.add_module(detail, semester),
            Command::RemoveModule { id } => Ok(self.remove_module(id)),
            Command::UpdateGrade { id, grade } => Ok(self.update_grade(id, grade)),
            Command::ToggleExemption { id } => self.toggle_exemption(id),
            Command::MoveModule { id, target, index } => self.move_module(id, target, index),
            Command::RemoveSemester { semester } => Ok(self.remove_semester(semester)),
            Command::RemoveYear { year } => Ok(self.remove_year(year)),
            Command::ChangeProgramStart { start } => Ok(self.change_program_start(start)),
            Command::AddSemester { semester } => self.add_semester(semester),
            Command::AddYear { year } => self.add_year(year),
            Command::SelectYear { year } => Ok(self.select_year(year)),
            Command::SetExemptionTier { high } => Ok(self.set_exemption_tier(high)),
            Command::SetToggle { toggle, enabled } => Ok(self.set_toggle(toggle, enabled)),
        }
    }

    fn add_module(&mut self, detail: ModuleDetail, semester: SemesterLabel) -> Result<Changes, Rejection> {
        if self.find_by_code(&detail.module_code).is_some() {
            return Ok(vec![]);
        }
        if !self.catalog.contains(&semester) {
            return Err(Rejection::UnknownSemester(semester));
        }

        let id = self.allocate_id();
        self.modules.push(Module {
            id,
            module_code: detail.module_code,
            title: detail.title,
            module_credit: detail.module_credit,
            letter_grade: None,
            is_exempted: false,
            semester,
        });

        let mut changes = vec![RecordKey::Modules];
        if self.activate(semester) {
            changes.push(RecordKey::ActiveSemesters);
        }
        Ok(changes)
    }

    fn remove_module(&mut self, id: ModuleId) -> Changes {
        let before = self.modules.len();
        self.modules.retain(|m| m.id != id);
        if self.modules.len() == before {
            vec![]
        } else {
            vec![RecordKey::Modules]
        }
    }

    fn update_grade(&mut self, id: ModuleId, grade: Option<Grade>) -> Changes {
        let Some(module) = self.modules.iter_mut().find(|m| m.id == id) else {
            return vec![];
        };
        module.letter_grade = grade;
        module.is_exempted = false;
        vec![RecordKey::Modules]
    }

    fn toggle_exemption(&mut self, id: ModuleId) -> Result<Changes, Rejection> {
        let Some(module) = self.module(id) else {
            return Ok(vec![]);
        };
        if !module.is_exemptible() {
            return Ok(vec![]);
        }

        if !module.is_exempted {
            let window = window_of(&self.catalog, &module.semester);
            let requested = module.module_credit;
            let available = self.quota().remaining(window);
            if requested > available {
                return Err(Rejection::QuotaExceeded {
                    window,
                    requested,
                    available,
                });
            }
        }

        if let Some(module) = self.modules.iter_mut().find(|m| m.id == id) {
            module.is_exempted = !module.is_exempted;
        }
        Ok(vec![RecordKey::Modules])
    }

    fn move_module(
        &mut self,
        id: ModuleId,
        target: SemesterLabel,
        index: Option<usize>,
    ) -> Result<Changes, Rejection> {
        let Some(position) = self.modules.iter().position(|m| m.id == id) else {
            return Ok(vec![]);
        };
        if !self.catalog.contains(&target) {
            return Err(Rejection::UnknownSemester(target));
        }

        self.modules = reorder(self.modules.clone(), position, target, index);

        let mut changes = vec![RecordKey::Modules];
        if self.activate(target) {
            changes.push(RecordKey::ActiveSemesters);
        }
        Ok(changes)
    }

    fn remove_semester(&mut self, semester: SemesterLabel) -> Changes {
        let mut changes = Vec::new();

        let before = self.modules.len();
        self.modules.retain(|m| m.semester != semester);
        if self.modules.len() != before {
            changes.push(RecordKey::Modules);
        }

        let before = self.active_semesters.len();
        self.active_semesters.retain(|l| *l != semester);
        if self.active_semesters.len() != before {
            changes.push(RecordKey::ActiveSemesters);
        }

        changes
    }

    fn remove_year(&mut self, year: YearWindow) -> Changes {
        let mut changes = Vec::new();

        let before = self.modules.len();
        self.modules.retain(|m| m.semester.year != year);
        if self.modules.len() != before {
            changes.push(RecordKey::Modules);
        }

        let before = self.active_semesters.len();
        self.active_semesters.retain(|l| l.year != year);
        if self.active_semesters.len() != before {
            changes.push(RecordKey::ActiveSemesters);
        }

        let visible = &mut self.visible_years;
        let before = visible.years.len();
        visible.years.retain(|y| *y != year);
        let mut visible_changed = visible.years.len() != before;
        if visible.selected == Some(year) {
            visible.selected = visible.years.first().copied();
            visible_changed = true;
        }
        if visible_changed {
            changes.push(RecordKey::VisibleYears);
        }

        changes
    }

    fn change_program_start(&mut self, start: ProgramStart) -> Changes {
        if start == self.settings.program_start {
            return vec![];
        }

        let catalog = SemesterCatalog::generate(start);
        let dropped = self
            .modules
            .iter()
            .filter(|m| !catalog.contains(&m.semester))
            .count();
        if dropped > 0 {
            tracing::info!("program start {start}: dropping {dropped} module(s) outside the new catalog");
        }

        self.modules.retain(|m| catalog.contains(&m.semester));
        self.settings.program_start = start;
        self.catalog = catalog;
        self.reset_view();

        vec![
            RecordKey::Settings,
            RecordKey::Modules,
            RecordKey::ActiveSemesters,
            RecordKey::VisibleYears,
        ]
    }

    fn add_semester(&mut self, semester: SemesterLabel) -> Result<Changes, Rejection> {
        if !self.catalog.contains(&semester) {
            return Err(Rejection::UnknownSemester(semester));
        }
        Ok(if self.activate(semester) {
            vec![RecordKey::ActiveSemesters]
        } else {
            vec![]
        })
    }

    fn add_year(&mut self, year: YearWindow) -> Result<Changes, Rejection> {
        if !self.catalog.contains_year(year) {
            return Err(Rejection::UnknownYear(year));
        }
        let visible = &mut self.visible_years;
        if visible.years.contains(&year) && visible.selected == Some(year) {
            return Ok(vec![]);
        }
        if !visible.years.contains(&year) {
            visible.years.push(year);
            let catalog = &self.catalog;
            visible.years.sort_by_key(|y| catalog.year_position(*y));
        }
        visible.selected = Some(year);
        Ok(vec![RecordKey::VisibleYears])
    }

    fn select_year(&mut self, year: YearWindow) -> Changes {
        let visible = &mut self.visible_years;
        if !visible.years.contains(&year) || visible.selected == Some(year) {
            return vec![];
        }
        visible.selected = Some(year);
        vec![RecordKey::VisibleYears]
    }

    fn set_exemption_tier(&mut self, high: bool) -> Changes {
        if self.settings.high_exemption_tier == high {
            return vec![];
        }
        self.settings = AcademicSettings {
            high_exemption_tier: high,
            ..self.settings
        };
        vec![RecordKey::Settings]
    }

    fn set_toggle(&mut self, toggle: Toggle, enabled: bool) -> Changes {
        if self.ui_toggles.get(toggle) == enabled {
            return vec![];
        }
        self.ui_toggles.set(toggle, enabled);
        vec![RecordKey::UiToggles]
    }
}

/// Take the module at `position` out, reassign it to `target`, and rebuild
/// the collection as every other semester's modules followed by the target
/// semester's modules with the moved one spliced in at `index`.
fn reorder(
    mut modules: Vec<Module>,
    position: usize,
    target: SemesterLabel,
    index: Option<usize>,
) -> Vec<Module> {
    let mut moved = modules.remove(position);
    moved.semester = target;

    let (mut in_target, mut others): (Vec<Module>, Vec<Module>) =
        modules.into_iter().partition(|m| m.semester == target);

    let at = index.unwrap_or(in_target.len()).min(in_target.len());
    in_target.insert(at, moved);

    others.extend(in_target);
    others
}
