//! In-memory program state.
//!
//! `ProgramState` is the single owner of the module collection and the view
//! state. It is only mutated through [`ProgramState::apply`] (see
//! [`crate::placement`]); everything else reads it.

use std::collections::HashSet;
use std::fmt;

use crate::model::{AcademicSettings, Module, ModuleId, UiToggles, VisibleYears};
use crate::quota::{compute_quota, ExemptionQuota};
use crate::scoring::{aggregate, aggregate_by_semester, ScoreSummary, SemesterScore};
use crate::semester::{SemesterCatalog, SemesterLabel, YearWindow};

/// The durable records, each saved under its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Modules,
    Settings,
    ActiveSemesters,
    VisibleYears,
    UiToggles,
}

impl RecordKey {
    pub const ALL: [RecordKey; 5] = [
        RecordKey::Modules,
        RecordKey::Settings,
        RecordKey::ActiveSemesters,
        RecordKey::VisibleYears,
        RecordKey::UiToggles,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKey::Modules => "modules",
            RecordKey::Settings => "settings",
            RecordKey::ActiveSemesters => "active_semesters",
            RecordKey::VisibleYears => "visible_years",
            RecordKey::UiToggles => "ui_toggles",
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records as loaded from storage. `None` means absent or unreadable.
#[derive(Debug, Clone, Default)]
pub struct StoredRecords {
    pub modules: Option<Vec<Module>>,
    pub settings: Option<AcademicSettings>,
    pub active_semesters: Option<Vec<SemesterLabel>>,
    pub visible_years: Option<VisibleYears>,
    pub ui_toggles: Option<UiToggles>,
}

#[derive(Debug, Clone)]
pub struct ProgramState {
    pub(crate) modules: Vec<Module>,
    pub(crate) settings: AcademicSettings,
    pub(crate) catalog: SemesterCatalog,
    pub(crate) active_semesters: Vec<SemesterLabel>,
    pub(crate) visible_years: VisibleYears,
    pub(crate) ui_toggles: UiToggles,
    next_id: u64,
}

impl Default for ProgramState {
    fn default() -> Self {
        Self::new(AcademicSettings::default())
    }
}

impl ProgramState {
    /// An empty plan with default view state for `settings`.
    pub fn new(settings: AcademicSettings) -> Self {
        let catalog = SemesterCatalog::generate(settings.program_start);
        Self {
            modules: Vec::new(),
            active_semesters: default_active_semesters(&catalog),
            visible_years: VisibleYears::starting_at(catalog.start().first_year()),
            ui_toggles: UiToggles::default(),
            settings,
            catalog,
            next_id: 1,
        }
    }

    /// Rebuild state from loaded records, repairing anything inconsistent
    /// with the regenerated catalog.
    pub fn from_records(records: StoredRecords) -> Self {
        let mut state = Self::new(records.settings.unwrap_or_default());

        if let Some(toggles) = records.ui_toggles {
            state.ui_toggles = toggles;
        }

        let mut seen_codes = HashSet::new();
        let mut seen_ids = HashSet::new();
        let mut modules = Vec::new();
        let mut needs_id = Vec::new();
        for module in records.modules.unwrap_or_default() {
            if !state.catalog.contains(&module.semester) {
                tracing::warn!(
                    "dropping {} from {}: not in the {} catalog",
                    module.module_code,
                    module.semester,
                    state.settings.program_start
                );
                continue;
            }
            if !seen_codes.insert(module.module_code.to_uppercase()) {
                tracing::warn!("dropping duplicate module {}", module.module_code);
                continue;
            }
            if module.id.0 == u64::MAX || !seen_ids.insert(module.id) {
                needs_id.push(modules.len());
            }
            modules.push(module);
        }
        state.next_id = modules
            .iter()
            .filter_map(|m| m.id.0.checked_add(1))
            .max()
            .unwrap_or(1);
        state.modules = modules;
        for index in needs_id {
            let id = state.allocate_id();
            tracing::warn!(
                "reassigning id of {} to {id}",
                state.modules[index].module_code
            );
            state.modules[index].id = id;
        }

        if let Some(active) = records.active_semesters {
            state.active_semesters = Vec::new();
            for label in active {
                state.activate(label);
            }
        }
        let occupied: Vec<SemesterLabel> = state.modules.iter().map(|m| m.semester).collect();
        for label in occupied {
            state.activate(label);
        }

        if let Some(visible) = records.visible_years {
            let mut years: Vec<YearWindow> = Vec::new();
            for year in visible.years {
                if state.catalog.contains_year(year) && !years.contains(&year) {
                    years.push(year);
                }
            }
            years.sort_by_key(|y| state.catalog.year_position(*y));
            if !years.is_empty() {
                let selected = visible
                    .selected
                    .filter(|s| years.contains(s))
                    .or_else(|| years.first().copied());
                state.visible_years = VisibleYears { years, selected };
            }
        }

        state
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    pub fn find_by_code(&self, code: &str) -> Option<&Module> {
        self.modules
            .iter()
            .find(|m| m.module_code.eq_ignore_ascii_case(code))
    }

    /// Modules of one semester in display order.
    pub fn modules_in(&self, semester: &SemesterLabel) -> Vec<&Module> {
        self.modules
            .iter()
            .filter(|m| m.semester == *semester)
            .collect()
    }

    pub fn settings(&self) -> &AcademicSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &SemesterCatalog {
        &self.catalog
    }

    pub fn active_semesters(&self) -> &[SemesterLabel] {
        &self.active_semesters
    }

    pub fn visible_years(&self) -> &VisibleYears {
        &self.visible_years
    }

    pub fn ui_toggles(&self) -> &UiToggles {
        &self.ui_toggles
    }

    /// Cumulative score over the whole plan.
    pub fn score(&self) -> ScoreSummary {
        aggregate(&self.modules)
    }

    pub fn semester_scores(&self) -> Vec<SemesterScore> {
        aggregate_by_semester(&self.modules, &self.catalog)
    }

    pub fn quota(&self) -> ExemptionQuota {
        compute_quota(
            &self.modules,
            &self.catalog,
            self.settings.high_exemption_tier,
        )
    }

    /// Next unused id. `u64::MAX` is never issued; the counter wraps to the
    /// lowest free id once it gets there.
    pub(crate) fn allocate_id(&mut self) -> ModuleId {
        loop {
            if self.next_id == u64::MAX {
                self.next_id = 1;
            }
            let candidate = ModuleId(self.next_id);
            self.next_id += 1;
            if self.module(candidate).is_none() {
                return candidate;
            }
        }
    }

    /// Add `label` to the active set, keeping catalog order. Returns `true`
    /// if it was not already active.
    pub(crate) fn activate(&mut self, label: SemesterLabel) -> bool {
        if !self.catalog.contains(&label) || self.active_semesters.contains(&label) {
            return false;
        }
        self.active_semesters.push(label);
        let catalog = &self.catalog;
        self.active_semesters.sort_by_key(|l| catalog.position(l));
        true
    }

    /// Reset active semesters and visible years for the current catalog.
    pub(crate) fn reset_view(&mut self) {
        self.active_semesters = default_active_semesters(&self.catalog);
        self.visible_years = VisibleYears::starting_at(self.catalog.start().first_year());
    }
}

fn default_active_semesters(catalog: &SemesterCatalog) -> Vec<SemesterLabel> {
    catalog.first_window()
}
