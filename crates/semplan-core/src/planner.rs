//! Planner orchestrator.
//!
//! Ties the program store to the module catalog and the notification
//! channel. Adding a module is the only operation that awaits; the plan is
//! untouched until the catalog answers, so dropping a pending add commits
//! nothing. Every mutating method takes `&mut self`, which keeps a single
//! writer on the plan at any time.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, PlannerError, Rejection};
use crate::model::ModuleId;
use crate::placement::{Changes, Command};
use crate::quota::ExemptionQuota;
use crate::scoring::{ScoreSummary, SemesterScore};
use crate::semester::SemesterLabel;
use crate::state::ProgramState;
use crate::store::ProgramStore;
use crate::traits::{ModuleCatalog, ModuleSummary, Notice, NoticeKind, Notifier};

/// Whether the module list has been fetched.
#[derive(Debug, Clone)]
pub enum CatalogStatus {
    NotLoaded,
    Loaded(Vec<ModuleSummary>),
    /// The last attempt failed; adds stay blocked until a retry succeeds.
    Unavailable(String),
}

/// Result of [`Planner::add_module`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added(ModuleId),
    /// A module with this code is already planned; nothing changed.
    AlreadyPresent(ModuleId),
}

/// Derived view of the whole plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub program_start: String,
    pub module_count: usize,
    pub cumulative: ScoreSummary,
    pub semesters: Vec<SemesterScore>,
    pub quota: ExemptionQuota,
}

impl PlanSummary {
    pub fn from_state(state: &ProgramState) -> Self {
        Self {
            program_start: state.settings().program_start.to_string(),
            module_count: state.modules().len(),
            cumulative: state.score(),
            semesters: state.semester_scores(),
            quota: state.quota(),
        }
    }
}

pub struct Planner {
    store: ProgramStore,
    catalog: Arc<dyn ModuleCatalog>,
    notifier: Arc<dyn Notifier>,
    status: CatalogStatus,
}

impl Planner {
    pub fn new(
        store: ProgramStore,
        catalog: Arc<dyn ModuleCatalog>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            catalog,
            notifier,
            status: CatalogStatus::NotLoaded,
        }
    }

    pub fn state(&self) -> &ProgramState {
        self.store.state()
    }

    pub fn catalog_status(&self) -> &CatalogStatus {
        &self.status
    }

    /// Fetch the module list. Call again to retry after a failure.
    pub async fn load_catalog(&mut self) -> Result<usize, PlannerError> {
        match self.catalog.list_all_modules().await {
            Ok(modules) => {
                let count = modules.len();
                tracing::info!("loaded {count} modules from {} catalog", self.catalog.name());
                self.status = CatalogStatus::Loaded(modules);
                Ok(count)
            }
            Err(e) => {
                tracing::error!("module list unavailable: {e}");
                self.notify(NoticeKind::CatalogFailure, e.to_string());
                self.status = CatalogStatus::Unavailable(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Resolve `code` through the catalog and append it to `semester`.
    pub async fn add_module(
        &mut self,
        code: &str,
        semester: SemesterLabel,
    ) -> Result<AddOutcome, PlannerError> {
        let code = code.trim().to_uppercase();

        if let Some(existing) = self.state().find_by_code(&code) {
            return Ok(AddOutcome::AlreadyPresent(existing.id));
        }

        let listed = match &self.status {
            CatalogStatus::Loaded(modules) => {
                modules.iter().any(|m| m.module_code.eq_ignore_ascii_case(&code))
            }
            CatalogStatus::NotLoaded => {
                return Err(PlannerError::CatalogUnavailable(
                    "module list not loaded".into(),
                ))
            }
            CatalogStatus::Unavailable(reason) => {
                return Err(PlannerError::CatalogUnavailable(reason.clone()))
            }
        };

        if !listed {
            return Err(CatalogError::NotFound(code).into());
        }
        if !self.state().catalog().contains(&semester) {
            return Err(self.reject(Rejection::UnknownSemester(semester)));
        }

        let mut detail = match self.catalog.get_module_detail(&code).await {
            Ok(detail) => detail,
            Err(e) => {
                tracing::warn!("lookup of {code} failed: {e}");
                self.notify(NoticeKind::CatalogFailure, e.to_string());
                return Err(e.into());
            }
        };

        if !detail.module_code.eq_ignore_ascii_case(&code) {
            tracing::debug!("{code} resolved as {}, keeping {code}", detail.module_code);
        }
        detail.module_code = code.clone();
        self.execute(Command::AddModule { detail, semester })?;

        let module = self
            .state()
            .find_by_code(&code)
            .ok_or_else(|| CatalogError::InvalidResponse(format!("{code} was not added")))?;
        tracing::info!("added {} to {semester}", module.module_code);
        Ok(AddOutcome::Added(module.id))
    }

    /// Apply a synchronous command. Rejections are also sent to the notifier.
    pub fn apply(&mut self, command: Command) -> Result<Changes, PlannerError> {
        self.execute(command)
    }

    /// Case-insensitive search of the loaded module list by code or title.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&ModuleSummary> {
        let CatalogStatus::Loaded(modules) = &self.status else {
            return vec![];
        };
        let needle = query.trim().to_lowercase();
        modules
            .iter()
            .filter(|m| {
                m.module_code.to_lowercase().contains(&needle)
                    || m.title.to_lowercase().contains(&needle)
            })
            .take(limit)
            .collect()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary::from_state(self.state())
    }

    fn execute(&mut self, command: Command) -> Result<Changes, PlannerError> {
        self.store
            .execute(command)
            .map_err(|rejection| self.reject(rejection))
    }

    fn reject(&self, rejection: Rejection) -> PlannerError {
        self.notify(NoticeKind::Rejected, rejection.to_string());
        rejection.into()
    }

    fn notify(&self, kind: NoticeKind, message: String) {
        self.notifier.notify(Notice { kind, message });
    }
}
