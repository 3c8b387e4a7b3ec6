//! Mock catalog for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use semplan_core::error::CatalogError;
use semplan_core::traits::{ModuleCatalog, ModuleDetail, ModuleSummary};

/// An in-process module catalog for exercising the planner without network
/// access.
///
/// Failures can be injected per operation; they stay in place until cleared.
pub struct MockCatalog {
    /// Module details keyed by code, in insertion order.
    modules: Vec<ModuleDetail>,
    list_failure: Mutex<Option<CatalogError>>,
    detail_failures: Mutex<HashMap<String, CatalogError>>,
    list_calls: AtomicU32,
    detail_calls: AtomicU32,
    /// Last code passed to `get_module_detail`.
    last_lookup: Mutex<Option<String>>,
}

impl MockCatalog {
    pub fn new(modules: Vec<ModuleDetail>) -> Self {
        Self {
            modules,
            list_failure: Mutex::new(None),
            detail_failures: Mutex::new(HashMap::new()),
            list_calls: AtomicU32::new(0),
            detail_calls: AtomicU32::new(0),
            last_lookup: Mutex::new(None),
        }
    }

    /// A catalog of `(code, title, credits)` entries.
    pub fn with_modules(entries: &[(&str, &str, f64)]) -> Self {
        Self::new(
            entries
                .iter()
                .map(|(code, title, credit)| ModuleDetail {
                    module_code: code.to_string(),
                    title: title.to_string(),
                    module_credit: *credit,
                })
                .collect(),
        )
    }

    /// Make `list_all_modules` fail (or succeed again with `None`).
    pub fn fail_list(&self, error: Option<CatalogError>) {
        *self.list_failure.lock().unwrap() = error;
    }

    /// Make lookups of `code` fail with `error`.
    pub fn fail_detail(&self, code: &str, error: CatalogError) {
        self.detail_failures
            .lock()
            .unwrap()
            .insert(code.to_string(), error);
    }

    pub fn list_calls(&self) -> u32 {
        self.list_calls.load(Ordering::Relaxed)
    }

    pub fn detail_calls(&self) -> u32 {
        self.detail_calls.load(Ordering::Relaxed)
    }

    pub fn last_lookup(&self) -> Option<String> {
        self.last_lookup.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModuleCatalog for MockCatalog {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_all_modules(&self) -> Result<Vec<ModuleSummary>, CatalogError> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(err) = self.list_failure.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self
            .modules
            .iter()
            .map(|m| ModuleSummary {
                module_code: m.module_code.clone(),
                title: m.title.clone(),
            })
            .collect())
    }

    async fn get_module_detail(&self, code: &str) -> Result<ModuleDetail, CatalogError> {
        self.detail_calls.fetch_add(1, Ordering::Relaxed);
        *self.last_lookup.lock().unwrap() = Some(code.to_string());

        if let Some(err) = self.detail_failures.lock().unwrap().get(code) {
            return Err(err.clone());
        }
        self.modules
            .iter()
            .find(|m| m.module_code == code)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use semplan_core::error::PlannerError;
    use semplan_core::grade::Grade;
    use semplan_core::placement::Command;
    use semplan_core::planner::{AddOutcome, Planner};
    use semplan_core::store::ProgramStore;
    use semplan_core::traits::TracingNotifier;

    fn catalog() -> Arc<MockCatalog> {
        Arc::new(MockCatalog::with_modules(&[
            ("CS1101S", "Programming Methodology", 4.0),
            ("CS1231S", "Discrete Structures", 4.0),
            ("CP3880", "Advanced Technology Attachment", 12.0),
        ]))
    }

    fn planner(catalog: &Arc<MockCatalog>) -> Planner {
        Planner::new(
            ProgramStore::in_memory(),
            catalog.clone(),
            Arc::new(TracingNotifier),
        )
    }

    #[tokio::test]
    async fn serves_details() {
        let catalog = catalog();
        let detail = catalog.get_module_detail("CP3880").await.unwrap();
        assert_eq!(detail.module_credit, 12.0);
        assert_eq!(catalog.detail_calls(), 1);
        assert_eq!(catalog.last_lookup().as_deref(), Some("CP3880"));

        let err = catalog.get_module_detail("ZZ9999").await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn planner_retries_after_list_failure() {
        let catalog = catalog();
        catalog.fail_list(Some(CatalogError::Timeout(30)));
        let mut planner = planner(&catalog);
        let semester = planner.state().catalog().first_window()[0];

        assert!(planner.load_catalog().await.is_err());
        assert!(matches!(
            planner.add_module("CS1101S", semester).await,
            Err(PlannerError::CatalogUnavailable(_))
        ));

        catalog.fail_list(None);
        assert_eq!(planner.load_catalog().await.unwrap(), 3);
        assert_eq!(catalog.list_calls(), 2);

        let outcome = planner.add_module(" cs1101s ", semester).await.unwrap();
        assert!(matches!(outcome, AddOutcome::Added(_)));
        assert_eq!(catalog.last_lookup().as_deref(), Some("CS1101S"));
    }

    #[tokio::test]
    async fn planner_keeps_plan_on_lookup_failure() {
        let catalog = catalog();
        catalog.fail_detail(
            "CS1231S",
            CatalogError::Api {
                status: 502,
                message: "bad gateway".into(),
            },
        );
        let mut planner = planner(&catalog);
        let semester = planner.state().catalog().first_window()[1];
        planner.load_catalog().await.unwrap();

        let AddOutcome::Added(id) = planner.add_module("CS1101S", semester).await.unwrap() else {
            panic!("expected CS1101S to be added");
        };
        planner
            .apply(Command::UpdateGrade {
                id,
                grade: Some(Grade::A),
            })
            .unwrap();
        let before = planner.state().modules().to_vec();

        let err = planner.add_module("CS1231S", semester).await.unwrap_err();
        assert!(err.to_string().contains("502"));
        assert_eq!(planner.state().modules(), before.as_slice());
    }
}
