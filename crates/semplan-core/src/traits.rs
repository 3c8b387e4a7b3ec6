//! Collaborator traits: the module catalog, durable storage and the
//! notification channel.
//!
//! `semplan-catalog` implements [`ModuleCatalog`] over HTTP; [`Storage`]
//! implementations live in [`crate::storage`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::model::deserialize_credit;

// ---------------------------------------------------------------------------
// Module catalog
// ---------------------------------------------------------------------------

/// Remote lookup of the modules a student can take.
#[async_trait]
pub trait ModuleCatalog: Send + Sync {
    /// Human-readable catalog name (e.g. "http").
    fn name(&self) -> &str;

    /// Every module offered, code and title only.
    async fn list_all_modules(&self) -> Result<Vec<ModuleSummary>, CatalogError>;

    /// Full detail for one module code.
    async fn get_module_detail(&self, code: &str) -> Result<ModuleDetail, CatalogError>;
}

/// Entry in the module list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSummary {
    pub module_code: String,
    #[serde(default)]
    pub title: String,
}

/// Resolved module metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDetail {
    pub module_code: String,
    #[serde(default)]
    pub title: String,
    /// Catalogs often send this as a string; it is coerced on decode.
    #[serde(default, deserialize_with = "deserialize_credit")]
    pub module_credit: f64,
}

// ---------------------------------------------------------------------------
// Durable storage
// ---------------------------------------------------------------------------

/// Key-value persistence of plain JSON records.
pub trait Storage: Send + Sync {
    /// Load the record stored under `key`, if any.
    fn load(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Replace the record stored under `key`.
    fn save(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Kind of transient message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// A command was refused by validation.
    Rejected,
    /// A catalog request failed.
    CatalogFailure,
}

/// A one-shot message for the presentation layer. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Sink for transient messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that only logs.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        tracing::warn!(kind = ?notice.kind, "{}", notice.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_coerces_string_credit() {
        let detail: ModuleDetail = serde_json::from_str(
            r#"{"moduleCode": "CS2030S", "title": "Programming Methodology II", "moduleCredit": "4"}"#,
        )
        .unwrap();
        assert_eq!(detail.module_credit, 4.0);

        let detail: ModuleDetail =
            serde_json::from_str(r#"{"moduleCode": "CS2030S", "moduleCredit": "n/a"}"#).unwrap();
        assert_eq!(detail.module_credit, 0.0);
        assert!(detail.title.is_empty());
    }
}
