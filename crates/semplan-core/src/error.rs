//! Error types.
//!
//! Catalog errors are defined here rather than in `semplan-catalog` so the
//! planner can classify them without depending on a concrete client.

use thiserror::Error;

use crate::quota::QuotaWindow;
use crate::semester::{SemesterLabel, YearWindow};

/// Errors from the module catalog collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// The catalog has no module with this code.
    #[error("module not found: {0}")]
    NotFound(String),

    /// The catalog returned an error response.
    #[error("catalog error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The request timed out.
    #[error("catalog request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("invalid catalog response: {0}")]
    InvalidResponse(String),
}

impl CatalogError {
    /// Returns `true` if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::NotFound(_) | CatalogError::InvalidResponse(_) => false,
            CatalogError::Api { status, .. } => *status >= 500 || *status == 429,
            CatalogError::Timeout(_) | CatalogError::Network(_) => true,
        }
    }
}

/// A command refused by validation. The plan is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error(
        "cannot exempt {requested} MCs: only {available} MCs of exemption remain in the {window}"
    )]
    QuotaExceeded {
        window: QuotaWindow,
        requested: f64,
        available: f64,
    },

    #[error("semester {0} is not part of this program")]
    UnknownSemester(SemesterLabel),

    #[error("year {0} is not part of this program")]
    UnknownYear(YearWindow),
}

/// Errors surfaced by the planner.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The module list has not been fetched yet; retry with `load_catalog`.
    #[error("module catalog unavailable: {0}")]
    CatalogUnavailable(String),
}
