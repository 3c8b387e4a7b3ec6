//! semplan-catalog: module catalog integrations.
//!
//! Implements the `ModuleCatalog` trait over the public module API, provides
//! an in-process mock for tests, and loads the `semplan` configuration.

pub mod config;
pub mod http;
pub mod mock;

pub use config::{create_catalog, load_config, CatalogConfig, SemplanConfig};
pub use http::HttpCatalog;
pub use mock::MockCatalog;
