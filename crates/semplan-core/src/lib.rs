//! semplan-core: academic record planning engine.
//!
//! This crate holds the module collection, the generated semester catalog,
//! grade-point scoring, the exemption quota and the placement commands that
//! mutate the plan. Persistence and the module catalog are reached through
//! the traits in [`traits`].

pub mod error;
pub mod grade;
pub mod model;
pub mod placement;
pub mod planner;
pub mod quota;
pub mod scoring;
pub mod semester;
pub mod state;
pub mod storage;
pub mod store;
pub mod traits;
