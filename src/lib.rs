//! TalentScope client core
//!
//! Query orchestration and aggregation layer for an interactive candidate
//! explorer: a debounced, race-safe faceted-search orchestrator, an ad-hoc
//! query console with generic tabular results, and a pure aggregation
//! engine producing chart-ready distributions. Rendering surfaces consume
//! the snapshots and reports this crate publishes.

pub mod config;
pub mod core;
pub mod models;
pub mod services;
pub mod session;

// Re-export commonly used types. Paths are crate-anchored because `core`
// and `config` would otherwise be ambiguous with the crates of the same
// name.
pub use crate::config::Settings;
pub use crate::core::{
    aggregate, AggregationBucket, AggregationReport, Criteria, CriteriaUpdate, Insights,
};
pub use crate::models::{
    Candidate, DatasetStats, DegreeLevel, QueryExample, QueryTable, SearchFilters,
};
pub use crate::services::{BackendClient, BackendError, Catalog, ReferenceCache};
pub use crate::session::{
    ConsoleError, QueryConsole, SearchHandle, SearchOrchestrator, SearchSnapshot, SearchStatus,
};
