//! traceforge - generation orchestration and requirement-to-test traceability
//!
//! This crate turns requirement records into generated test artifacts and
//! tracks requirement-to-test coverage. It is a library consumed by
//! presentation code: no CLI surface, no wire protocol, no file format.
//!
//! Three subsystems, composed by the embedding application:
//!
//! - **Provider** ([`GenerationProvider`]): a pluggable test-generation
//!   backend behind a fixed fallback chain (live, demo, error-fallback).
//!   Generation never fails visibly; degraded outcomes carry an
//!   [`ErrorKind`] classification instead of an error.
//! - **Orchestrator** ([`GenerationOrchestrator`]): runs one cancellable
//!   generation session at a time, with independently-clocked progress and
//!   log streams and a terminal transition gated on provider resolution.
//! - **Traceability** ([`rows_for`], [`coverage_percent`], [`filter`]):
//!   derived, recomputed-on-read joins from requirements to test cases,
//!   with coverage metrics and filter/search views.
//!
//! Persistence is an injected [`Store`] dependency: flat key-value
//! collections, lifecycle owned by the caller. [`MemoryStore`] is provided
//! for embedding and tests.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use traceforge::{
//!     Config, GenerationOrchestrator, MemoryStore, Store,
//!     put_requirement, seed_requirements,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None)?;
//!     let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
//!     for requirement in seed_requirements() {
//!         put_requirement(store.as_ref(), &requirement)?;
//!     }
//!
//!     let orchestrator =
//!         GenerationOrchestrator::from_config(&config)?.with_store(Arc::clone(&store));
//!     orchestrator.start("REQ-001", "Login feature");
//!
//!     // Poll the snapshot from the presentation layer
//!     let session = orchestrator.current_session();
//!     println!("{}% {:?}", session.progress_percent, session.status);
//!     Ok(())
//! }
//! ```
//!
//! # Coverage
//!
//! ```
//! use traceforge::{coverage_percent, rows_for, seed_requirements, seed_test_cases};
//!
//! let rows = rows_for(&seed_requirements(), &seed_test_cases());
//! assert_eq!(coverage_percent(&rows), 100);
//! ```

pub use traceforge_config::{Config, EngineConfig, ProviderConfig};
pub use traceforge_engine::{
    GenerationOrchestrator, LOG_SCRIPT, SessionId, SessionSnapshot, SessionStatus, Timing,
};
pub use traceforge_model::{
    Category, Requirement, RequirementKind, TestCase, seed_requirements, seed_test_cases,
};
pub use traceforge_provider::{
    CANNED_LINES, DemoBackend, ErrorKind, GenerationBackend, GenerationOutcome,
    GenerationProvider, HttpBackend, Provenance, canned_lines,
};
pub use traceforge_store::{
    Collection, MemoryStore, Store, load_requirements, load_test_cases, put_requirement,
    put_test_case,
};
pub use traceforge_trace::{
    CoverageSummary, TraceabilityRow, coverage_percent, filter, filter_test_cases, rows_for,
    summarize,
};
pub use traceforge_utils::error::{ConfigError, ProviderError, StoreError, TraceForgeError};
pub use traceforge_utils::logging::init_tracing;
