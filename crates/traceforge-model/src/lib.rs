//! Domain records for traceforge
//!
//! `Requirement` and `TestCase` are the two record types the whole engine
//! revolves around. Both are immutable once created from this crate's point
//! of view: requirements come from document ingestion, test cases from a
//! completed generation session or from seed data. Edits, if any, belong to
//! the owning store, not to this core.

mod seed;
mod types;

pub use seed::{seed_requirements, seed_test_cases};
pub use types::{Category, Requirement, RequirementKind, TestCase};
