//! Flat key-value persistence contract for traceforge
//!
//! The engine never talks to a concrete database: it is handed a `Store`
//! trait object by the embedding application. Lifecycle is owned by the
//! caller, never a process-wide singleton. The contract is deliberately
//! thin (three collections of JSON records, no multi-key transactions),
//! with typed helpers layered on top for the two record shapes the engine
//! reads and writes.

mod memory;
mod typed;

pub use memory::MemoryStore;
pub use typed::{load_requirements, load_test_cases, put_requirement, put_test_case};

use serde_json::Value;
use traceforge_utils::error::StoreError;

/// Named collections the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Requirements,
    TestCases,
    /// Reserved for callers that persist session snapshots; the
    /// orchestrator itself never writes here.
    Sessions,
}

impl Collection {
    /// Stable string name, used in error messages and by file-backed stores.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Requirements => "requirements",
            Collection::TestCases => "test_cases",
            Collection::Sessions => "sessions",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Key-value store over named collections.
///
/// `list` iteration order is stable insertion order; `put` on an existing
/// key replaces the record in place without changing its position. These
/// two guarantees are what make traceability rows deterministic.
pub trait Store: Send + Sync {
    /// Fetch a single record, or `None` if absent.
    ///
    /// # Errors
    /// Returns `StoreError` if the backing medium fails.
    fn get(&self, collection: Collection, key: &str) -> Result<Option<Value>, StoreError>;

    /// Insert or replace a record.
    ///
    /// # Errors
    /// Returns `StoreError` if the backing medium fails.
    fn put(&self, collection: Collection, key: &str, record: Value) -> Result<(), StoreError>;

    /// Remove a record; removing an absent key is not an error.
    ///
    /// # Errors
    /// Returns `StoreError` if the backing medium fails.
    fn delete(&self, collection: Collection, key: &str) -> Result<(), StoreError>;

    /// All records in the collection, in insertion order.
    ///
    /// # Errors
    /// Returns `StoreError` if the backing medium fails.
    fn list(&self, collection: Collection) -> Result<Vec<Value>, StoreError>;
}
