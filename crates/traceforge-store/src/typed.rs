//! Typed helpers over the JSON store contract
//!
//! The engine and the traceability index work with `Requirement` and
//! `TestCase` values, not raw JSON. These helpers do the serde round-trip
//! and turn decode failures into `StoreError::Corrupt` with enough context
//! to find the offending record.

use serde_json::Value;
use traceforge_model::{Requirement, TestCase};
use traceforge_utils::error::StoreError;

use crate::{Collection, Store};

fn decode<T: serde::de::DeserializeOwned>(
    collection: Collection,
    value: Value,
) -> Result<T, StoreError> {
    let key = value
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or("<missing id>")
        .to_string();
    serde_json::from_value(value).map_err(|e| StoreError::Corrupt {
        collection: collection.as_str().to_string(),
        key,
        reason: e.to_string(),
    })
}

/// All requirements, in insertion order.
///
/// # Errors
/// Returns `StoreError::Corrupt` if a stored record does not decode.
pub fn load_requirements(store: &dyn Store) -> Result<Vec<Requirement>, StoreError> {
    store
        .list(Collection::Requirements)?
        .into_iter()
        .map(|v| decode(Collection::Requirements, v))
        .collect()
}

/// All test cases, in insertion order.
///
/// # Errors
/// Returns `StoreError::Corrupt` if a stored record does not decode.
pub fn load_test_cases(store: &dyn Store) -> Result<Vec<TestCase>, StoreError> {
    store
        .list(Collection::TestCases)?
        .into_iter()
        .map(|v| decode(Collection::TestCases, v))
        .collect()
}

/// Write a requirement keyed by its id.
///
/// # Errors
/// Returns `StoreError` if encoding or the backing medium fails.
pub fn put_requirement(store: &dyn Store, requirement: &Requirement) -> Result<(), StoreError> {
    let value = serde_json::to_value(requirement)?;
    store.put(Collection::Requirements, &requirement.id, value)
}

/// Write a test case keyed by its id.
///
/// # Errors
/// Returns `StoreError` if encoding or the backing medium fails.
pub fn put_test_case(store: &dyn Store, test_case: &TestCase) -> Result<(), StoreError> {
    let value = serde_json::to_value(test_case)?;
    store.put(Collection::TestCases, &test_case.id, value)
}
