//! Core record types shared across the engine

use serde::{Deserialize, Serialize};

/// Kind of a requirement: functional or non-functional.
///
/// Serialized spelling matches ingested documents ("FR" / "NFR").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequirementKind {
    /// Functional requirement
    #[serde(rename = "FR")]
    Functional,
    /// Non-functional requirement
    #[serde(rename = "NFR")]
    NonFunctional,
}

impl std::fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequirementKind::Functional => write!(f, "FR"),
            RequirementKind::NonFunctional => write!(f, "NFR"),
        }
    }
}

/// A specification item to be tested, produced by document ingestion.
///
/// Immutable within this core once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Unique identifier, e.g. "REQ-001"
    pub id: String,
    /// Functional or non-functional
    pub kind: RequirementKind,
    /// Short human-readable title
    pub title: String,
    /// Full requirement statement
    pub statement: String,
}

impl Requirement {
    /// Create a new requirement record
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        kind: RequirementKind,
        title: impl Into<String>,
        statement: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            statement: statement.into(),
        }
    }
}

/// Category of a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Happy-path verification
    Positive,
    /// Invalid input / error-path verification
    Negative,
    /// Limit and load verification
    Boundary,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Positive => write!(f, "Positive"),
            Category::Negative => write!(f, "Negative"),
            Category::Boundary => write!(f, "Boundary"),
        }
    }
}

/// A generated or curated verification scenario linked to a requirement.
///
/// `requirement_id` may reference a requirement that was never produced;
/// consumers must tolerate the dangling link (the test case simply joins to
/// no row), never treat it as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Unique identifier, e.g. "TEST-001"
    pub id: String,
    /// Requirement this test case verifies (possibly dangling)
    #[serde(rename = "requirementId")]
    pub requirement_id: String,
    /// Short human-readable title
    pub title: String,
    /// Positive, Negative, or Boundary
    pub category: Category,
    /// Ordered execution steps
    pub steps: Vec<String>,
    /// Ordered expected outcomes
    #[serde(rename = "expectedResults")]
    pub expected_results: Vec<String>,
}

impl TestCase {
    /// Create a new test case record
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        requirement_id: impl Into<String>,
        title: impl Into<String>,
        category: Category,
        steps: Vec<String>,
        expected_results: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            requirement_id: requirement_id.into(),
            title: title.into(),
            category,
            steps,
            expected_results,
        }
    }
}
