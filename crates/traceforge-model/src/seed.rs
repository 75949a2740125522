//! Curated demo records
//!
//! The explorer and matrix surfaces need something to show before any
//! generation session has run. These records mirror the shipped demo data.

use crate::types::{Category, Requirement, RequirementKind, TestCase};

/// Demo requirements covering one functional and one non-functional item.
#[must_use]
pub fn seed_requirements() -> Vec<Requirement> {
    vec![
        Requirement::new(
            "REQ-001",
            RequirementKind::Functional,
            "User login",
            "The system shall allow registered users to log in with a username and password.",
        ),
        Requirement::new(
            "REQ-002",
            RequirementKind::NonFunctional,
            "Login responsiveness",
            "The system shall respond to login requests within 2 seconds under load.",
        ),
    ]
}

/// Demo test cases linked to the seed requirements.
#[must_use]
pub fn seed_test_cases() -> Vec<TestCase> {
    vec![
        TestCase::new(
            "TEST-001",
            "REQ-001",
            "Login with valid credentials",
            Category::Positive,
            vec![
                "Navigate to login page".to_string(),
                "Enter valid username and password".to_string(),
                "Click Login".to_string(),
            ],
            vec!["User is redirected to dashboard".to_string()],
        ),
        TestCase::new(
            "TEST-002",
            "REQ-001",
            "Login with invalid password",
            Category::Negative,
            vec![
                "Navigate to login page".to_string(),
                "Enter valid username and invalid password".to_string(),
                "Click Login".to_string(),
            ],
            vec!["Error message is displayed".to_string()],
        ),
        TestCase::new(
            "TEST-003",
            "REQ-002",
            "System response time under load",
            Category::Boundary,
            vec![
                "Simulate 1000 concurrent users".to_string(),
                "Trigger login requests".to_string(),
            ],
            vec!["Response time is under 2 seconds".to_string()],
        ),
    ]
}
