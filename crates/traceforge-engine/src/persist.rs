//! Materializing generated lines into test-case records
//!
//! Generated output arrives as plain enumerated lines. When a session
//! finishes, each line becomes a `TestCase` linked to the triggering
//! requirement: id allocated after the existing count, title with the
//! leading enumeration stripped, category classified by keyword.

use traceforge_model::{Category, TestCase};

/// Build test-case records from generated lines.
///
/// `existing` is the current size of the TestCases collection; ids continue
/// from there (`TC-<n>`), so repeated sessions never collide.
#[must_use]
pub fn test_cases_from_lines(
    requirement_id: &str,
    lines: &[String],
    existing: usize,
) -> Vec<TestCase> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let title = strip_enumeration(line);
            TestCase::new(
                format!("TC-{:03}", existing + i + 1),
                requirement_id,
                title,
                classify_line(title),
                vec![title.to_string()],
                Vec::new(),
            )
        })
        .collect()
}

/// Strip a leading `"N. "` enumeration, if present.
fn strip_enumeration(line: &str) -> &str {
    let trimmed = line.trim();
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        if let Some(rest) = trimmed[digits..].strip_prefix('.') {
            return rest.trim_start();
        }
    }
    trimmed
}

/// Keyword classification of a generated line.
///
/// Limit-and-load wording wins over error wording so a line like "lock
/// after 5 attempts" lands in Boundary; everything unrecognized defaults
/// to Positive.
fn classify_line(title: &str) -> Category {
    let lower = title.to_lowercase();

    const BOUNDARY: [&str; 6] = [
        "attempts",
        "load",
        "concurrent",
        "limit",
        "timeout",
        "response time",
    ];
    const NEGATIVE: [&str; 5] = ["invalid", "error", "incorrect", "denied", "fail"];

    if BOUNDARY.iter().any(|kw| lower.contains(kw)) {
        Category::Boundary
    } else if NEGATIVE.iter().any(|kw| lower.contains(kw)) {
        Category::Negative
    } else {
        Category::Positive
    }
}
