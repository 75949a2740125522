//! Traceability index: derived requirement-to-test joins and coverage
//!
//! Everything here is pure and recomputed on read: nothing is cached or
//! stored. The one hard guarantee: a requirement with zero linked test
//! cases always yields a row with an empty `linked_tests`, so "uncovered"
//! is explicit, never an omission.

use serde::{Deserialize, Serialize};

use traceforge_model::{Category, Requirement, TestCase};

/// One requirement and the test cases that reference it.
///
/// Derived, never stored. `linked_tests` is exactly the set of test cases
/// whose `requirement_id` matches, in the order the test cases were given
/// (store insertion order upstream).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceabilityRow {
    pub requirement: Requirement,
    pub linked_tests: Vec<TestCase>,
}

impl TraceabilityRow {
    /// A row with no linked tests renders as explicitly uncovered.
    #[must_use]
    pub fn is_covered(&self) -> bool {
        !self.linked_tests.is_empty()
    }
}

/// Coverage numbers the matrix surface shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageSummary {
    /// Total requirements
    pub total: usize,
    /// Requirements with at least one linked test case
    pub covered: usize,
    /// Rounded percentage, 0 when there are no requirements
    pub percent: u8,
}

/// Join requirements against test cases on `requirement_id`.
///
/// One row per requirement, in the requirements' given order. Test cases
/// referencing an unknown requirement simply join to no row; a dangling
/// link is tolerated, not an error.
#[must_use]
pub fn rows_for(requirements: &[Requirement], test_cases: &[TestCase]) -> Vec<TraceabilityRow> {
    requirements
        .iter()
        .map(|req| TraceabilityRow {
            requirement: req.clone(),
            linked_tests: test_cases
                .iter()
                .filter(|tc| tc.requirement_id == req.id)
                .cloned()
                .collect(),
        })
        .collect()
}

/// Rounded percentage of rows with at least one linked test.
///
/// Defined as 0 for an empty row set.
#[must_use]
pub fn coverage_percent(rows: &[TraceabilityRow]) -> u8 {
    summarize(rows).percent
}

/// Full coverage numbers for a row set.
#[must_use]
pub fn summarize(rows: &[TraceabilityRow]) -> CoverageSummary {
    let total = rows.len();
    let covered = rows.iter().filter(|row| row.is_covered()).count();
    let percent = if total == 0 {
        0
    } else {
        // Integer arithmetic with round-half-up; covered <= total keeps
        // this within 0..=100.
        ((covered * 100 + total / 2) / total) as u8
    };
    CoverageSummary {
        total,
        covered,
        percent,
    }
}

/// Restrict rows for the explorer views.
///
/// - `by_requirement`: keep only the named requirement's row (`None` is the
///   "ALL" sentinel).
/// - `by_category`: prune linked tests to the given category. Rows are not
///   dropped when pruning empties them; uncovered visibility holds in the
///   filtered view too.
/// - `search`: case-insensitive substring over requirement title and
///   statement, and over test titles and steps; a row survives if the
///   requirement matches (all its tests kept) or if at least one test
///   matches (only matching tests kept).
#[must_use]
pub fn filter(
    rows: &[TraceabilityRow],
    by_requirement: Option<&str>,
    by_category: Option<Category>,
    search: Option<&str>,
) -> Vec<TraceabilityRow> {
    let needle = search.map(str::to_lowercase).filter(|s| !s.is_empty());

    rows.iter()
        .filter(|row| match by_requirement {
            Some(id) => row.requirement.id == id,
            None => true,
        })
        .filter_map(|row| {
            let mut row = row.clone();
            if let Some(category) = by_category {
                row.linked_tests.retain(|tc| tc.category == category);
            }
            match &needle {
                None => Some(row),
                Some(needle) => {
                    if requirement_matches(&row.requirement, needle) {
                        Some(row)
                    } else {
                        row.linked_tests.retain(|tc| test_matches(tc, needle));
                        if row.linked_tests.is_empty() {
                            None
                        } else {
                            Some(row)
                        }
                    }
                }
            }
        })
        .collect()
}

/// Flat test-case view for the explorer, honoring the same filters.
#[must_use]
pub fn filter_test_cases(
    test_cases: &[TestCase],
    by_requirement: Option<&str>,
    by_category: Option<Category>,
    search: Option<&str>,
) -> Vec<TestCase> {
    let needle = search.map(str::to_lowercase).filter(|s| !s.is_empty());

    test_cases
        .iter()
        .filter(|tc| match by_requirement {
            Some(id) => tc.requirement_id == id,
            None => true,
        })
        .filter(|tc| match by_category {
            Some(category) => tc.category == category,
            None => true,
        })
        .filter(|tc| match &needle {
            Some(needle) => test_matches(tc, needle),
            None => true,
        })
        .cloned()
        .collect()
}

fn requirement_matches(req: &Requirement, needle: &str) -> bool {
    req.title.to_lowercase().contains(needle) || req.statement.to_lowercase().contains(needle)
}

fn test_matches(tc: &TestCase, needle: &str) -> bool {
    tc.title.to_lowercase().contains(needle)
        || tc.steps.iter().any(|s| s.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use traceforge_model::{RequirementKind, seed_requirements, seed_test_cases};

    fn req(id: &str) -> Requirement {
        Requirement::new(id, RequirementKind::Functional, id, format!("{id} statement"))
    }

    fn tc(id: &str, req_id: &str) -> TestCase {
        TestCase::new(id, req_id, id, Category::Positive, vec![], vec![])
    }

    #[test]
    fn test_half_covered_scenario() {
        let rows = rows_for(
            &[req("REQ-001"), req("REQ-002")],
            &[tc("T1", "REQ-001")],
        );

        assert_eq!(coverage_percent(&rows), 50);
        assert_eq!(rows[1].requirement.id, "REQ-002");
        assert!(rows[1].linked_tests.is_empty(), "uncovered row is present, not omitted");
    }

    #[test]
    fn test_empty_rows_is_zero_not_division_error() {
        assert_eq!(coverage_percent(&[]), 0);
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.percent, 0);
    }

    #[test]
    fn test_dangling_test_case_joins_nowhere() {
        let rows = rows_for(&[req("REQ-001")], &[tc("T1", "REQ-999")]);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].linked_tests.is_empty());
    }

    #[test]
    fn test_linked_tests_keep_given_order() {
        let rows = rows_for(
            &[req("REQ-001")],
            &[tc("T2", "REQ-001"), tc("T1", "REQ-001"), tc("T3", "REQ-002")],
        );
        let ids: Vec<&str> = rows[0].linked_tests.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["T2", "T1"]);
    }

    #[test]
    fn test_seed_data_is_fully_covered() {
        let rows = rows_for(&seed_requirements(), &seed_test_cases());
        assert_eq!(coverage_percent(&rows), 100);
        let summary = summarize(&rows);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.covered, 2);
    }

    #[test]
    fn test_filter_by_requirement() {
        let rows = rows_for(&seed_requirements(), &seed_test_cases());
        let filtered = filter(&rows, Some("REQ-002"), None, None);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].requirement.id, "REQ-002");
    }

    #[test]
    fn test_filter_by_category_keeps_uncovered_rows() {
        let rows = rows_for(&seed_requirements(), &seed_test_cases());
        let filtered = filter(&rows, None, Some(Category::Negative), None);

        // Both rows survive; only REQ-001 retains a (negative) test
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].linked_tests.len(), 1);
        assert_eq!(filtered[0].linked_tests[0].id, "TEST-002");
        assert!(filtered[1].linked_tests.is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_over_steps() {
        let rows = rows_for(&seed_requirements(), &seed_test_cases());
        let filtered = filter(&rows, None, None, Some("CONCURRENT USERS"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].requirement.id, "REQ-002");
    }

    #[test]
    fn test_search_on_requirement_statement_keeps_all_tests() {
        let rows = rows_for(&seed_requirements(), &seed_test_cases());
        let filtered = filter(&rows, None, None, Some("registered users"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].linked_tests.len(), 2);
    }

    #[test]
    fn test_flat_explorer_filters_compose() {
        let cases = seed_test_cases();
        let visible = filter_test_cases(&cases, Some("REQ-001"), Some(Category::Negative), None);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "TEST-002");

        let all = filter_test_cases(&cases, None, None, None);
        assert_eq!(all.len(), 3);
    }

    proptest! {
        #[test]
        fn prop_coverage_invariant_under_test_reordering(
            covered_mask in proptest::collection::vec(any::<bool>(), 1..20),
            seed in any::<u64>(),
        ) {
            let requirements: Vec<Requirement> = (0..covered_mask.len())
                .map(|i| req(&format!("REQ-{i:03}")))
                .collect();
            let mut test_cases: Vec<TestCase> = covered_mask
                .iter()
                .enumerate()
                .filter(|(_, covered)| **covered)
                .map(|(i, _)| tc(&format!("T{i}"), &format!("REQ-{i:03}")))
                .collect();

            let baseline = coverage_percent(&rows_for(&requirements, &test_cases));

            // Deterministic shuffle
            let mut state = seed;
            for i in (1..test_cases.len()).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (state % (i as u64 + 1)) as usize;
                test_cases.swap(i, j);
            }

            let shuffled = coverage_percent(&rows_for(&requirements, &test_cases));
            prop_assert_eq!(baseline, shuffled);

            let expected_covered = covered_mask.iter().filter(|c| **c).count();
            let expected = ((expected_covered * 100 + covered_mask.len() / 2)
                / covered_mask.len()) as u8;
            prop_assert_eq!(baseline, expected);
        }

        #[test]
        fn prop_percent_bounded(
            total in 0usize..40,
            covered_bias in any::<u64>(),
        ) {
            let requirements: Vec<Requirement> =
                (0..total).map(|i| req(&format!("REQ-{i:03}"))).collect();
            let test_cases: Vec<TestCase> = (0..total)
                .filter(|i| (covered_bias >> (i % 64)) & 1 == 1)
                .map(|i| tc(&format!("T{i}"), &format!("REQ-{i:03}")))
                .collect();

            let pct = coverage_percent(&rows_for(&requirements, &test_cases));
            prop_assert!(pct <= 100);
        }
    }
}
