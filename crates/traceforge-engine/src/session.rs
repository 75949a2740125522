//! Session state and snapshots

use serde::{Deserialize, Serialize};

use traceforge_provider::ErrorKind;

/// The staged status lines the log ticker emits, one per tick, in order.
/// The ticker stops when the script is exhausted; it never loops.
pub const LOG_SCRIPT: [&str; 10] = [
    "Initializing AI QE Engine...",
    "Loading project context...",
    "Parsing user stories...",
    "Analyzing acceptance criteria...",
    "Generating manual test cases...",
    "Generating BDD scenarios...",
    "Generating security test cases...",
    "Generating non-functional tests...",
    "Finalizing test artifacts...",
    "AI generation completed successfully",
];

/// Opaque session token. Compare for identity, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub(crate) u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Lifecycle of a generation session.
///
/// `Failed` is bookkeeping only: it still carries a usable (canned) result
/// set, so callers may treat `Completed` and `Failed` alike as "terminal
/// with possibly-degraded provenance".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Running,
    Completed,
    Failed,
}

impl SessionStatus {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Failed)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Idle => write!(f, "idle"),
            SessionStatus::Running => write!(f, "running"),
            SessionStatus::Completed => write!(f, "completed"),
            SessionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Internally-consistent snapshot of session state at a point in time.
///
/// Within one snapshot, `progress_percent` and `log_lines` were read under
/// the same lock acquisition: no torn reads. `result_test_cases` is only
/// non-empty once `status` is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub status: SessionStatus,
    pub progress_percent: u8,
    pub log_lines: Vec<String>,
    pub result_test_cases: Vec<String>,
    pub error_kind: Option<ErrorKind>,
}

impl SessionSnapshot {
    pub(crate) fn idle() -> Self {
        Self {
            session_id: SessionId(0),
            status: SessionStatus::Idle,
            progress_percent: 0,
            log_lines: Vec::new(),
            result_test_cases: Vec::new(),
            error_kind: None,
        }
    }

    pub(crate) fn running(session_id: SessionId) -> Self {
        Self {
            session_id,
            status: SessionStatus::Running,
            progress_percent: 0,
            log_lines: Vec::new(),
            result_test_cases: Vec::new(),
            error_kind: None,
        }
    }
}
