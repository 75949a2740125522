//! Generation session orchestrator
//!
//! Runs one cancellable generation session at a time: two independently
//! clocked tickers (progress and staged log lines) plus exactly one
//! provider call. All session mutation goes through a single mutex; every
//! scheduled task carries the session epoch it was spawned for and
//! re-checks it under the lock before writing, so a superseded or
//! cancelled session can never be touched by leftover work.
//!
//! Terminal transition is gated: the session becomes `Completed` (or
//! `Failed`, for a degraded fallback result) only once the progress ticker
//! has reached 100 AND the provider call has resolved; whichever happens
//! second finalizes. Until then `result_test_cases` stays empty.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tracing::{Instrument, Span, debug, trace, warn};

use traceforge_config::{Config, EngineConfig};
use traceforge_provider::{GenerationOutcome, GenerationProvider};
use traceforge_store::{Collection, Store, put_test_case};
use traceforge_utils::logging::{log_session_complete, log_session_start, session_span};

use crate::persist::test_cases_from_lines;
use crate::session::{LOG_SCRIPT, SessionId, SessionSnapshot, SessionStatus};

/// Ticker cadences for a session.
#[derive(Debug, Clone)]
pub struct Timing {
    /// Progress ticker period
    pub progress_tick: Duration,
    /// Progress increment per tick, clamped to 100
    pub progress_step: u8,
    /// Log ticker period (independent of, and longer than, progress)
    pub log_tick: Duration,
}

impl Timing {
    /// Build cadences from the engine configuration section.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            progress_tick: Duration::from_millis(config.progress_tick_ms),
            progress_step: config.progress_step,
            log_tick: Duration::from_millis(config.log_tick_ms),
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

struct Inner {
    /// Bumped on every start and every effective cancel. Scheduled work
    /// re-checks this before writing; a stale epoch means the session was
    /// superseded and the write is discarded.
    epoch: u64,
    /// Count of sessions ever started, used to mint session ids
    sessions_started: u64,
    /// Requirement the running session was started for
    requirement_id: String,
    /// The session state snapshots are cloned from
    snapshot: SessionSnapshot,
    /// Provider outcome parked until progress reaches 100
    pending: Option<GenerationOutcome>,
    /// Live ticker/provider task handles for the current session
    tasks: Vec<JoinHandle<()>>,
}

/// Single-flight orchestrator for generation sessions.
///
/// One instance owns at most one `Running` session; calling
/// [`start`](Self::start) again supersedes the previous session, aborting
/// its tickers and discarding its eventual provider result.
///
/// All methods take `&self`; the orchestrator is `Send + Sync` and can be
/// shared behind an `Arc`. `start` must be called within a tokio runtime.
pub struct GenerationOrchestrator {
    provider: Arc<GenerationProvider>,
    store: Option<Arc<dyn Store>>,
    timing: Timing,
    inner: Arc<Mutex<Inner>>,
}

impl GenerationOrchestrator {
    /// Create an orchestrator around an already-built provider chain.
    #[must_use]
    pub fn new(provider: GenerationProvider, timing: Timing) -> Self {
        Self {
            provider: Arc::new(provider),
            store: None,
            timing,
            inner: Arc::new(Mutex::new(Inner {
                epoch: 0,
                sessions_started: 0,
                requirement_id: String::new(),
                snapshot: SessionSnapshot::idle(),
                pending: None,
                tasks: Vec::new(),
            })),
        }
    }

    /// Create an orchestrator from configuration.
    ///
    /// # Errors
    /// Returns an error if the provider chain cannot be constructed (a
    /// credential is present but the live backend fails to build).
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = GenerationProvider::from_config(config)
            .context("Failed to construct generation provider")?;
        Ok(Self::new(provider, Timing::from_config(&config.engine)))
    }

    /// Attach a store; completed sessions persist their result lines as
    /// test-case records linked to the triggering requirement.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a new generation session, superseding any running one.
    ///
    /// The superseded session's tickers are aborted immediately and its
    /// in-flight provider call, if any, is abandoned: its resolution will
    /// fail the epoch check and never write into the new session's state.
    pub fn start(&self, requirement_id: impl Into<String>, prompt: impl Into<String>) -> SessionId {
        let requirement_id = requirement_id.into();
        let prompt = prompt.into();

        let (epoch, session_id) = {
            let mut inner = self.lock();
            for task in inner.tasks.drain(..) {
                task.abort();
            }
            inner.epoch += 1;
            inner.sessions_started += 1;
            let session_id = SessionId(inner.sessions_started);
            inner.snapshot = SessionSnapshot::running(session_id);
            inner.pending = None;
            inner.requirement_id = requirement_id.clone();
            (inner.epoch, session_id)
        };

        log_session_start(session_id.0, &requirement_id, self.provider.strategy_name());

        let progress = self.spawn_progress_ticker(epoch);
        let logs = self.spawn_log_ticker(epoch);
        let generation =
            self.spawn_generation(epoch, prompt, session_span(session_id.0, &requirement_id));

        let mut inner = self.lock();
        if inner.epoch == epoch {
            inner.tasks.extend([progress, logs, generation]);
        } else {
            // Superseded between spawn and registration
            progress.abort();
            logs.abort();
            generation.abort();
        }

        session_id
    }

    /// Cancel the running session, if any. Idempotent.
    ///
    /// Stops both tickers, abandons the in-flight provider call, and
    /// freezes the snapshot with `status` back at `Idle`. No field mutates
    /// after cancel; repeated [`current_session`](Self::current_session)
    /// reads return the same frozen snapshot.
    pub fn cancel(&self) {
        let mut inner = self.lock();
        for task in inner.tasks.drain(..) {
            task.abort();
        }
        if inner.snapshot.status == SessionStatus::Running {
            inner.epoch += 1;
            inner.snapshot.status = SessionStatus::Idle;
            inner.pending = None;
            debug!(session_id = %inner.snapshot.session_id, "Session cancelled");
        }
    }

    /// Immutable snapshot of session state at call time.
    ///
    /// Taken under one lock acquisition: progress and log lines are
    /// mutually consistent, never torn.
    #[must_use]
    pub fn current_session(&self) -> SessionSnapshot {
        self.lock().snapshot.clone()
    }

    fn spawn_progress_ticker(&self, epoch: u64) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let store = self.store.clone();
        let period = self.timing.progress_tick;
        let step = self.timing.progress_step;

        tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                let mut guard = inner.lock().unwrap_or_else(|e| e.into_inner());
                if guard.epoch != epoch || guard.snapshot.status != SessionStatus::Running {
                    break;
                }
                let next = guard.snapshot.progress_percent.saturating_add(step).min(100);
                guard.snapshot.progress_percent = next;
                trace!(progress = next, "Progress tick");
                if next >= 100 {
                    // Ticker done; the terminal transition still waits for
                    // the provider if it has not resolved yet.
                    try_finalize(&mut guard, store.as_deref());
                    break;
                }
            }
        })
    }

    fn spawn_log_ticker(&self, epoch: u64) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let period = self.timing.log_tick;

        tokio::spawn(async move {
            for line in LOG_SCRIPT {
                tokio::time::sleep(period).await;
                let mut guard = inner.lock().unwrap_or_else(|e| e.into_inner());
                if guard.epoch != epoch || guard.snapshot.status != SessionStatus::Running {
                    return;
                }
                guard.snapshot.log_lines.push(line.to_string());
            }
            // Script exhausted; the ticker stops without looping.
        })
    }

    fn spawn_generation(&self, epoch: u64, prompt: String, span: Span) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let store = self.store.clone();
        let provider = Arc::clone(&self.provider);

        tokio::spawn(
            async move {
                let outcome = provider.generate(&prompt).await;
                let mut guard = inner.lock().unwrap_or_else(|e| e.into_inner());
                if guard.epoch != epoch || guard.snapshot.status != SessionStatus::Running {
                    debug!("Discarding provider result for superseded session");
                    return;
                }
                guard.pending = Some(outcome);
                try_finalize(&mut guard, store.as_deref());
            }
            .instrument(span),
        )
    }
}

impl Drop for GenerationOrchestrator {
    fn drop(&mut self) {
        // Tearing down the owning scope must not leak still-firing tickers.
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        for task in inner.tasks.drain(..) {
            task.abort();
        }
    }
}

/// Terminal transition, called under the session lock from both the
/// progress ticker (at 100) and the provider task (at resolution).
/// Whichever runs second performs the transition; it fires at most once.
fn try_finalize(inner: &mut Inner, store: Option<&dyn Store>) {
    if inner.snapshot.status != SessionStatus::Running || inner.snapshot.progress_percent < 100 {
        return;
    }
    let Some(outcome) = inner.pending.take() else {
        return;
    };

    inner.snapshot.error_kind = outcome.error_kind;
    inner.snapshot.status = if outcome.is_degraded() {
        SessionStatus::Failed
    } else {
        SessionStatus::Completed
    };
    inner.snapshot.result_test_cases = outcome.lines;

    log_session_complete(
        inner.snapshot.session_id.0,
        &inner.snapshot.status.to_string(),
        inner.snapshot.result_test_cases.len(),
    );

    if let Some(store) = store {
        let existing = store
            .list(Collection::TestCases)
            .map(|records| records.len())
            .unwrap_or(0);
        let cases = test_cases_from_lines(
            &inner.requirement_id,
            &inner.snapshot.result_test_cases,
            existing,
        );
        for case in &cases {
            if let Err(err) = put_test_case(store, case) {
                warn!(error = %err, test_case = %case.id, "Failed to persist generated test case");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Notify;
    use traceforge_provider::{ErrorKind, GenerationBackend, canned_lines};
    use traceforge_store::{MemoryStore, load_test_cases};
    use traceforge_utils::error::ProviderError;

    /// Resolves instantly, echoing the prompt into one line.
    struct EchoBackend;

    #[async_trait]
    impl GenerationBackend for EchoBackend {
        async fn generate(&self, prompt: &str) -> Result<Vec<String>, ProviderError> {
            Ok(vec![format!("1. Verify {prompt}")])
        }
    }

    /// Holds every call until the shared gate is released.
    struct GatedBackend {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl GenerationBackend for GatedBackend {
        async fn generate(&self, prompt: &str) -> Result<Vec<String>, ProviderError> {
            self.gate.notified().await;
            Ok(vec![format!("1. Verify {prompt}")])
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl GenerationBackend for FailingBackend {
        async fn generate(&self, _prompt: &str) -> Result<Vec<String>, ProviderError> {
            Err(ProviderError::Transport("connection refused".to_string()))
        }
    }

    fn orchestrator_with(backend: Box<dyn GenerationBackend>) -> GenerationOrchestrator {
        GenerationOrchestrator::new(
            GenerationProvider::with_live_backend(backend, Duration::ZERO),
            Timing::default(),
        )
    }

    /// Default cadence runs 20 progress ticks of 400 ms; everything is
    /// settled well before this horizon.
    const HORIZON: Duration = Duration::from_secs(12);

    #[tokio::test(start_paused = true)]
    async fn test_session_completes_with_provider_result() {
        let orchestrator = orchestrator_with(Box::new(EchoBackend));
        let id = orchestrator.start("REQ-001", "Login feature");

        tokio::time::sleep(HORIZON).await;

        let snapshot = orchestrator.current_session();
        assert_eq!(snapshot.session_id, id);
        assert_eq!(snapshot.status, SessionStatus::Completed);
        assert_eq!(snapshot.progress_percent, 100);
        assert_eq!(snapshot.result_test_cases, vec!["1. Verify Login feature"]);
        assert_eq!(snapshot.error_kind, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_is_monotone_and_bounded() {
        let orchestrator = orchestrator_with(Box::new(EchoBackend));
        orchestrator.start("REQ-001", "Login feature");

        let mut last = 0u8;
        for _ in 0..40 {
            tokio::time::sleep(Duration::from_millis(300)).await;
            let snapshot = orchestrator.current_session();
            assert!(snapshot.progress_percent >= last);
            assert!(snapshot.progress_percent <= 100);
            assert!(snapshot.log_lines.len() <= LOG_SCRIPT.len());
            last = snapshot.progress_percent;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_log_lines_follow_script_order() {
        let orchestrator = orchestrator_with(Box::new(EchoBackend));
        orchestrator.start("REQ-001", "Login feature");

        tokio::time::sleep(HORIZON).await;

        let snapshot = orchestrator.current_session();
        // 10 lines at 700 ms are all emitted before the 8 s completion
        let expected: Vec<String> = LOG_SCRIPT.iter().map(ToString::to_string).collect();
        assert_eq!(snapshot.log_lines, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_waits_for_provider_resolution() {
        let gate = Arc::new(Notify::new());
        let orchestrator = orchestrator_with(Box::new(GatedBackend {
            gate: Arc::clone(&gate),
        }));
        orchestrator.start("REQ-001", "Login feature");

        // Ticker reaches 100 long before this, but the provider is gated
        tokio::time::sleep(HORIZON).await;
        let snapshot = orchestrator.current_session();
        assert_eq!(snapshot.progress_percent, 100);
        assert_eq!(snapshot.status, SessionStatus::Running);
        assert!(snapshot.result_test_cases.is_empty(), "results unreadable before resolution");

        gate.notify_waiters();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let snapshot = orchestrator.current_session();
        assert_eq!(snapshot.status, SessionStatus::Completed);
        assert_eq!(snapshot.result_test_cases, vec!["1. Verify Login feature"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_degraded_outcome_marks_failed_but_carries_results() {
        let orchestrator = orchestrator_with(Box::new(FailingBackend));
        orchestrator.start("REQ-001", "Login feature");

        tokio::time::sleep(HORIZON).await;

        let snapshot = orchestrator.current_session();
        assert_eq!(snapshot.status, SessionStatus::Failed);
        assert_eq!(snapshot.result_test_cases, canned_lines());
        assert_eq!(snapshot.error_kind, Some(ErrorKind::ProviderTransportError));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_supersedes_previous_session() {
        let gate = Arc::new(Notify::new());
        let orchestrator = orchestrator_with(Box::new(GatedBackend {
            gate: Arc::clone(&gate),
        }));

        let first = orchestrator.start("REQ-001", "first feature");
        tokio::time::sleep(Duration::from_millis(50)).await;
        let second = orchestrator.start("REQ-002", "second feature");
        assert_ne!(first, second);

        tokio::time::sleep(HORIZON).await;
        gate.notify_waiters();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let snapshot = orchestrator.current_session();
        assert_eq!(snapshot.session_id, second);
        assert_eq!(snapshot.status, SessionStatus::Completed);
        // Result derives only from the second session's provider call
        assert_eq!(snapshot.result_test_cases, vec!["1. Verify second feature"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_freezes_snapshot() {
        let orchestrator = GenerationOrchestrator::new(
            GenerationProvider::demo(Duration::from_secs(2)),
            Timing::default(),
        );
        orchestrator.start("REQ-001", "Login feature");

        tokio::time::sleep(Duration::from_secs(1)).await;
        orchestrator.cancel();
        let frozen = orchestrator.current_session();
        assert_eq!(frozen.status, SessionStatus::Idle);
        assert!(frozen.progress_percent > 0, "some ticks happened before cancel");

        // No mutation after cancel: repeated reads are identical
        tokio::time::sleep(HORIZON).await;
        assert_eq!(orchestrator.current_session(), frozen);
        assert_eq!(orchestrator.current_session(), frozen);

        // Idempotent
        orchestrator.cancel();
        assert_eq!(orchestrator.current_session(), frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_when_idle_is_a_no_op() {
        let orchestrator = orchestrator_with(Box::new(EchoBackend));
        orchestrator.cancel();
        assert_eq!(orchestrator.current_session().status, SessionStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_session_persists_test_cases() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let orchestrator = GenerationOrchestrator::new(
            GenerationProvider::demo(Duration::from_secs(2)),
            Timing::default(),
        )
        .with_store(Arc::clone(&store));

        orchestrator.start("REQ-001", "Login feature");
        tokio::time::sleep(HORIZON).await;

        let snapshot = orchestrator.current_session();
        assert_eq!(snapshot.status, SessionStatus::Completed);
        assert_eq!(snapshot.error_kind, Some(ErrorKind::ProviderUnavailable));

        let cases = load_test_cases(store.as_ref()).unwrap();
        assert_eq!(cases.len(), 4);
        assert!(cases.iter().all(|tc| tc.requirement_id == "REQ-001"));
        assert_eq!(cases[0].id, "TC-001");
        assert_eq!(cases[0].title, "Verify valid login redirects to dashboard");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_session_tasks() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let orchestrator = GenerationOrchestrator::new(
            GenerationProvider::demo(Duration::from_secs(2)),
            Timing::default(),
        )
        .with_store(Arc::clone(&store));

        orchestrator.start("REQ-001", "Login feature");
        tokio::time::sleep(Duration::from_secs(1)).await;
        drop(orchestrator);

        // Aborted tickers never fire again and the abandoned provider call
        // never resolves into the store
        tokio::time::sleep(HORIZON).await;
        let cases = load_test_cases(store.as_ref()).unwrap();
        assert!(cases.is_empty(), "dropped session must not persist results");
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_provider_result_never_persisted() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let gate = Arc::new(Notify::new());
        let orchestrator = GenerationOrchestrator::new(
            GenerationProvider::with_live_backend(
                Box::new(GatedBackend {
                    gate: Arc::clone(&gate),
                }),
                Duration::ZERO,
            ),
            Timing::default(),
        )
        .with_store(Arc::clone(&store));

        orchestrator.start("REQ-001", "first feature");
        tokio::time::sleep(Duration::from_millis(50)).await;
        orchestrator.start("REQ-002", "second feature");

        tokio::time::sleep(HORIZON).await;
        gate.notify_waiters();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let cases = load_test_cases(store.as_ref()).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].requirement_id, "REQ-002");
    }
}
