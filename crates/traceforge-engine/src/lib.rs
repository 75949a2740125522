//! Generation session orchestration for traceforge
//!
//! The orchestrator drives an asynchronous, cancellable, multi-stage
//! generation session: a progress ticker and a staged log ticker on
//! independent clocks, plus exactly one provider call per session, with a
//! gated terminal transition and single-flight supersession semantics.

mod orchestrator;
mod persist;
mod session;

pub use orchestrator::{GenerationOrchestrator, Timing};
pub use persist::test_cases_from_lines;
pub use session::{LOG_SCRIPT, SessionId, SessionSnapshot, SessionStatus};
