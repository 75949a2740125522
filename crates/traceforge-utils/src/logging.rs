//! Logging and observability infrastructure for traceforge
//!
//! Structured logging setup with tracing support. The library itself never
//! installs a subscriber; embedding applications call [`init_tracing`] once
//! at startup if they want traceforge's internal spans and events.

use tracing::{Level, info, span};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Initialize tracing subscriber for structured logging.
///
/// Sets up tracing with either compact (default) or verbose format.
/// Verbose format includes target names and span close events so session
/// lifecycles can be timed from the log stream.
///
/// # Arguments
/// * `verbose` - If true, use verbose format with structured fields
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("traceforge=debug,info")
            } else {
                EnvFilter::try_new("traceforge=info,warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_line_number(false)
                    .with_file(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_line_number(false)
                    .with_file(false)
                    .compact(),
            )
            .try_init()?;
    }

    Ok(())
}

/// Create a span for a generation session with structured fields.
#[must_use]
pub fn session_span(session_id: u64, requirement_id: &str) -> tracing::Span {
    span!(
        Level::INFO,
        "generation_session",
        session_id = %session_id,
        requirement_id = %requirement_id,
    )
}

/// Log session start with structured fields.
pub fn log_session_start(session_id: u64, requirement_id: &str, provider: &str) {
    info!(
        session_id = %session_id,
        requirement_id = %requirement_id,
        provider = %provider,
        "Starting generation session"
    );
}

/// Log session completion with its provenance classification.
pub fn log_session_complete(session_id: u64, status: &str, line_count: usize) {
    info!(
        session_id = %session_id,
        status = %status,
        line_count = %line_count,
        "Generation session finished"
    );
}
