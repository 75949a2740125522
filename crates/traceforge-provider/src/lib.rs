//! Generation provider abstraction with a fixed fallback chain
//!
//! Strategies are tried in fixed precedence order, first success wins:
//!
//! 1. **Live**: only when a credential resolved at construction. Any
//!    transport error, malformed response, or empty output falls through.
//! 2. **Demo**: when no credential is configured. Simulated latency, then
//!    a deterministic canned script. Always succeeds.
//! 3. **Error-fallback**: only after a failed live attempt. Same canned
//!    script, synchronously.
//!
//! The caller-facing guarantee is that [`GenerationProvider::generate`]
//! always resolves to a non-empty line set. What went wrong along the way
//! is retained as an [`ErrorKind`] classification, never raised.

mod demo_backend;
mod http_backend;
mod types;

pub use demo_backend::{CANNED_LINES, DemoBackend, canned_lines};
pub use http_backend::HttpBackend;
pub use types::{ErrorKind, GenerationBackend, GenerationOutcome, Provenance};

use std::time::Duration;

use tracing::{debug, warn};

use traceforge_config::Config;
use traceforge_utils::error::ProviderError;

/// The fallback chain over the live and demo strategies.
pub struct GenerationProvider {
    live: Option<Box<dyn GenerationBackend>>,
    demo_delay: Duration,
}

impl GenerationProvider {
    /// Build the chain from configuration, resolving the live credential
    /// exactly once. With a credential present the live strategy is armed;
    /// without one the chain runs in demo mode.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Misconfiguration` if a credential is present
    /// but the live backend cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let live: Option<Box<dyn GenerationBackend>> = match config.resolve_credential() {
            Some(api_key) => {
                debug!("Live generation backend armed");
                Some(Box::new(HttpBackend::new_from_config(config, api_key)?))
            }
            None => {
                debug!("No credential configured; running in demo mode");
                None
            }
        };

        Ok(Self {
            live,
            demo_delay: Duration::from_millis(config.provider.demo_delay_ms),
        })
    }

    /// Build a chain with no live backend (demo mode).
    #[must_use]
    pub fn demo(demo_delay: Duration) -> Self {
        Self {
            live: None,
            demo_delay,
        }
    }

    /// Build a chain around an explicit live backend. Test seam and
    /// extension point for non-HTTP backends.
    #[must_use]
    pub fn with_live_backend(
        backend: Box<dyn GenerationBackend>,
        demo_delay: Duration,
    ) -> Self {
        Self {
            live: Some(backend),
            demo_delay,
        }
    }

    /// Name of the active strategy, for logging.
    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        if self.live.is_some() { "live" } else { "demo" }
    }

    /// Run the chain. Never fails: worst case is the canned artifact set
    /// with a degraded provenance tag.
    pub async fn generate(&self, prompt: &str) -> GenerationOutcome {
        match &self.live {
            Some(live) => match live.generate(prompt).await {
                Ok(lines) if !lines.is_empty() => GenerationOutcome {
                    lines,
                    provenance: Provenance::Live,
                    error_kind: None,
                },
                Ok(_) => {
                    warn!("Live backend returned no lines; substituting canned artifact set");
                    GenerationOutcome {
                        lines: canned_lines(),
                        provenance: Provenance::Fallback,
                        error_kind: Some(ErrorKind::EmptyResult),
                    }
                }
                Err(err) => {
                    warn!(error = %err, "Live backend failed; substituting canned artifact set");
                    GenerationOutcome {
                        lines: canned_lines(),
                        provenance: Provenance::Fallback,
                        error_kind: Some(classify(&err)),
                    }
                }
            },
            None => {
                let demo = DemoBackend::new(self.demo_delay);
                // Demo cannot fail; the error arm is unreachable but kept
                // total so a future backend swap stays safe.
                let lines = demo.generate(prompt).await.unwrap_or_else(|_| canned_lines());
                GenerationOutcome {
                    lines,
                    provenance: Provenance::Demo,
                    error_kind: Some(ErrorKind::ProviderUnavailable),
                }
            }
        }
    }
}

/// Map a backend error to its session-visible classification.
fn classify(err: &ProviderError) -> ErrorKind {
    match err {
        ProviderError::Empty => ErrorKind::EmptyResult,
        ProviderError::Transport(_)
        | ProviderError::MalformedResponse(_)
        | ProviderError::Misconfiguration(_) => ErrorKind::ProviderTransportError,
    }
}
