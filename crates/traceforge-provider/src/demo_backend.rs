//! Demo backend
//!
//! Active when no live credential is configured. Simulates realistic
//! latency, then returns a deterministic canned sequence of plausible
//! test-case lines. Always succeeds.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use traceforge_utils::error::ProviderError;

use crate::types::GenerationBackend;

/// The canned test-case script shared by the demo and error-fallback
/// strategies.
pub const CANNED_LINES: [&str; 4] = [
    "1. Verify valid login redirects to dashboard",
    "2. Verify invalid password shows error",
    "3. Verify account lock after 5 attempts",
    "4. Verify password field is masked",
];

/// Canned lines as owned strings.
#[must_use]
pub fn canned_lines() -> Vec<String> {
    CANNED_LINES.iter().map(ToString::to_string).collect()
}

/// Demo generation backend with simulated latency.
pub struct DemoBackend {
    delay: Duration,
}

impl DemoBackend {
    /// Create a demo backend that waits `delay` before answering.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl GenerationBackend for DemoBackend {
    async fn generate(&self, _prompt: &str) -> Result<Vec<String>, ProviderError> {
        debug!(delay_ms = self.delay.as_millis() as u64, "Running demo generation");
        tokio::time::sleep(self.delay).await;
        Ok(canned_lines())
    }
}
