//! Core types for the generation backend abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use traceforge_utils::error::ProviderError;

/// Classified outcome of a generation attempt.
///
/// All three kinds are absorbed by the fallback chain; they exist for
/// observability on the session record, never to abort the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No live credential configured; expected state, not a failure
    ProviderUnavailable,
    /// Network or parse failure on the live path
    ProviderTransportError,
    /// Live backend resolved but returned no usable lines
    EmptyResult,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ProviderUnavailable => write!(f, "provider_unavailable"),
            ErrorKind::ProviderTransportError => write!(f, "provider_transport_error"),
            ErrorKind::EmptyResult => write!(f, "empty_result"),
        }
    }
}

/// Which strategy of the chain produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// The live backend succeeded
    Live,
    /// No credential was configured; the demo backend answered
    Demo,
    /// The live backend was attempted and failed; canned lines substituted
    Fallback,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Live => write!(f, "live"),
            Provenance::Demo => write!(f, "demo"),
            Provenance::Fallback => write!(f, "fallback"),
        }
    }
}

/// Result of running the fallback chain: always a non-empty line set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    /// Generated test-case lines, never empty
    pub lines: Vec<String>,
    /// Strategy that produced the lines
    pub provenance: Provenance,
    /// Classification of whatever went wrong along the way, if anything
    pub error_kind: Option<ErrorKind>,
}

impl GenerationOutcome {
    /// Whether the chain had to substitute the canned artifact set after a
    /// failed live attempt. Sessions map this to their `Failed` bookkeeping
    /// state.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.provenance == Provenance::Fallback
    }
}

/// Trait for generation backend implementations.
///
/// The chain works against this trait so tests can inject failing, empty,
/// or hanging backends into the live slot.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Produce test-case lines from a requirement prompt.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` for transport failures, malformed responses,
    /// or an empty result. The chain, not the caller, decides what happens
    /// next.
    async fn generate(&self, prompt: &str) -> Result<Vec<String>, ProviderError>;
}
