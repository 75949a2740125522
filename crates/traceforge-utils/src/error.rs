use thiserror::Error;

/// Library-level error type aggregating every failure domain.
///
/// `TraceForgeError` is the primary error type returned by traceforge library
/// operations that can fail for more than one reason. Leaf crates return
/// their own domain error (`ProviderError`, `StoreError`, `ConfigError`);
/// callers that need a single type convert via `#[from]`.
///
/// Note that provider failures never reach callers of the generation
/// pipeline itself: the fallback chain absorbs them and records a
/// classification on the session instead. `ProviderError` only escapes from
/// direct backend invocations.
#[derive(Error, Debug)]
pub enum TraceForgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from a single generation backend invocation.
///
/// These are internal to the provider layer: the fallback chain catches all
/// of them and degrades to the canned artifact set, surfacing only an
/// `ErrorKind` classification on the session.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport-level failure (connectivity, non-success status)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response arrived but did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Backend resolved but produced no usable lines
    #[error("Empty result from backend")]
    Empty,

    /// Backend could not be constructed from the given configuration
    #[error("Misconfiguration: {0}")]
    Misconfiguration(String),
}

/// Errors from the key-value store contract.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A stored record could not be decoded into its typed form
    #[error("Corrupt record in {collection} at key '{key}': {reason}")]
    Corrupt {
        collection: String,
        key: String,
        reason: String,
    },

    /// A typed record could not be encoded for storage
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration file or value errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {reason}")]
    FileRead { path: String, reason: String },

    #[error("Failed to parse config file '{path}': {reason}")]
    Parse { path: String, reason: String },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "Transport error: connection refused");

        let err = ProviderError::Empty;
        assert_eq!(err.to_string(), "Empty result from backend");
    }

    #[test]
    fn test_store_error_display_includes_location() {
        let err = StoreError::Corrupt {
            collection: "test_cases".to_string(),
            key: "TC-1".to_string(),
            reason: "missing field `title`".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("test_cases"));
        assert!(msg.contains("TC-1"));
    }

    #[test]
    fn test_top_level_conversion() {
        let err: TraceForgeError = ProviderError::Empty.into();
        assert!(matches!(err, TraceForgeError::Provider(_)));

        let err: TraceForgeError = ConfigError::InvalidValue {
            key: "engine.progress_step".to_string(),
            reason: "must be non-zero".to_string(),
        }
        .into();
        assert!(matches!(err, TraceForgeError::Config(_)));
    }
}
