//! Configuration management for traceforge
//!
//! Typed configuration with file-over-defaults precedence. Supports TOML
//! configuration files with `[provider]` and `[engine]` sections. The
//! credential for the live generation backend is discovered from the
//! environment exactly once, at construction time of whatever consumes it,
//! and never re-read mid-session.

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};
use traceforge_utils::error::ConfigError;

/// Default environment variable holding the live backend credential
pub const DEFAULT_API_KEY_ENV: &str = "TRACEFORGE_API_KEY";

/// Default simulated latency for the demo backend, in milliseconds
pub const DEFAULT_DEMO_DELAY_MS: u64 = 2000;

/// Default live backend request timeout, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Provider section of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    /// Environment variable consulted for the live backend credential
    pub api_key_env: String,
    /// Override for the live backend endpoint (defaults to the backend's
    /// built-in endpoint when absent)
    pub base_url: Option<String>,
    /// Model requested from the live backend
    pub model: Option<String>,
    /// Live backend request timeout in seconds
    pub request_timeout_secs: u64,
    /// Simulated latency of the demo backend in milliseconds
    pub demo_delay_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            base_url: None,
            model: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            demo_delay_ms: DEFAULT_DEMO_DELAY_MS,
        }
    }
}

/// Engine section of the configuration file: ticker cadences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Progress ticker period in milliseconds
    pub progress_tick_ms: u64,
    /// Progress increment per tick, clamped to 100
    pub progress_step: u8,
    /// Log ticker period in milliseconds
    pub log_tick_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            progress_tick_ms: 400,
            progress_step: 5,
            log_tick_ms: 700,
        }
    }
}

/// Complete traceforge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub provider: ProviderConfig,
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from an optional TOML file, merged over defaults.
    ///
    /// `None` yields the built-in defaults. Unknown keys in the file are
    /// rejected rather than silently ignored.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
                toml::from_str(&text).map_err(|e| ConfigError::Parse {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate cadence values; zero periods or a zero step would stall a
    /// session forever.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.progress_step == 0 {
            return Err(ConfigError::InvalidValue {
                key: "engine.progress_step".to_string(),
                reason: "must be non-zero".to_string(),
            });
        }
        if self.engine.progress_tick_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "engine.progress_tick_ms".to_string(),
                reason: "must be non-zero".to_string(),
            });
        }
        if self.engine.log_tick_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "engine.log_tick_ms".to_string(),
                reason: "must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    /// Resolve the live backend credential from the configured environment
    /// variable. Absence is an expected state (demo mode), not an error.
    #[must_use]
    pub fn resolve_credential(&self) -> Option<String> {
        env::var(&self.provider.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
