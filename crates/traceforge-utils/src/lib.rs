//! Foundation utilities for traceforge
//!
//! This crate holds the pieces every other traceforge crate leans on:
//! the error taxonomy and tracing initialization. It has no knowledge of
//! the domain model or the orchestration logic.

pub mod error;
pub mod logging;

pub use error::{ConfigError, ProviderError, StoreError, TraceForgeError};
