//! Engine error types
//!
//! All fallible engine APIs return [`Result`]. Contract violations on the
//! book pools (double checkin, checkin by a non-holder) are deliberately NOT
//! represented here: those are programming errors and panic at the violation
//! site instead of surfacing as recoverable errors.

use thiserror::Error;

/// Errors produced by the simulation engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration could not be loaded from file/environment
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration loaded but failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Trace file could not be created or written
    #[error("trace I/O error: {0}")]
    TraceIo(#[from] std::io::Error),

    /// Event could not be recorded
    #[error("recording failed: {0}")]
    RecordingFailed(String),

    /// Observability initialization failed
    #[error("observability init failed: {0}")]
    ObservabilityInit(String),
}

/// Convenience result alias used across the engine
pub type Result<T> = std::result::Result<T, EngineError>;
