//! Error types for thumbprobe
//!
//! Only harness configuration problems are errors. Anything that goes wrong
//! while probing a single scenario is recorded as an observation instead.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for thumbprobe
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Invalid target URL '{url}': {reason}")]
    InvalidTarget { url: String, reason: String },

    #[error("Target endpoint unreachable at {url}: {reason}. Check the base URL or drop --preflight")]
    TargetUnreachable { url: String, reason: String },

    // === Suite Errors ===
    #[error("Failed to parse scenario suite '{path}': {error}")]
    SuiteParse { path: String, error: String },

    #[error("Duplicate scenario name '{0}'. Scenario names must be unique within a run")]
    DuplicateScenario(String),

    #[error("Scenario table is empty. Nothing to run")]
    EmptySuite,

    // === Report Sink Errors ===
    #[error("Cannot open report sink '{path}': {error}")]
    SinkOpen { path: String, error: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid target error
    pub fn invalid_target(url: &str, reason: impl ToString) -> Self {
        Self::InvalidTarget {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a sink open error
    pub fn sink_open(path: &std::path::Path, error: impl ToString) -> Self {
        Self::SinkOpen {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Process exit code for a fatal harness error
    ///
    /// Scenario failures exit with 1, so configuration problems get 2 to
    /// keep the two apart in pipelines.
    pub fn exit_code(&self) -> i32 {
        2
    }
}
