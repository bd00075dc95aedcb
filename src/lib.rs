//! thumbprobe - black-box conformance checker for image resizing endpoints
//!
//! A table of named scenarios is sent, one GET at a time, to a
//! TimThumb-style endpoint. Each response is judged against the expected
//! status and the verdicts are rendered to console, log, HTML or JSON.

pub mod cli;
pub mod commands;
pub mod common;
pub mod evaluate;
pub mod harness;
pub mod probe;
pub mod report;
pub mod scenario;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use evaluate::{evaluate, Verdict};
pub use harness::{Harness, RunPhase};
pub use probe::{Observation, Probe};
pub use report::{Reporter, RunSummary};
pub use scenario::{Expectation, Scenario, ScenarioTable, Suite};
