//! Outcome evaluation
//!
//! Pure comparison of what a scenario expects against what was observed.

use serde::Serialize;

use crate::probe::Observation;
use crate::scenario::{Expectation, Scenario};

/// Pass/fail judgement for one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub scenario: String,
    pub passed: bool,
    pub message: String,
}

/// Compare a scenario's expectation with its observation
///
/// Status expectations match exactly; a missing status never equals any
/// code, including 0.
pub fn evaluate(scenario: &Scenario, observation: &Observation) -> Verdict {
    let (passed, message) = match scenario.expect {
        Expectation::Status(expected) => {
            let passed = observation.status == Some(expected);
            let actual = match observation.status {
                Some(code) => code.to_string(),
                None => no_response(observation),
            };
            (passed, format!("Expected status {}, got {}", expected, actual))
        }
        Expectation::Success(expected) => {
            let passed = observation.success == expected;
            let actual = if observation.success {
                "successful fetch".to_string()
            } else if observation.status.is_none() {
                format!("failed fetch, {}", no_response(observation))
            } else {
                match &observation.error {
                    Some(reason) => format!("failed fetch ({})", reason),
                    None => "failed fetch".to_string(),
                }
            };
            (
                passed,
                format!("Expected {}, got {}", scenario.expect, actual),
            )
        }
    };

    Verdict {
        scenario: scenario.name.clone(),
        passed,
        message,
    }
}

fn no_response(observation: &Observation) -> String {
    match &observation.error {
        Some(reason) => format!("no response ({})", reason),
        None => "no response".to_string(),
    }
}
