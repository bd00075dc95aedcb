//! YAML scenario suites
//!
//! A suite file lists scenarios declaratively:
//!
//! ```yaml
//! name: Resizer hardening
//! base_url: http://localhost/timthumb.php
//! scenarios:
//!   - name: Directory Traversal
//!     params: { src: ../../../etc/passwd, w: 100, h: 100 }
//!     expect: { status: 400 }
//!   - name: WebShot
//!     params: { src: http://example.com, webshot: 1 }
//!     expect: { status: 200 }
//!     requires: { feature: webshot }
//! ```

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

use crate::common::{Error, Result};

use super::config::{Expectation, FeatureGate, Scenario, ScenarioTable};

/// A named scenario table, optionally bound to an endpoint
#[derive(Debug, Clone)]
pub struct Suite {
    pub name: String,
    pub description: Option<String>,
    pub base_url: Option<String>,
    pub table: ScenarioTable,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct SuiteFile {
    name: String,
    description: Option<String>,
    base_url: Option<String>,
    #[serde(default)]
    scenarios: Vec<ScenarioEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct ScenarioEntry {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    params: IndexMap<String, serde_yaml::Value>,
    expect: ExpectEntry,
    requires: Option<FeatureGate>,
}

/// Exactly one of the fields must be set
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct ExpectEntry {
    status: Option<u16>,
    success: Option<bool>,
}

/// Load a suite from a YAML file
pub fn load_suite(path: &Path) -> Result<Suite> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.display().to_string(),
        error: e.to_string(),
    })?;
    parse_suite(&content, &path.display().to_string())
}

/// Parse a suite from YAML text; `origin` names the source in errors
pub fn parse_suite(content: &str, origin: &str) -> Result<Suite> {
    let file: SuiteFile = serde_yaml::from_str(content).map_err(|e| Error::SuiteParse {
        path: origin.to_string(),
        error: e.to_string(),
    })?;

    let scenarios = file
        .scenarios
        .into_iter()
        .map(|entry| entry.into_scenario(origin))
        .collect::<Result<Vec<_>>>()?;

    if scenarios.is_empty() {
        return Err(Error::EmptySuite);
    }

    Ok(Suite {
        name: file.name,
        description: file.description,
        base_url: file.base_url,
        table: ScenarioTable::new(scenarios)?,
    })
}

impl ScenarioEntry {
    fn into_scenario(self, origin: &str) -> Result<Scenario> {
        let expect = match (self.expect.status, self.expect.success) {
            (Some(code), None) => Expectation::Status(code),
            (None, Some(success)) => Expectation::Success(success),
            _ => {
                return Err(Error::SuiteParse {
                    path: origin.to_string(),
                    error: format!(
                        "scenario '{}' must set exactly one of expect.status or expect.success",
                        self.name
                    ),
                })
            }
        };

        let mut scenario = Scenario::new(self.name, self.description, expect);
        for (key, value) in self.params {
            let value = param_value(&value).ok_or_else(|| Error::SuiteParse {
                path: origin.to_string(),
                error: format!(
                    "scenario '{}': parameter '{}' must be a string, number or bool",
                    scenario.name, key
                ),
            })?;
            scenario = scenario.param(key, value);
        }
        if let Some(gate) = self.requires {
            scenario = scenario.requires(gate);
        }
        Ok(scenario)
    }
}

fn param_value(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
