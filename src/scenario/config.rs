//! Scenario definitions
//!
//! A scenario is one named GET against the target endpoint plus the
//! outcome the endpoint is expected to produce.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::common::{Error, Result};

/// Outcome a scenario expects from the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// The response status must equal this code exactly
    Status(u16),
    /// The transfer must succeed (or fail) as a whole
    Success(bool),
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Status(code) => write!(f, "status {}", code),
            Expectation::Success(true) => write!(f, "successful fetch"),
            Expectation::Success(false) => write!(f, "failed fetch"),
        }
    }
}

/// A target capability a scenario depends on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureGate {
    /// Feature name, e.g. "webshot" or "allow_external"
    pub feature: String,
    /// Whether the feature must be enabled (true) or disabled (false)
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl FeatureGate {
    pub fn new(feature: &str, enabled: bool) -> Self {
        Self {
            feature: feature.to_string(),
            enabled,
        }
    }

    /// Check the gate against the set of features enabled on the target
    pub fn is_satisfied(&self, features: &[String]) -> bool {
        let present = features.iter().any(|f| f.eq_ignore_ascii_case(&self.feature));
        present == self.enabled
    }
}

/// One named, parameterized test case against the target endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Unique name within a run
    pub name: String,
    /// What the scenario checks
    pub description: String,
    /// Query parameters in the order they are sent
    pub params: Vec<(String, String)>,
    /// Expected outcome
    pub expect: Expectation,
    /// Optional feature the target must (or must not) have
    pub requires: Option<FeatureGate>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, description: impl Into<String>, expect: Expectation) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
            expect,
            requires: None,
        }
    }

    /// Append a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Gate the scenario on a target feature
    pub fn requires(mut self, gate: FeatureGate) -> Self {
        self.requires = Some(gate);
        self
    }
}

/// Ordered collection of scenarios with unique names
#[derive(Debug, Clone, Default)]
pub struct ScenarioTable {
    scenarios: Vec<Scenario>,
}

impl ScenarioTable {
    /// Build a table, rejecting duplicate names
    pub fn new(scenarios: Vec<Scenario>) -> Result<Self> {
        let mut seen = HashSet::new();
        for scenario in &scenarios {
            if !seen.insert(scenario.name.as_str()) {
                return Err(Error::DuplicateScenario(scenario.name.clone()));
            }
        }
        Ok(Self { scenarios })
    }

    /// Drop scenarios whose feature gate does not match the target
    ///
    /// Fails if nothing is left to run. Feature names no scenario is gated
    /// on are logged as warnings, since they change nothing.
    pub fn resolve(self, features: &[String]) -> Result<Self> {
        for feature in self.unknown_features(features) {
            tracing::warn!(feature, known = ?self.gate_features(), "Feature is not used by any scenario");
        }

        let scenarios: Vec<Scenario> = self
            .scenarios
            .into_iter()
            .filter(|s| s.requires.as_ref().map_or(true, |g| g.is_satisfied(features)))
            .collect();
        if scenarios.is_empty() {
            return Err(Error::EmptySuite);
        }
        Ok(Self { scenarios })
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scenario> {
        self.scenarios.iter()
    }

    /// Distinct feature names the table's scenarios are gated on, lowercased
    pub fn gate_features(&self) -> BTreeSet<String> {
        self.scenarios
            .iter()
            .filter_map(|s| s.requires.as_ref())
            .map(|g| g.feature.to_ascii_lowercase())
            .collect()
    }

    /// Requested features that no scenario in the table is gated on
    pub fn unknown_features<'f>(&self, features: &'f [String]) -> Vec<&'f str> {
        let known = self.gate_features();
        features
            .iter()
            .filter(|f| !known.contains(&f.to_ascii_lowercase()))
            .map(String::as_str)
            .collect()
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }
}

impl<'a> IntoIterator for &'a ScenarioTable {
    type Item = &'a Scenario;
    type IntoIter = std::slice::Iter<'a, Scenario>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(name: &str) -> Scenario {
        Scenario::new(name, "", Expectation::Status(200)).param("src", "a.jpg")
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = ScenarioTable::new(vec![scenario("a"), scenario("b"), scenario("a")]).unwrap_err();
        assert!(matches!(err, Error::DuplicateScenario(name) if name == "a"));
    }

    #[test]
    fn test_resolve_keeps_order_and_filters_gates() {
        let table = ScenarioTable::new(vec![
            scenario("first"),
            scenario("needs-webshot").requires(FeatureGate::new("webshot", true)),
            scenario("needs-no-webshot").requires(FeatureGate::new("webshot", false)),
            scenario("last"),
        ])
        .unwrap();

        let names: Vec<_> = table
            .clone()
            .resolve(&[])
            .unwrap()
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(names, ["first", "needs-no-webshot", "last"]);

        let names: Vec<_> = table
            .resolve(&["WebShot".to_string()])
            .unwrap()
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(names, ["first", "needs-webshot", "last"]);
    }

    #[test]
    fn test_resolve_empty_table_is_error() {
        let table = ScenarioTable::new(vec![
            scenario("only").requires(FeatureGate::new("webshot", true))
        ])
        .unwrap();
        assert!(matches!(table.resolve(&[]), Err(Error::EmptySuite)));
    }

    #[test]
    fn test_unknown_features_are_reported() {
        let table = ScenarioTable::new(vec![
            scenario("shot").requires(FeatureGate::new("webshot", true)),
            scenario("remote").requires(FeatureGate::new("allow_external", false)),
            scenario("plain"),
        ])
        .unwrap();

        let features = ["WebShot".to_string(), "webshoot".to_string()];
        assert_eq!(table.unknown_features(&features), ["webshoot"]);
        assert!(table.unknown_features(&[]).is_empty());

        let names: Vec<_> = table
            .resolve(&features)
            .unwrap()
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(names, ["shot", "remote", "plain"]);
    }

    #[test]
    fn test_expectation_display() {
        assert_eq!(Expectation::Status(400).to_string(), "status 400");
        assert_eq!(Expectation::Success(true).to_string(), "successful fetch");
        assert_eq!(Expectation::Success(false).to_string(), "failed fetch");
    }
}
