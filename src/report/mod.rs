//! Reporting
//!
//! Verdicts flow to one or more [`Reporter`] sinks in scenario order. The
//! [`RunSummary`] is a plain value folded from the verdicts; sinks only
//! render it.

mod console;
mod html;
mod json;
mod log;

pub use console::ConsoleReporter;
pub use html::HtmlReporter;
pub use json::JsonReporter;
pub use log::LogReporter;

use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::common::Result;
use crate::evaluate::Verdict;
use crate::probe::Observation;
use crate::scenario::Scenario;

/// Running pass/fail counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl Tally {
    pub fn record(self, passed: bool) -> Self {
        Self {
            total: self.total + 1,
            passed: self.passed + usize::from(passed),
            failed: self.failed + usize::from(!passed),
        }
    }
}

/// Final result of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub suite: String,
    pub target: String,
    #[serde(flatten)]
    pub tally: Tally,
    /// Names of failing scenarios, in table order
    pub failures: Vec<String>,
    /// Every verdict, in table order
    pub verdicts: Vec<Verdict>,
}

impl RunSummary {
    pub fn new(suite: &str, target: &Url) -> Self {
        Self {
            suite: suite.to_string(),
            target: target.to_string(),
            tally: Tally::default(),
            failures: Vec::new(),
            verdicts: Vec::new(),
        }
    }

    /// Fold one more verdict into the summary
    pub fn record(mut self, verdict: Verdict) -> Self {
        self.tally = self.tally.record(verdict.passed);
        if !verdict.passed {
            self.failures.push(verdict.scenario.clone());
        }
        self.verdicts.push(verdict);
        self
    }

    pub fn all_passed(&self) -> bool {
        self.tally.failed == 0
    }

    /// Process exit code: 0 when every scenario passed, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }
}

/// Context announced once before the first scenario runs
#[derive(Debug, Clone, Copy)]
pub struct RunInfo<'a> {
    pub suite: &'a str,
    pub description: Option<&'a str>,
    pub target: &'a Url,
    pub total: usize,
}

/// One evaluated scenario, as handed to reporters
#[derive(Debug, Clone, Copy)]
pub struct VerdictEvent<'a> {
    /// Zero-based position in the scenario table
    pub index: usize,
    pub scenario: &'a Scenario,
    pub observation: &'a Observation,
    pub verdict: &'a Verdict,
    /// Counts including this verdict
    pub tally: Tally,
}

/// A report sink
///
/// Sinks must render verdicts in the order they arrive.
pub trait Reporter: Send {
    fn start(&mut self, run: &RunInfo<'_>) -> Result<()>;
    fn verdict(&mut self, event: &VerdictEvent<'_>) -> Result<()>;
    fn summary(&mut self, summary: &RunSummary) -> Result<()>;
}

/// Fans every event out to a list of sinks
#[derive(Default)]
pub struct Reporters {
    sinks: Vec<Box<dyn Reporter>>,
}

impl Reporters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: impl Reporter + 'static) {
        self.sinks.push(Box::new(sink));
    }
}

impl Reporter for Reporters {
    fn start(&mut self, run: &RunInfo<'_>) -> Result<()> {
        self.sinks.iter_mut().try_for_each(|sink| sink.start(run))
    }

    fn verdict(&mut self, event: &VerdictEvent<'_>) -> Result<()> {
        self.sinks.iter_mut().try_for_each(|sink| sink.verdict(event))
    }

    fn summary(&mut self, summary: &RunSummary) -> Result<()> {
        self.sinks.iter_mut().try_for_each(|sink| sink.summary(summary))
    }
}

/// Milliseconds with two decimals, e.g. `12.34 ms`
pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2} ms", elapsed.as_secs_f64() * 1000.0)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::scenario::Expectation;

    /// A scenario, observation and verdict triple for sink tests
    pub struct Sample {
        pub scenario: Scenario,
        pub observation: Observation,
        pub verdict: Verdict,
    }

    impl Sample {
        pub fn new(name: &str, expected: u16, actual: Option<u16>) -> Self {
            let scenario = Scenario::new(name, format!("{} description", name), Expectation::Status(expected))
                .param("src", "../../../etc/passwd");
            let observation = Observation {
                scenario: name.to_string(),
                url: Url::parse("http://localhost/timthumb.php?src=..%2Fetc%2Fpasswd").unwrap(),
                status: actual,
                success: actual.is_some(),
                elapsed: Duration::from_micros(12_500),
                error: None,
            };
            let verdict = crate::evaluate::evaluate(&scenario, &observation);
            Self {
                scenario,
                observation,
                verdict,
            }
        }

        pub fn event(&self, index: usize, tally: Tally) -> VerdictEvent<'_> {
            VerdictEvent {
                index,
                scenario: &self.scenario,
                observation: &self.observation,
                verdict: &self.verdict,
                tally,
            }
        }
    }

    pub fn target() -> Url {
        Url::parse("http://localhost/timthumb.php").unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_summary_fold_counts_and_order() {
        let samples = [
            Sample::new("a", 200, Some(200)),
            Sample::new("b", 400, Some(200)),
            Sample::new("c", 400, None),
            Sample::new("d", 400, Some(400)),
        ];
        let summary = samples
            .iter()
            .fold(RunSummary::new("suite", &target()), |acc, s| acc.record(s.verdict.clone()));

        assert_eq!(summary.tally, Tally { total: 4, passed: 2, failed: 2 });
        assert_eq!(summary.tally.passed + summary.tally.failed, summary.tally.total);
        assert_eq!(summary.failures, ["b", "c"]);
        let order: Vec<_> = summary.verdicts.iter().map(|v| v.scenario.as_str()).collect();
        assert_eq!(order, ["a", "b", "c", "d"]);
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_all_passed_exit_code() {
        let summary = RunSummary::new("suite", &target()).record(Sample::new("a", 200, Some(200)).verdict);
        assert!(summary.all_passed());
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_micros(12_500)), "12.50 ms");
    }
}
