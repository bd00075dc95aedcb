//! Run loop
//!
//! Scenarios execute one at a time in table order. Each verdict is handed
//! to the reporter before the next request is sent.

use url::Url;

use crate::common::{Error, Result};
use crate::evaluate::evaluate;
use crate::probe::{observe, Probe};
use crate::report::{Reporter, RunInfo, RunSummary, VerdictEvent};
use crate::scenario::Suite;

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running,
    Summarized,
    Done,
}

impl RunPhase {
    fn next(self) -> Option<RunPhase> {
        match self {
            RunPhase::Idle => Some(RunPhase::Running),
            RunPhase::Running => Some(RunPhase::Summarized),
            RunPhase::Summarized => Some(RunPhase::Done),
            RunPhase::Done => None,
        }
    }
}

/// Drives one run of a suite against a target
pub struct Harness<'a, P: Probe + ?Sized> {
    probe: &'a P,
    target: Url,
    phase: RunPhase,
}

impl<'a, P: Probe + ?Sized> Harness<'a, P> {
    pub fn new(probe: &'a P, target: Url) -> Self {
        Self {
            probe,
            target,
            phase: RunPhase::Idle,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Run every scenario of `suite` and return the summary
    ///
    /// Per-scenario problems end up in verdicts; only reporter failures
    /// abort the run. A harness runs once.
    pub async fn run<R: Reporter + ?Sized>(
        &mut self,
        suite: &Suite,
        reporter: &mut R,
    ) -> Result<RunSummary> {
        self.advance(RunPhase::Running)?;
        tracing::info!(suite = %suite.name, target = %self.target, scenarios = suite.table.len(), "Run started");

        reporter.start(&RunInfo {
            suite: &suite.name,
            description: suite.description.as_deref(),
            target: &self.target,
            total: suite.table.len(),
        })?;

        let mut summary = RunSummary::new(&suite.name, &self.target);
        for (index, scenario) in suite.table.iter().enumerate() {
            let observation = observe(self.probe, &self.target, scenario).await;
            let verdict = evaluate(scenario, &observation);
            tracing::debug!(
                scenario = %scenario.name,
                passed = verdict.passed,
                status = ?observation.status,
                "Scenario evaluated"
            );

            reporter.verdict(&VerdictEvent {
                index,
                scenario,
                observation: &observation,
                verdict: &verdict,
                tally: summary.tally.record(verdict.passed),
            })?;
            summary = summary.record(verdict);
        }

        self.advance(RunPhase::Summarized)?;
        reporter.summary(&summary)?;
        self.advance(RunPhase::Done)?;

        tracing::info!(
            total = summary.tally.total,
            passed = summary.tally.passed,
            failed = summary.tally.failed,
            "Run finished"
        );
        Ok(summary)
    }

    fn advance(&mut self, to: RunPhase) -> Result<()> {
        if self.phase.next() != Some(to) {
            return Err(Error::Internal(format!(
                "Illegal run transition {:?} -> {:?}",
                self.phase, to
            )));
        }
        self.phase = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::Fetch;
    use crate::report::Tally;
    use crate::scenario::{Expectation, Scenario, ScenarioTable};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers 400 whenever the query mentions "passwd", else 200
    struct Scripted {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Probe for Scripted {
        async fn fetch(&self, url: &Url) -> Fetch {
            self.seen.lock().unwrap().push(url.to_string());
            if url.as_str().contains("passwd") {
                Fetch::complete(400)
            } else {
                Fetch::complete(200)
            }
        }
    }

    struct Down;

    #[async_trait]
    impl Probe for Down {
        async fn fetch(&self, _url: &Url) -> Fetch {
            Fetch::transport_failure("connection refused")
        }
    }

    /// Records the order of reporter callbacks
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        tallies: Vec<Tally>,
    }

    impl Reporter for Recorder {
        fn start(&mut self, run: &RunInfo<'_>) -> Result<()> {
            self.events.push(format!("start:{}", run.total));
            Ok(())
        }

        fn verdict(&mut self, event: &VerdictEvent<'_>) -> Result<()> {
            self.events
                .push(format!("{}:{}:{}", event.index, event.scenario.name, event.verdict.passed));
            self.tallies.push(event.tally);
            Ok(())
        }

        fn summary(&mut self, summary: &RunSummary) -> Result<()> {
            self.events.push(format!("summary:{}", summary.tally.total));
            Ok(())
        }
    }

    fn suite() -> Suite {
        let table = ScenarioTable::new(vec![
            Scenario::new("valid", "", Expectation::Status(200))
                .param("src", "images/test-image.jpg")
                .param("w", "100"),
            Scenario::new("traversal", "", Expectation::Status(400))
                .param("src", "../../../etc/passwd"),
            Scenario::new("oversize", "", Expectation::Status(400))
                .param("w", "5000")
                .param("h", "5000"),
            Scenario::new("fetchable", "", Expectation::Success(true)),
        ])
        .unwrap();
        Suite {
            name: "unit".to_string(),
            description: None,
            base_url: None,
            table,
        }
    }

    fn target() -> Url {
        Url::parse("http://localhost/timthumb.php").unwrap()
    }

    #[tokio::test]
    async fn test_run_in_table_order() {
        let probe = Scripted {
            seen: Mutex::new(Vec::new()),
        };
        let mut recorder = Recorder::default();
        let mut harness = Harness::new(&probe, target());
        assert_eq!(harness.phase(), RunPhase::Idle);

        let summary = harness.run(&suite(), &mut recorder).await.unwrap();
        assert_eq!(harness.phase(), RunPhase::Done);

        assert_eq!(
            recorder.events,
            [
                "start:4",
                "0:valid:true",
                "1:traversal:true",
                "2:oversize:false",
                "3:fetchable:true",
                "summary:4"
            ]
        );
        assert_eq!(probe.seen.lock().unwrap().len(), 4);
        assert_eq!(summary.tally, Tally { total: 4, passed: 3, failed: 1 });
        assert_eq!(summary.failures, ["oversize"]);
        assert_eq!(recorder.tallies[2], Tally { total: 3, passed: 2, failed: 1 });
    }

    #[tokio::test]
    async fn test_unreachable_target_still_summarizes() {
        let mut recorder = Recorder::default();
        let summary = Harness::new(&Down, target())
            .run(&suite(), &mut recorder)
            .await
            .unwrap();

        assert_eq!(summary.tally.total, 4);
        assert_eq!(summary.tally.failed, 4);
        assert!(summary.verdicts.iter().all(|v| !v.passed));
        assert_eq!(recorder.events.last().unwrap(), "summary:4");
    }

    #[tokio::test]
    async fn test_harness_runs_once() {
        let mut recorder = Recorder::default();
        let mut harness = Harness::new(&Down, target());
        harness.run(&suite(), &mut recorder).await.unwrap();
        assert!(matches!(
            harness.run(&suite(), &mut recorder).await,
            Err(Error::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let probe = Scripted {
            seen: Mutex::new(Vec::new()),
        };
        let first = Harness::new(&probe, target())
            .run(&suite(), &mut Recorder::default())
            .await
            .unwrap();
        let second = Harness::new(&probe, target())
            .run(&suite(), &mut Recorder::default())
            .await
            .unwrap();
        assert_eq!(first, second);
    }
}
