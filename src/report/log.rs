//! Append-only results log
//!
//! One line per event: `[2025-01-31 12:00:00] [PASS] message`.

use std::io::Write;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use super::{format_elapsed, Reporter, RunInfo, RunSummary, VerdictEvent};
use crate::common::{Error, Result};

pub struct LogReporter<W: Write + Send> {
    out: W,
}

impl LogReporter<RollingFileAppender> {
    /// Open (or create) the log file for appending
    ///
    /// Missing parent directories are created. Failure to open is a
    /// harness configuration error.
    pub fn open(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::sink_open(path, "not a file path"))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name)
            .build(dir)
            .map_err(|e| Error::sink_open(path, e))?;

        tracing::debug!(path = %path.display(), "Results log opened");
        Ok(Self::new(appender))
    }
}

impl<W: Write + Send> LogReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, level: &str, message: &str) -> Result<()> {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(self.out, "[{}] [{}] {}", timestamp, level, message)?;
        Ok(())
    }
}

impl<W: Write + Send> Reporter for LogReporter<W> {
    fn start(&mut self, run: &RunInfo<'_>) -> Result<()> {
        self.line(
            "INFO",
            &format!(
                "Starting {} against {} ({} scenarios)",
                run.suite, run.target, run.total
            ),
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn verdict(&mut self, event: &VerdictEvent<'_>) -> Result<()> {
        self.line("INFO", &format!("Testing URL: {}", event.observation.url))?;
        let level = if event.verdict.passed { "PASS" } else { "FAIL" };
        self.line(
            level,
            &format!(
                "{}: {} ({})",
                event.scenario.name,
                event.verdict.message,
                format_elapsed(event.observation.elapsed)
            ),
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn summary(&mut self, summary: &RunSummary) -> Result<()> {
        self.line(
            "INFO",
            &format!(
                "Test Summary: {} total, {} passed, {} failed",
                summary.tally.total, summary.tally.passed, summary.tally.failed
            ),
        )?;
        for name in &summary.failures {
            self.line("FAIL", &format!("Failed scenario: {}", name))?;
        }
        self.out.flush()?;
        Ok(())
    }
}
