//! Colored console output

use colored::Colorize;
use std::io::{self, Write};

use super::{format_elapsed, Reporter, RunInfo, RunSummary, VerdictEvent};
use crate::common::Result;

/// Progressive PASS/FAIL lines followed by a summary
pub struct ConsoleReporter<W: Write + Send> {
    out: W,
    verbose: bool,
    total: usize,
    width: usize,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(verbose: bool) -> Self {
        Self::new(io::stdout(), verbose)
    }
}

impl ConsoleReporter<io::Stderr> {
    /// Used when stdout carries a machine-readable report
    pub fn stderr(verbose: bool) -> Self {
        Self::new(io::stderr(), verbose)
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self {
            out,
            verbose,
            total: 0,
            width: 1,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn start(&mut self, run: &RunInfo<'_>) -> Result<()> {
        self.total = run.total;
        self.width = run.total.to_string().len();
        writeln!(
            self.out,
            "\n{} {}",
            "Running Suite:".blue().bold(),
            run.suite.white().bold()
        )?;
        if let Some(desc) = run.description {
            writeln!(self.out, "  {}", desc.dimmed())?;
        }
        writeln!(
            self.out,
            "  Target: {} ({} scenarios)\n",
            run.target.as_str().cyan(),
            run.total
        )?;
        Ok(())
    }

    fn verdict(&mut self, event: &VerdictEvent<'_>) -> Result<()> {
        let progress = format!(
            "[{:>width$}/{}]",
            event.index + 1,
            self.total,
            width = self.width
        );
        let elapsed = format_elapsed(event.observation.elapsed);

        if event.verdict.passed {
            writeln!(
                self.out,
                "{} {} {} {}",
                progress.dimmed(),
                "✓ PASS".green(),
                event.scenario.name,
                elapsed.dimmed()
            )?;
        } else {
            writeln!(
                self.out,
                "{} {} {} {}",
                progress.dimmed(),
                "✗ FAIL".red().bold(),
                event.scenario.name,
                elapsed.dimmed()
            )?;
            writeln!(self.out, "        └─ {}", event.verdict.message)?;
        }

        if self.verbose {
            writeln!(self.out, "        {}", event.observation.url.as_str().dimmed())?;
            if event.verdict.passed {
                writeln!(self.out, "        {}", event.verdict.message.dimmed())?;
            }
        }
        Ok(())
    }

    fn summary(&mut self, summary: &RunSummary) -> Result<()> {
        writeln!(self.out, "\n{}", "Test Summary:".blue().bold())?;
        writeln!(self.out, "  Total:  {}", summary.tally.total)?;
        writeln!(
            self.out,
            "  Passed: {}",
            summary.tally.passed.to_string().green()
        )?;
        let failed = summary.tally.failed.to_string();
        writeln!(
            self.out,
            "  Failed: {}",
            if summary.all_passed() {
                failed.normal()
            } else {
                failed.red().bold()
            }
        )?;

        if !summary.failures.is_empty() {
            writeln!(self.out, "\n{}", "Failed scenarios:".red())?;
            for name in &summary.failures {
                writeln!(self.out, "  - {}", name)?;
            }
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
