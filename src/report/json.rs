//! Machine-readable run summary

use std::io::{self, Write};

use super::{Reporter, RunInfo, RunSummary, VerdictEvent};
use crate::common::Result;

/// Writes the final [`RunSummary`] as pretty JSON; per-verdict events are
/// not streamed.
pub struct JsonReporter<W: Write + Send> {
    out: W,
}

impl JsonReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Reporter for JsonReporter<W> {
    fn start(&mut self, _run: &RunInfo<'_>) -> Result<()> {
        Ok(())
    }

    fn verdict(&mut self, _event: &VerdictEvent<'_>) -> Result<()> {
        Ok(())
    }

    fn summary(&mut self, summary: &RunSummary) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, summary)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
