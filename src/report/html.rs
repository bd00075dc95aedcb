//! Styled HTML report

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::{format_elapsed, Reporter, RunInfo, RunSummary, VerdictEvent};
use crate::common::{Error, Result};

const STYLE: &str = "\
        body { font-family: Arial, sans-serif; margin: 20px; line-height: 1.5; }
        h1, h2 { color: #333; }
        h3 { margin-top: 30px; border-top: 1px solid #eee; padding-top: 10px; }
        code { background: #f6f8fa; padding: 2px 5px; border-radius: 3px; }
        .summary { margin: 20px 0; padding: 10px; background: #f9f9f9; border-left: 4px solid #ddd; }
        .pass { color: green; }
        .fail { color: red; }";

/// Renders the run as a single HTML document
///
/// The document is streamed: sections are written as verdicts arrive and
/// the closing tags follow the summary.
pub struct HtmlReporter<W: Write + Send> {
    out: W,
}

impl HtmlReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl HtmlReporter<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| Error::sink_open(path, e))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Send> HtmlReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Reporter for HtmlReporter<W> {
    fn start(&mut self, run: &RunInfo<'_>) -> Result<()> {
        let title = escape(run.suite);
        writeln!(self.out, "<!DOCTYPE html>")?;
        writeln!(self.out, "<html>\n<head>\n    <meta charset=\"utf-8\">")?;
        writeln!(self.out, "    <title>{}</title>", title)?;
        writeln!(self.out, "    <style>\n{}\n    </style>\n</head>\n<body>", STYLE)?;
        writeln!(self.out, "    <h1>{}</h1>", title)?;
        if let Some(desc) = run.description {
            writeln!(self.out, "    <p>{}</p>", escape(desc))?;
        }
        writeln!(
            self.out,
            "    <h2>Target: <code>{}</code> ({} scenarios)</h2>",
            escape(run.target.as_str()),
            run.total
        )?;
        Ok(())
    }

    fn verdict(&mut self, event: &VerdictEvent<'_>) -> Result<()> {
        let (class, label) = if event.verdict.passed {
            ("pass", "PASS")
        } else {
            ("fail", "FAIL")
        };
        writeln!(self.out, "    <h3>Test: {}</h3>", escape(&event.scenario.name))?;
        if !event.scenario.description.is_empty() {
            writeln!(self.out, "    <p>{}</p>", escape(&event.scenario.description))?;
        }
        writeln!(
            self.out,
            "    <p>Testing URL: <code>{}</code></p>",
            escape(event.observation.url.as_str())
        )?;
        writeln!(
            self.out,
            "    <p>Result: <span class='{}'>{}</span> {}</p>",
            class,
            label,
            escape(&event.verdict.message)
        )?;
        writeln!(
            self.out,
            "    <p>Time: {}</p>",
            format_elapsed(event.observation.elapsed)
        )?;
        Ok(())
    }

    fn summary(&mut self, summary: &RunSummary) -> Result<()> {
        writeln!(self.out, "    <div class='summary'>")?;
        writeln!(self.out, "        <h2>Test Summary</h2>")?;
        writeln!(self.out, "        <p>Total Tests: {}</p>", summary.tally.total)?;
        writeln!(self.out, "        <p class='pass'>Passed: {}</p>", summary.tally.passed)?;
        writeln!(self.out, "        <p class='fail'>Failed: {}</p>", summary.tally.failed)?;
        if !summary.failures.is_empty() {
            writeln!(self.out, "        <h3>Failed Tests:</h3>\n        <ul>")?;
            for name in &summary.failures {
                writeln!(self.out, "            <li>{}</li>", escape(name))?;
            }
            writeln!(self.out, "        </ul>")?;
        }
        writeln!(self.out, "    </div>\n</body>\n</html>")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Escape text for HTML element and attribute content
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::*;
    use crate::report::Tally;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<script>alert('x')</script>&\""),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;&amp;&quot;"
        );
    }

    #[test]
    fn test_html_document() {
        let target = target();
        let hostile = Sample::new("<b>xss</b>", 400, Some(200));
        let mut reporter = HtmlReporter::new(Vec::new());
        reporter
            .start(&RunInfo {
                suite: "TimThumb Security Test Suite",
                description: None,
                target: &target,
                total: 1,
            })
            .unwrap();
        reporter
            .verdict(&hostile.event(0, Tally::default().record(false)))
            .unwrap();
        let summary = RunSummary::new("suite", &target).record(hostile.verdict.clone());
        reporter.summary(&summary).unwrap();

        let html = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.trim_end().ends_with("</html>"));
        assert!(html.contains("<title>TimThumb Security Test Suite</title>"));
        assert!(html.contains("<h3>Test: &lt;b&gt;xss&lt;/b&gt;</h3>"));
        assert!(!html.contains("<b>xss</b>"));
        assert!(html.contains("<span class='fail'>FAIL</span>"));
        assert!(html.contains("<li>&lt;b&gt;xss&lt;/b&gt;</li>"));
        assert!(html.contains("<p class='fail'>Failed: 1</p>"));
    }
}
