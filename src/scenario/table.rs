//! Built-in TimThumb conformance table
//!
//! Each row is one scenario. Rejections are expected as an exact 400,
//! accepted requests as an exact 200.

use super::config::{Expectation, FeatureGate, Scenario, ScenarioTable};
use super::suite::Suite;
use crate::common::Result;

/// Image that must exist relative to the endpoint's document root
pub const LOCAL_IMAGE: &str = "images/test-image.jpg";

/// Remote image used when the target allows external sources
pub const EXTERNAL_IMAGE: &str = "https://picsum.photos/200/300";

const OK: Expectation = Expectation::Status(200);
const REJECT: Expectation = Expectation::Status(400);

struct Row {
    name: &'static str,
    description: &'static str,
    params: &'static [(&'static str, &'static str)],
    expect: Expectation,
    requires: Option<(&'static str, bool)>,
}

const fn row(
    name: &'static str,
    description: &'static str,
    params: &'static [(&'static str, &'static str)],
    expect: Expectation,
) -> Row {
    Row {
        name,
        description,
        params,
        expect,
        requires: None,
    }
}

const fn gated(
    name: &'static str,
    description: &'static str,
    params: &'static [(&'static str, &'static str)],
    expect: Expectation,
    feature: &'static str,
    enabled: bool,
) -> Row {
    Row {
        name,
        description,
        params,
        expect,
        requires: Some((feature, enabled)),
    }
}

#[rustfmt::skip]
const ROWS: &[Row] = &[
    // Functionality
    row("Basic Local Image Resize", "Resizes a local image",
        &[("src", LOCAL_IMAGE), ("w", "100"), ("h", "100"), ("q", "90")], OK),
    gated("External Image Fetch", "Resizes an external image when external sources are allowed",
        &[("src", EXTERNAL_IMAGE), ("w", "100"), ("h", "100"), ("q", "90")], OK, "allow_external", true),
    gated("External Image Blocking", "Blocks external images when external sources are disabled",
        &[("src", "http://example.com/nonallowed.jpg"), ("w", "100"), ("h", "100")], REJECT, "allow_external", false),
    row("Memory Limit", "Handles a moderately large resize",
        &[("src", LOCAL_IMAGE), ("w", "1000"), ("h", "1000")], OK),

    // Security: source parameter attacks
    row("Security: directory_traversal", "Rejects directory traversal",
        &[("src", "../../../etc/passwd"), ("w", "100"), ("h", "100")], REJECT),
    row("Security: null_byte", "Rejects null byte injection",
        &[("src", "image.jpg\0.php"), ("w", "100"), ("h", "100")], REJECT),
    row("Security: command_injection", "Rejects shell metacharacters in the source",
        &[("src", "image.jpg;id"), ("w", "100"), ("h", "100")], REJECT),
    row("Security: invalid_scheme", "Rejects file:// sources",
        &[("src", "file:///etc/passwd"), ("w", "100"), ("h", "100")], REJECT),
    row("Security: ftp_scheme", "Rejects non-HTTP remote schemes",
        &[("src", "ftp://example.com/image.jpg"), ("w", "100"), ("h", "100")], REJECT),
    row("Security: xss_attack", "Rejects markup in the source",
        &[("src", "<script>alert(1)</script>.jpg"), ("w", "100"), ("h", "100")], REJECT),
    row("Security: remote_file_inclusion", "Rejects remote scripts",
        &[("src", "http://evil.com/malicious.php"), ("w", "100"), ("h", "100")], REJECT),
    row("Security: data_uri", "Rejects non-image data URIs",
        &[("src", "data:text/html,<script>alert('XSS')</script>"), ("w", "100"), ("h", "100")], REJECT),
    row("Security: Invalid Extension", "Rejects non-image extensions",
        &[("src", "test.php"), ("w", "100"), ("h", "100")], REJECT),
    row("Security: Malformed URL", "Rejects URLs without a host",
        &[("src", "http:///malformed-url"), ("w", "100"), ("h", "100")], REJECT),
    row("Security: Unparseable Source", "Rejects sources that are neither paths nor URLs",
        &[("src", "not_a_valid_url"), ("w", "100"), ("h", "100")], REJECT),

    // WebShot
    gated("WebShot Basic Functionality", "Captures a page when WebShot is enabled",
        &[("src", "http://example.com"), ("webshot", "1"), ("w", "100"), ("h", "100")], OK, "webshot", true),
    gated("WebShot Disabled", "Refuses page captures when WebShot is disabled",
        &[("src", "http://example.com"), ("webshot", "1"), ("w", "100"), ("h", "100")], REJECT, "webshot", false),
    row("WebShot URL Validation", "Rejects malformed schemes in WebShot requests",
        &[("src", "httpmalformed://example.com"), ("webshot", "1"), ("w", "100"), ("h", "100")], REJECT),
    row("WebShot Command Injection ($)", "Rejects '$' in WebShot URLs",
        &[("src", "http://example.com$malicious"), ("webshot", "1"), ("w", "100"), ("h", "100")], REJECT),
    row("WebShot Command Injection (`)", "Rejects '`' in WebShot URLs",
        &[("src", "http://example.com`malicious"), ("webshot", "1"), ("w", "100"), ("h", "100")], REJECT),
    row("WebShot Command Injection (\\)", "Rejects '\\' in WebShot URLs",
        &[("src", "http://example.com\\malicious"), ("webshot", "1"), ("w", "100"), ("h", "100")], REJECT),
    row("WebShot Command Injection (|)", "Rejects '|' in WebShot URLs",
        &[("src", "http://example.com|malicious"), ("webshot", "1"), ("w", "100"), ("h", "100")], REJECT),
    row("WebShot Command Injection (>)", "Rejects '>' in WebShot URLs",
        &[("src", "http://example.com>malicious"), ("webshot", "1"), ("w", "100"), ("h", "100")], REJECT),
    row("WebShot Command Injection (<)", "Rejects '<' in WebShot URLs",
        &[("src", "http://example.com<malicious"), ("webshot", "1"), ("w", "100"), ("h", "100")], REJECT),
    row("WebShot Command Injection (;)", "Rejects ';' in WebShot URLs",
        &[("src", "http://example.com;malicious"), ("webshot", "1"), ("w", "100"), ("h", "100")], REJECT),
    row("WebShot Command Injection (&)", "Rejects '&' in WebShot URLs",
        &[("src", "http://example.com&malicious"), ("webshot", "1"), ("w", "100"), ("h", "100")], REJECT),

    // Cache
    row("Cache: Initial Image Caching", "Serves and caches a fresh size",
        &[("src", LOCAL_IMAGE), ("w", "150"), ("h", "150"), ("q", "90")], OK),
    row("Cache: Debug Request", "Serves a cached size with debug enabled",
        &[("src", LOCAL_IMAGE), ("w", "50"), ("h", "50"), ("debug", "true")], OK),

    // Limits and error handling
    row("System: Memory Limit Handling", "Rejects 5000x5000 output",
        &[("src", LOCAL_IMAGE), ("w", "5000"), ("h", "5000")], REJECT),
    row("System: Maximum Size Limit", "Rejects 10000x10000 output",
        &[("src", LOCAL_IMAGE), ("w", "10000"), ("h", "10000")], REJECT),
    row("Error Handling: Non-existent Image", "Rejects a missing local image",
        &[("src", "nonexistent.jpg"), ("w", "100"), ("h", "100")], REJECT),
];

/// The suite compiled into the binary
pub fn builtin_suite() -> Result<Suite> {
    let scenarios = ROWS
        .iter()
        .map(|row| {
            let scenario = row
                .params
                .iter()
                .fold(Scenario::new(row.name, row.description, row.expect), |s, (k, v)| {
                    s.param(*k, *v)
                });
            match row.requires {
                Some((feature, enabled)) => scenario.requires(FeatureGate::new(feature, enabled)),
                None => scenario,
            }
        })
        .collect();

    Ok(Suite {
        name: "TimThumb Security and Functionality".to_string(),
        description: Some(
            "Probes a TimThumb-style resizer with benign, oversized and hostile requests"
                .to_string(),
        ),
        base_url: None,
        table: ScenarioTable::new(scenarios)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_is_valid() {
        let suite = builtin_suite().unwrap();
        assert_eq!(suite.table.len(), ROWS.len());
        assert!(suite
            .table
            .iter()
            .all(|s| matches!(s.expect, Expectation::Status(200) | Expectation::Status(400))));
    }

    #[test]
    fn test_traversal_and_oversize_expect_rejection() {
        let suite = builtin_suite().unwrap();

        let traversal = suite.table.get("Security: directory_traversal").unwrap();
        assert_eq!(traversal.expect, Expectation::Status(400));
        assert!(traversal
            .params
            .contains(&("src".to_string(), "../../../etc/passwd".to_string())));

        let oversize = suite.table.get("System: Memory Limit Handling").unwrap();
        assert_eq!(oversize.expect, Expectation::Status(400));
        assert!(oversize.params.contains(&("w".to_string(), "5000".to_string())));
    }

    #[test]
    fn test_default_features_resolve_opposite_gates() {
        let table = builtin_suite().unwrap().table.resolve(&[]).unwrap();
        assert!(table.get("WebShot Disabled").is_some());
        assert!(table.get("WebShot Basic Functionality").is_none());
        assert!(table.get("External Image Blocking").is_some());
        assert!(table.get("External Image Fetch").is_none());
    }
}
