//! Request runner
//!
//! Turns a scenario into exactly one GET and records what happened. A
//! non-2xx status or a dead endpoint is an observation, never an error.

mod http;
mod request;

pub use http::HttpProbe;
pub use request::build_url;

use async_trait::async_trait;
use std::time::{Duration, Instant};
use url::Url;

use crate::scenario::Scenario;

/// Raw outcome of a single fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetch {
    /// Response status, absent when no response was obtained
    pub status: Option<u16>,
    /// Whether a response body was read without a transport error
    pub success: bool,
    /// Transport diagnostic, if any
    pub error: Option<String>,
}

impl Fetch {
    pub fn complete(status: u16) -> Self {
        Self {
            status: Some(status),
            success: true,
            error: None,
        }
    }

    pub fn transport_failure(reason: impl Into<String>) -> Self {
        Self {
            status: None,
            success: false,
            error: Some(reason.into()),
        }
    }
}

/// Something that can issue a GET and report its outcome
#[async_trait]
pub trait Probe: Send + Sync {
    async fn fetch(&self, url: &Url) -> Fetch;
}

/// The measured outcome of running one scenario once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub scenario: String,
    pub url: Url,
    pub status: Option<u16>,
    pub success: bool,
    pub elapsed: Duration,
    pub error: Option<String>,
}

/// Execute one scenario against `base`
pub async fn observe<P: Probe + ?Sized>(probe: &P, base: &Url, scenario: &Scenario) -> Observation {
    let url = build_url(base, &scenario.params);
    tracing::debug!(scenario = %scenario.name, %url, "Probing");

    let started = Instant::now();
    let fetch = probe.fetch(&url).await;
    let elapsed = started.elapsed();

    Observation {
        scenario: scenario.name.clone(),
        url,
        status: fetch.status,
        success: fetch.success,
        elapsed,
        error: fetch.error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Expectation;

    struct Fixed(Fetch);

    #[async_trait]
    impl Probe for Fixed {
        async fn fetch(&self, _url: &Url) -> Fetch {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_observe_records_fetch() {
        let base = Url::parse("http://localhost/timthumb.php").unwrap();
        let scenario = Scenario::new("traversal", "", Expectation::Status(400))
            .param("src", "../../../etc/passwd");

        let observation = observe(&Fixed(Fetch::complete(400)), &base, &scenario).await;
        assert_eq!(observation.scenario, "traversal");
        assert_eq!(observation.status, Some(400));
        assert!(observation.success);
        assert_eq!(observation.url.query(), Some("src=..%2F..%2F..%2Fetc%2Fpasswd"));
    }

    #[tokio::test]
    async fn test_observe_transport_failure() {
        let base = Url::parse("http://localhost/timthumb.php").unwrap();
        let scenario = Scenario::new("down", "", Expectation::Status(200));

        let observation =
            observe(&Fixed(Fetch::transport_failure("connection refused")), &base, &scenario).await;
        assert_eq!(observation.status, None);
        assert!(!observation.success);
        assert_eq!(observation.error.as_deref(), Some("connection refused"));
    }

    #[tokio::test]
    async fn test_http_probe_unreachable_target() {
        // Bind then drop a listener so the port is very likely closed
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let probe = HttpProbe::new(Duration::from_secs(2), "thumbprobe-test").unwrap();
        let url = Url::parse(&format!("http://127.0.0.1:{}/timthumb.php", port)).unwrap();
        let fetch = probe.fetch(&url).await;
        assert_eq!(fetch.status, None);
        assert!(!fetch.success);
        assert!(fetch.error.is_some());

        assert!(matches!(
            probe.preflight(&url).await,
            Err(crate::common::Error::TargetUnreachable { .. })
        ));
    }
}
