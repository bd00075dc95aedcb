//! reqwest-backed probe

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::common::{Error, Result};

use super::{Fetch, Probe};

/// Issues real HTTP GETs with a bounded timeout and no retries
///
/// Redirects are not followed: the status recorded is the one the target
/// itself answered with.
pub struct HttpProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, timeout })
    }

    /// Check that the endpoint answers at all before running any scenario
    ///
    /// Any HTTP response counts, including errors; only a transport
    /// failure is fatal.
    pub async fn preflight(&self, base: &Url) -> Result<()> {
        let fetch = self.fetch(base).await;
        match fetch.status {
            Some(status) => {
                tracing::debug!(%base, status, "Preflight reached target");
                Ok(())
            }
            None => Err(Error::TargetUnreachable {
                url: base.to_string(),
                reason: fetch.error.unwrap_or_else(|| "no response".to_string()),
            }),
        }
    }

    fn describe(&self, e: &reqwest::Error) -> String {
        if e.is_timeout() {
            format!("timed out after {} seconds", self.timeout.as_secs_f64())
        } else if e.is_connect() {
            format!("connection failed: {}", e)
        } else {
            e.to_string()
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn fetch(&self, url: &Url) -> Fetch {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                let reason = self.describe(&e);
                tracing::warn!(%url, %reason, "Transport failure");
                return Fetch::transport_failure(reason);
            }
        };

        let status = response.status().as_u16();
        match response.bytes().await {
            Ok(body) => {
                tracing::debug!(%url, status, bytes = body.len(), "Response received");
                Fetch::complete(status)
            }
            Err(e) => {
                let reason = self.describe(&e);
                tracing::warn!(%url, status, %reason, "Response body could not be read");
                Fetch {
                    status: Some(status),
                    success: false,
                    error: Some(reason),
                }
            }
        }
    }
}
