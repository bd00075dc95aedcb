//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

use super::paths::config_path;
use super::{Error, Result};

/// Endpoint probed when nothing else names one
pub const DEFAULT_BASE_URL: &str = "http://localhost/timthumb.php";

/// Environment variable overriding the configured endpoint
pub const TARGET_ENV_VAR: &str = "TARGET_BASE_URL";

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Target endpoint settings
    #[serde(default)]
    pub target: TargetSettings,

    /// Report sink settings
    #[serde(default)]
    pub report: ReportSettings,
}

/// Target endpoint settings
#[derive(Debug, Deserialize)]
pub struct TargetSettings {
    /// Base URL of the resizing endpoint
    pub base_url: Option<String>,

    /// Per-request timeout
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every probe
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Feature flags enabled on the target (e.g. "webshot", "allow_external")
    #[serde(default)]
    pub features: Vec<String>,
}

impl Default for TargetSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            features: Vec::new(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("thumbprobe/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Report sink settings
#[derive(Debug, Deserialize)]
pub struct ReportSettings {
    /// Whether to write the append-only results log
    #[serde(default = "default_true")]
    pub log: bool,

    /// Path of the results log (defaults to the data directory)
    pub log_file: Option<PathBuf>,

    /// Path of an HTML report to write after every run
    pub html: Option<PathBuf>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            log: true,
            log_file: None,
            html: None,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Resolve the endpoint to probe
    ///
    /// Precedence: command line, then `TARGET_BASE_URL`, then the config
    /// file, then the suite file, then [`DEFAULT_BASE_URL`].
    pub fn resolve_base_url(
        &self,
        cli: Option<&str>,
        env: Option<&str>,
        suite: Option<&str>,
    ) -> Result<Url> {
        let raw = cli
            .or(env)
            .or(self.target.base_url.as_deref())
            .or(suite)
            .unwrap_or(DEFAULT_BASE_URL);
        parse_base_url(raw)
    }
}

/// Read the endpoint override from the environment, ignoring blank values
pub fn env_base_url() -> Option<String> {
    std::env::var(TARGET_ENV_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Parse and validate an endpoint base URL
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| Error::invalid_target(raw, e))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(Error::invalid_target(
                raw,
                format!("unsupported scheme '{}', expected http or https", other),
            ))
        }
    }
    if url.host_str().is_none() {
        return Err(Error::invalid_target(raw, "missing host"));
    }
    Ok(url)
}
