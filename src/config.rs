//! Client and polling configuration.
//!
//! Values come from (lowest to highest precedence) built-in defaults, an
//! optional YAML file, and `RUNPOD_*` environment variables.

use crate::{Error, ErrorContext, ErrorKind, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://api.runpod.ai";
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.runpod.io/graphql";

pub const MIN_POLL_INTERVAL_MS: u64 = 250;
pub const MAX_POLL_INTERVAL_MS: u64 = 10_000;
pub const MIN_TIMEOUT_MS: u64 = 5_000;
pub const MAX_TIMEOUT_MS: u64 = 600_000;

const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Polling cadence and overall budget for an asynchronous job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    poll_interval: Duration,
    timeout: Duration,
}

impl PollConfig {
    /// Build a config, clamping both values into their allowed ranges.
    pub fn new(poll_interval_ms: u64, timeout_ms: u64) -> Self {
        let interval = clamp_ms(
            "poll_interval_ms",
            poll_interval_ms,
            MIN_POLL_INTERVAL_MS,
            MAX_POLL_INTERVAL_MS,
        );
        let timeout = clamp_ms("timeout_ms", timeout_ms, MIN_TIMEOUT_MS, MAX_TIMEOUT_MS);
        Self {
            poll_interval: Duration::from_millis(interval),
            timeout: Duration::from_millis(timeout),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Upper bound on status polls for one job: `ceil(timeout / interval) + 1`.
    pub fn max_polls(&self) -> u64 {
        let interval = self.poll_interval.as_millis().max(1) as u64;
        let timeout = self.timeout.as_millis() as u64;
        timeout.div_ceil(interval) + 1
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS)
    }
}

fn clamp_ms(field: &str, value: u64, min: u64, max: u64) -> u64 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!(field, requested = value, applied = clamped, "value out of range, clamped");
    }
    clamped
}

/// Runtime configuration of a [`crate::RunpodClient`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub graphql_url: String,
    /// Ceiling for run, status and registry calls
    pub http_timeout_secs: u64,
    /// Ceiling for blocking `runsync` calls
    pub sync_timeout_secs: u64,
    pub catalog_ttl_secs: u64,
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
    pub proxy_url: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            http_timeout_secs: 30,
            sync_timeout_secs: 120,
            catalog_ttl_secs: 300,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            proxy_url: None,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by the environment.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Parse a YAML document, then apply environment overrides.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg: ClientConfig = serde_yaml::from_str(yaml).map_err(|e| {
            Error::malformed_with_context(format!("invalid config: {}", e), ErrorContext::new())
        })?;
        Ok(cfg.with_env_overrides())
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::new(
                ErrorKind::NotFound,
                format!("cannot read config {}: {}", path.display(), e),
                ErrorContext::new(),
            )
        })?;
        Self::from_yaml_str(&raw)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("RUNPOD_BASE_URL") {
            self.base_url = v;
        }
        if let Ok(v) = env::var("RUNPOD_GRAPHQL_URL") {
            self.graphql_url = v;
        }
        if let Ok(v) = env::var("RUNPOD_PROXY_URL") {
            self.proxy_url = Some(v);
        }
        self.http_timeout_secs = env_u64("RUNPOD_HTTP_TIMEOUT_SECS").unwrap_or(self.http_timeout_secs);
        self.sync_timeout_secs = env_u64("RUNPOD_SYNC_TIMEOUT_SECS").unwrap_or(self.sync_timeout_secs);
        self.catalog_ttl_secs = env_u64("RUNPOD_CATALOG_TTL_SECS").unwrap_or(self.catalog_ttl_secs);
        self.poll_interval_ms = env_u64("RUNPOD_POLL_INTERVAL_MS").unwrap_or(self.poll_interval_ms);
        self.timeout_ms = env_u64("RUNPOD_TIMEOUT_MS").unwrap_or(self.timeout_ms);
        self
    }

    /// Check that both endpoints are absolute http(s) URLs.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("base_url", &self.base_url), ("graphql_url", &self.graphql_url)] {
            let parsed = url::Url::parse(value).map_err(|e| {
                Error::malformed_with_context(
                    format!("{} is not a valid URL ({}): {}", field, value, e),
                    ErrorContext::new(),
                )
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::malformed_with_context(
                    format!("{} must use http or https: {}", field, value),
                    ErrorContext::new(),
                ));
            }
        }
        Ok(())
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig::new(self.poll_interval_ms, self.timeout_ms)
    }

    pub fn catalog_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_ttl_secs)
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|s| s.trim().parse::<u64>().ok())
}
