use std::time::Duration;

use reqwest::Url;

use crate::{ProbeError, Result};

/// Default `User-Agent` sent with every probe request.
pub const DEFAULT_USER_AGENT: &str = "Server-Health-Monitor/1.0";

/// Fully resolved probe configuration, immutable for the run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProbeOptions {
    /// Target URL of the health endpoint.
    pub url: Url,
    /// Per-attempt timeout covering connect, headers and body.
    pub timeout: Duration,
    /// Total number of attempts, including the first.
    pub max_attempts: u32,
    /// Fixed pause between consecutive attempts.
    pub retry_delay: Duration,
    /// Status code a healthy endpoint must answer with.
    pub expected_status: u16,
    /// Upper bound for end-to-end latency in milliseconds.
    pub max_latency_ms: u64,
    /// Value of the `User-Agent` request header.
    pub user_agent: String,
    /// Surface the response body when the probe succeeds.
    pub include_body: bool,
}

impl ProbeOptions {
    /// Creates options for `url` with default thresholds.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: Duration::from_secs(10),
            max_attempts: 3,
            retry_delay: Duration::from_secs(5),
            expected_status: 200,
            max_latency_ms: 2_000,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            include_body: false,
        }
    }

    /// Parses `url` and creates options with default thresholds.
    pub fn parse(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|err| ProbeError::Config(format!("invalid target url '{url}': {err}")))?;
        Ok(Self::new(url))
    }

    /// Checks invariants the retry controller relies on.
    ///
    /// Must pass before the first attempt; a failure here is fatal.
    pub fn validate(&self) -> Result<()> {
        match self.url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ProbeError::Config(format!(
                    "unsupported scheme '{other}' in {}, expected http or https",
                    self.url
                )))
            }
        }
        if self.url.host_str().map_or(true, str::is_empty) {
            return Err(ProbeError::Config(format!(
                "target url {} has no host",
                self.url
            )));
        }
        if self.max_attempts == 0 {
            return Err(ProbeError::Config(
                "retry attempts must be at least 1".to_owned(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(ProbeError::Config(
                "timeout must be greater than zero".to_owned(),
            ));
        }
        if !(100..=999).contains(&self.expected_status) {
            return Err(ProbeError::Config(format!(
                "expected status {} is not a valid http status code",
                self.expected_status
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ProbeError::Config("user agent must not be empty".to_owned()));
        }
        Ok(())
    }
}
