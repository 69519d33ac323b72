//! JSON config file model and target resolution.
//!
//! The file layout keeps three sections: `monitoring` (where and how often to
//! probe), `health_check` (pass criteria) and `notifications` (what to report
//! on success). Every key is optional and falls back to a default.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::{options::DEFAULT_USER_AGENT, ProbeError, ProbeOptions, Result};

/// Default config file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/monitoring.json";
/// Host used when neither `SERVER_HOST` nor a positional host is given.
pub const DEFAULT_HOST: &str = "localhost";
/// Port used when neither `SERVER_PORT` nor a positional port is given.
pub const DEFAULT_PORT: &str = "8746";
/// Environment variable overriding the target host.
pub const HOST_ENV: &str = "SERVER_HOST";
/// Environment variable overriding the target port.
pub const PORT_ENV: &str = "SERVER_PORT";

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitoringConfig {
    pub monitoring: Monitoring,
    pub health_check: HealthCheck,
    pub notifications: Notifications,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Monitoring {
    pub endpoint: String,
    /// Fractional values are allowed, e.g. `2.5`.
    pub timeout_seconds: f64,
    pub retry_attempts: u32,
    pub retry_delay_seconds: f64,
    pub scheme: String,
}

impl Default for Monitoring {
    fn default() -> Self {
        Self {
            endpoint: "/api/health".to_owned(),
            timeout_seconds: 10.0,
            retry_attempts: 3,
            retry_delay_seconds: 5.0,
            scheme: "http".to_owned(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HealthCheck {
    pub max_response_time_ms: u64,
    pub expected_status: u16,
    pub user_agent: String,
}

impl Default for HealthCheck {
    fn default() -> Self {
        Self {
            max_response_time_ms: 2_000,
            expected_status: 200,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Notifications {
    /// Surfaces the response body on success.
    pub include_response_time: Option<bool>,
    /// Same as `include_response_time`; either one enables the preview.
    pub include_response_body: Option<bool>,
}

impl Notifications {
    pub fn include_body(&self) -> bool {
        self.include_response_time.unwrap_or(false) || self.include_response_body.unwrap_or(false)
    }
}

/// Host and port taken from the environment or the command line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetOverrides {
    pub host: Option<String>,
    pub port: Option<String>,
}

impl TargetOverrides {
    /// Merges `SERVER_HOST`/`SERVER_PORT` with positional arguments.
    ///
    /// Environment values take precedence over positional ones.
    pub fn from_env_or(host: Option<String>, port: Option<String>) -> Self {
        Self::merge(
            non_empty(std::env::var(HOST_ENV).ok()),
            non_empty(std::env::var(PORT_ENV).ok()),
            host,
            port,
        )
    }

    fn merge(
        env_host: Option<String>,
        env_port: Option<String>,
        arg_host: Option<String>,
        arg_port: Option<String>,
    ) -> Self {
        Self {
            host: env_host.or(non_empty(arg_host)),
            port: env_port.or(non_empty(arg_port)),
        }
    }
}

/// Converts a non-negative, finite number of seconds into a `Duration`.
fn seconds(key: &str, value: f64) -> Result<Duration> {
    if value < 0.0 {
        return Err(ProbeError::Config(format!(
            "{key} must not be negative, got {value}"
        )));
    }
    Duration::try_from_secs_f64(value)
        .map_err(|err| ProbeError::Config(format!("invalid {key} {value}: {err}")))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl MonitoringConfig {
    /// Reads and parses a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ProbeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ProbeError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Formats the target URL and resolves the run's [`ProbeOptions`].
    ///
    /// The returned options have already passed [`ProbeOptions::validate`].
    pub fn resolve(&self, overrides: &TargetOverrides) -> Result<ProbeOptions> {
        let host = overrides.host.as_deref().unwrap_or(DEFAULT_HOST).trim();
        let port_text = overrides.port.as_deref().unwrap_or(DEFAULT_PORT).trim();
        let port: u16 = port_text
            .parse()
            .map_err(|_| ProbeError::Config(format!("invalid port '{port_text}'")))?;

        let endpoint = &self.monitoring.endpoint;
        let separator = if endpoint.starts_with('/') { "" } else { "/" };
        let url = format!(
            "{}://{host}:{port}{separator}{endpoint}",
            self.monitoring.scheme
        );

        let mut options = ProbeOptions::parse(&url)?;
        options.timeout = seconds("timeout_seconds", self.monitoring.timeout_seconds)?;
        options.max_attempts = self.monitoring.retry_attempts;
        options.retry_delay = seconds("retry_delay_seconds", self.monitoring.retry_delay_seconds)?;
        options.expected_status = self.health_check.expected_status;
        options.max_latency_ms = self.health_check.max_response_time_ms;
        options.user_agent = self.health_check.user_agent.clone();
        options.include_body = self.notifications.include_body();
        options.validate()?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{MonitoringConfig, TargetOverrides};
    use crate::ProbeError;

    const SAMPLE: &str = r#"{
        "monitoring": {
            "endpoint": "/status",
            "timeout_seconds": 5,
            "retry_attempts": 4,
            "interval_seconds": 60
        },
        "health_check": {
            "max_response_time_ms": 750,
            "user_agent": "Ops-Probe/3.1"
        },
        "notifications": { "include_response_time": true, "email": "ops@example.com" }
    }"#;

    #[test]
    fn parses_known_keys_and_ignores_unknown_ones() {
        let config: MonitoringConfig = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(config.monitoring.endpoint, "/status");
        assert_eq!(config.monitoring.retry_attempts, 4);
        assert_eq!(config.monitoring.retry_delay_seconds, 5.0);
        assert_eq!(config.health_check.expected_status, 200);
        assert!(config.notifications.include_body());
    }

    #[test]
    fn resolves_defaults_when_no_overrides() {
        let config: MonitoringConfig = serde_json::from_str(SAMPLE).unwrap();
        let options = config.resolve(&TargetOverrides::default()).unwrap();

        assert_eq!(options.url.as_str(), "http://localhost:8746/status");
        assert_eq!(options.timeout, Duration::from_secs(5));
        assert_eq!(options.max_attempts, 4);
        assert_eq!(options.max_latency_ms, 750);
        assert_eq!(options.user_agent, "Ops-Probe/3.1");
        assert!(options.include_body);
    }

    #[test]
    fn empty_document_uses_all_defaults() {
        let config: MonitoringConfig = serde_json::from_str("{}").unwrap();
        let options = config.resolve(&TargetOverrides::default()).unwrap();

        assert_eq!(options.url.as_str(), "http://localhost:8746/api/health");
        assert_eq!(options.user_agent, "Server-Health-Monitor/1.0");
        assert!(!options.include_body);
    }

    #[test]
    fn environment_wins_over_positional_arguments() {
        let overrides = TargetOverrides::merge(
            Some("env-host".to_owned()),
            None,
            Some("arg-host".to_owned()),
            Some("9000".to_owned()),
        );
        assert_eq!(overrides.host.as_deref(), Some("env-host"));
        assert_eq!(overrides.port.as_deref(), Some("9000"));
    }

    #[test]
    fn applies_host_and_port_overrides() {
        let config = MonitoringConfig::default();
        let overrides = TargetOverrides {
            host: Some("10.0.0.7".to_owned()),
            port: Some("9000".to_owned()),
        };
        let options = config.resolve(&overrides).unwrap();
        assert_eq!(options.url.as_str(), "http://10.0.0.7:9000/api/health");
    }

    #[test]
    fn endpoint_without_leading_slash_is_joined() {
        let mut config = MonitoringConfig::default();
        config.monitoring.endpoint = "healthz".to_owned();
        let options = config.resolve(&TargetOverrides::default()).unwrap();
        assert_eq!(options.url.path(), "/healthz");
    }

    #[test]
    fn invalid_port_is_fatal() {
        let overrides = TargetOverrides {
            host: None,
            port: Some("eighty".to_owned()),
        };
        let err = MonitoringConfig::default()
            .resolve(&overrides)
            .expect_err("port must be numeric");
        assert!(matches!(err, ProbeError::Config(message) if message.contains("eighty")));
    }

    #[test]
    fn zero_retry_attempts_is_fatal() {
        let mut config = MonitoringConfig::default();
        config.monitoring.retry_attempts = 0;
        assert!(config.resolve(&TargetOverrides::default()).is_err());
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = MonitoringConfig::load("does/not/exist.json").expect_err("file is missing");
        assert!(matches!(err, ProbeError::ConfigRead { .. }));
    }

    #[test]
    fn mistyped_field_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("health-probe-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("monitoring.json");
        std::fs::write(&path, r#"{"monitoring": {"retry_attempts": "three"}}"#).unwrap();

        let err = MonitoringConfig::load(&path).expect_err("string attempts must fail");
        assert!(matches!(err, ProbeError::ConfigParse { .. }));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn fractional_timeout_is_accepted() {
        let config: MonitoringConfig =
            serde_json::from_str(r#"{"monitoring": {"timeout_seconds": 2.5}}"#).unwrap();
        let options = config.resolve(&TargetOverrides::default()).unwrap();
        assert_eq!(options.timeout, Duration::from_millis(2_500));
    }

    #[test]
    fn zero_or_negative_timeout_is_fatal() {
        for timeout in [0.0, -1.0] {
            let mut config = MonitoringConfig::default();
            config.monitoring.timeout_seconds = timeout;
            let err = config
                .resolve(&TargetOverrides::default())
                .expect_err("timeout must be positive");
            assert!(matches!(err, ProbeError::Config(_)));
        }
    }

    #[test]
    fn negative_retry_delay_is_fatal() {
        let mut config = MonitoringConfig::default();
        config.monitoring.retry_delay_seconds = -0.5;
        assert!(config.resolve(&TargetOverrides::default()).is_err());
    }

    #[test]
    fn either_body_key_enables_preview_and_both_may_be_present() {
        let config: MonitoringConfig = serde_json::from_str(
            r#"{"notifications": {"include_response_time": false, "include_response_body": true}}"#,
        )
        .unwrap();
        let options = config.resolve(&TargetOverrides::default()).unwrap();
        assert!(options.include_body);

        let config: MonitoringConfig = serde_json::from_str(
            r#"{"notifications": {"include_response_time": false, "include_response_body": false}}"#,
        )
        .unwrap();
        assert!(!config.notifications.include_body());
    }
}
