use std::path::PathBuf;

/// Fatal error raised before any probe attempt is made.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// Resolved configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Config file could not be read.
    #[error("failed to read config file {}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Config file is not valid JSON or has mistyped fields.
    #[error("failed to parse config file {}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Client(reqwest::Error),
}

/// Attempt-local failure reported by the request executor.
///
/// None of these are fatal: the retry controller records the message and
/// moves on to the next attempt.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    /// The request did not complete within the per-attempt timeout.
    #[error("Request timeout after {}", format_timeout(.0))]
    Timeout(std::time::Duration),
    /// TCP/TLS connection could not be established.
    #[error("{0}")]
    Connection(String),
    /// Any other failure while sending the request or reading the body.
    #[error("{0}")]
    Protocol(String),
}

fn format_timeout(timeout: &std::time::Duration) -> String {
    if timeout.subsec_millis() == 0 {
        format!("{}s", timeout.as_secs())
    } else {
        format!("{}ms", timeout.as_millis())
    }
}
