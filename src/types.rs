use std::fmt;
use std::process::ExitCode;

use reqwest::header::HeaderMap;

use crate::ExecuteError;

/// A fully received response to one probe request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Milliseconds from dispatch until the last body byte arrived.
    pub latency_ms: u64,
    pub body: String,
    pub headers: HeaderMap,
}

/// Classified outcome of a single attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptResult {
    Success(HttpResponse),
    NetworkFailure(ExecuteError),
    StatusMismatch {
        status: u16,
        expected: u16,
        latency_ms: u64,
    },
    LatencyExceeded {
        status: u16,
        latency_ms: u64,
        max_latency_ms: u64,
    },
}

impl AttemptResult {
    /// Applies the pass/fail criteria to an executor outcome.
    ///
    /// Status is checked before latency, so a response that is both wrong
    /// and slow is always a status mismatch.
    pub fn evaluate(
        outcome: std::result::Result<HttpResponse, ExecuteError>,
        expected_status: u16,
        max_latency_ms: u64,
    ) -> Self {
        match outcome {
            Err(err) => Self::NetworkFailure(err),
            Ok(response) if response.status != expected_status => Self::StatusMismatch {
                status: response.status,
                expected: expected_status,
                latency_ms: response.latency_ms,
            },
            Ok(response) if response.latency_ms > max_latency_ms => Self::LatencyExceeded {
                status: response.status,
                latency_ms: response.latency_ms,
                max_latency_ms,
            },
            Ok(response) => Self::Success(response),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Human-readable failure reason, `None` for a successful attempt.
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Success(_) => None,
            Self::NetworkFailure(err) => Some(err.to_string()),
            Self::StatusMismatch {
                status, expected, ..
            } => Some(format!(
                "Unexpected status code: {status} (expected {expected})"
            )),
            Self::LatencyExceeded {
                latency_ms,
                max_latency_ms,
                ..
            } => Some(format!(
                "Response time {latency_ms}ms exceeds maximum {max_latency_ms}ms"
            )),
        }
    }

    pub fn outcome(&self) -> AttemptOutcome {
        match self {
            Self::Success(_) => AttemptOutcome::Success,
            Self::NetworkFailure(ExecuteError::Timeout(_)) => AttemptOutcome::Timeout,
            Self::NetworkFailure(ExecuteError::Connection(_)) => AttemptOutcome::ConnectionError,
            Self::NetworkFailure(ExecuteError::Protocol(_)) => AttemptOutcome::ProtocolError,
            Self::StatusMismatch { .. } => AttemptOutcome::StatusMismatch,
            Self::LatencyExceeded { .. } => AttemptOutcome::LatencyExceeded,
        }
    }

    fn status(&self) -> Option<u16> {
        match self {
            Self::Success(response) => Some(response.status),
            Self::NetworkFailure(_) => None,
            Self::StatusMismatch { status, .. } | Self::LatencyExceeded { status, .. } => {
                Some(*status)
            }
        }
    }

    fn latency_ms(&self) -> Option<u64> {
        match self {
            Self::Success(response) => Some(response.latency_ms),
            Self::NetworkFailure(_) => None,
            Self::StatusMismatch { latency_ms, .. } | Self::LatencyExceeded { latency_ms, .. } => {
                Some(*latency_ms)
            }
        }
    }
}

/// Outcome kind carried by an [`AttemptEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    ConnectionError,
    Timeout,
    ProtocolError,
    StatusMismatch,
    LatencyExceeded,
}

impl AttemptOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ConnectionError => "connection_error",
            Self::Timeout => "timeout",
            Self::ProtocolError => "protocol_error",
            Self::StatusMismatch => "status_mismatch",
            Self::LatencyExceeded => "latency_exceeded",
        }
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured per-attempt report handed to the caller's observer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptEvent {
    /// 1-based attempt number.
    pub attempt: u32,
    pub max_attempts: u32,
    pub outcome: AttemptOutcome,
    pub status: Option<u16>,
    pub error: Option<String>,
    pub latency_ms: Option<u64>,
}

impl AttemptEvent {
    pub(crate) fn new(attempt: u32, max_attempts: u32, result: &AttemptResult) -> Self {
        Self {
            attempt,
            max_attempts,
            outcome: result.outcome(),
            status: result.status(),
            error: result.failure_reason(),
            latency_ms: result.latency_ms(),
        }
    }

    /// Whether the controller will pause and try again after this attempt.
    pub fn will_retry(&self) -> bool {
        self.outcome != AttemptOutcome::Success && self.attempt < self.max_attempts
    }
}

/// Terminal result of a probe run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Success {
        response: HttpResponse,
        attempts: u32,
    },
    Failure {
        /// Reason recorded by the last attempt.
        reason: String,
        attempts: u32,
    },
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Number of executor invocations the run made.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. } | Self::Failure { attempts, .. } => *attempts,
        }
    }

    /// Process exit status: 0 on success, 1 on failure.
    pub fn exit_status(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::header::HeaderMap;

    use super::{AttemptEvent, AttemptOutcome, AttemptResult, HttpResponse};
    use crate::ExecuteError;

    fn response(status: u16, latency_ms: u64) -> HttpResponse {
        HttpResponse {
            status,
            latency_ms,
            body: String::new(),
            headers: HeaderMap::new(),
        }
    }

    #[test]
    fn wrong_status_wins_over_excessive_latency() {
        let result = AttemptResult::evaluate(Ok(response(500, 5_000)), 200, 1_000);
        assert_eq!(result.outcome(), AttemptOutcome::StatusMismatch);
        assert_eq!(
            result.failure_reason().as_deref(),
            Some("Unexpected status code: 500 (expected 200)")
        );
    }

    #[test]
    fn latency_over_bound_is_reported_with_both_values() {
        let result = AttemptResult::evaluate(Ok(response(200, 1_500)), 200, 1_000);
        assert_eq!(
            result.failure_reason().as_deref(),
            Some("Response time 1500ms exceeds maximum 1000ms")
        );
    }

    #[test]
    fn latency_equal_to_bound_passes() {
        let result = AttemptResult::evaluate(Ok(response(200, 1_000)), 200, 1_000);
        assert!(result.is_success());
        assert_eq!(result.failure_reason(), None);
    }

    #[test]
    fn event_for_timeout_has_no_status() {
        let result = AttemptResult::evaluate(
            Err(ExecuteError::Timeout(Duration::from_secs(5))),
            200,
            1_000,
        );
        let event = AttemptEvent::new(2, 3, &result);
        assert_eq!(event.outcome, AttemptOutcome::Timeout);
        assert_eq!(event.status, None);
        assert_eq!(event.latency_ms, None);
        assert_eq!(event.error.as_deref(), Some("Request timeout after 5s"));
        assert!(event.will_retry());
    }

    #[test]
    fn last_failed_attempt_does_not_retry() {
        let result = AttemptResult::evaluate(Ok(response(503, 10)), 200, 1_000);
        let event = AttemptEvent::new(3, 3, &result);
        assert_eq!(event.status, Some(503));
        assert!(!event.will_retry());
    }
}
