//! Renders probe progress as `tracing` events.

use crate::{AttemptEvent, AttemptOutcome, BodyPreview, ProbeOptions, Verdict};

/// Logs the resolved target and thresholds before the first attempt.
pub fn banner(options: &ProbeOptions) {
    tracing::info!(
        server = %options.url,
        timeout_ms = options.timeout.as_millis() as u64,
        max_response_time_ms = options.max_latency_ms,
        retry_attempts = options.max_attempts,
        "starting server health check"
    );
}

/// Logs one attempt, plus the pending wait when another attempt follows.
pub fn attempt(event: &AttemptEvent, options: &ProbeOptions) {
    let attempt = format!("{}/{}", event.attempt, event.max_attempts);
    match event.outcome {
        AttemptOutcome::Success => tracing::info!(
            attempt = %attempt,
            status = ?event.status,
            latency_ms = ?event.latency_ms,
            "health check passed"
        ),
        outcome => tracing::warn!(
            attempt = %attempt,
            outcome = %outcome,
            status = ?event.status,
            latency_ms = ?event.latency_ms,
            error = event.error.as_deref().unwrap_or_default(),
            "health check attempt failed"
        ),
    }

    if event.will_retry() {
        tracing::info!(
            delay_secs = options.retry_delay.as_secs_f64(),
            "waiting before retry"
        );
    }
}

/// Body preview to report for a successful run.
///
/// `None` for failed runs, when body surfacing is disabled, or when the
/// body is empty.
pub fn success_preview(verdict: &Verdict, options: &ProbeOptions) -> Option<BodyPreview> {
    match verdict {
        Verdict::Success { response, .. } if options.include_body => {
            BodyPreview::from_body(&response.body)
        }
        _ => None,
    }
}

/// Logs the final verdict, including a body preview when enabled.
pub fn verdict(verdict: &Verdict, options: &ProbeOptions) {
    match verdict {
        Verdict::Success { response, attempts } => {
            tracing::info!(
                status = response.status,
                latency_ms = response.latency_ms,
                attempts,
                "server is healthy"
            );
            match success_preview(verdict, options) {
                Some(BodyPreview::Structured(data)) => {
                    tracing::info!(data = %data, "response data");
                }
                Some(text @ BodyPreview::Text { .. }) => {
                    tracing::info!(body = %text, "response body");
                }
                None => {}
            }
        }
        Verdict::Failure { reason, attempts } => {
            tracing::error!(
                attempts,
                last_error = %reason,
                "health check failed after {attempts} attempts"
            );
        }
    }
}
