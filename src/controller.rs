use tokio::time::sleep;

use crate::{
    AttemptEvent, AttemptResult, Execute, HttpExecutor, ProbeOptions, Result, Verdict,
};

/// Drives repeated probe attempts until one passes or attempts run out.
#[derive(Clone, Debug)]
pub struct RetryController<E = HttpExecutor> {
    executor: E,
    options: ProbeOptions,
}

impl RetryController<HttpExecutor> {
    /// Validates `options` and pairs them with a `reqwest`-backed executor.
    pub fn new(options: ProbeOptions) -> Result<Self> {
        Self::with_executor(HttpExecutor::new()?, options)
    }
}

impl<E: Execute> RetryController<E> {
    /// Validates `options` and pairs them with a custom executor.
    pub fn with_executor(executor: E, options: ProbeOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { executor, options })
    }

    pub fn options(&self) -> &ProbeOptions {
        &self.options
    }

    /// Runs the probe without reporting individual attempts.
    pub async fn run(&self) -> Verdict {
        self.run_with(|_| {}).await
    }

    /// Runs the probe, handing every attempt's event to `observer` before
    /// deciding whether to continue.
    pub async fn run_with<F>(&self, mut observer: F) -> Verdict
    where
        F: FnMut(&AttemptEvent),
    {
        let options = &self.options;
        let mut last_reason = String::new();

        for attempt in 1..=options.max_attempts {
            let outcome = self
                .executor
                .execute(&options.url, options.timeout, &options.user_agent)
                .await;
            let result =
                AttemptResult::evaluate(outcome, options.expected_status, options.max_latency_ms);

            let event = AttemptEvent::new(attempt, options.max_attempts, &result);
            tracing::debug!(
                attempt,
                outcome = %event.outcome,
                status = ?event.status,
                latency_ms = ?event.latency_ms,
                "probe attempt finished"
            );
            observer(&event);

            match result {
                AttemptResult::Success(response) => {
                    return Verdict::Success {
                        response,
                        attempts: attempt,
                    };
                }
                failed => {
                    last_reason = failed.failure_reason().unwrap_or_default();
                }
            }

            if event.will_retry() {
                tracing::debug!(
                    delay_ms = options.retry_delay.as_millis() as u64,
                    "waiting before next attempt"
                );
                sleep(options.retry_delay).await;
            }
        }

        Verdict::Failure {
            reason: last_reason,
            attempts: options.max_attempts,
        }
    }
}
