use std::error::Error as _;
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::{header, Url};

use crate::{ExecuteError, HttpResponse, ProbeError, Result};

/// Issues a single probe request.
///
/// Implementations perform exactly one GET per call and never retry; the
/// retry controller owns that decision.
pub trait Execute {
    fn execute(
        &self,
        url: &Url,
        timeout: Duration,
        user_agent: &str,
    ) -> impl Future<Output = std::result::Result<HttpResponse, ExecuteError>> + Send;
}

/// [`Execute`] implementation backed by `reqwest`.
#[derive(Clone)]
pub struct HttpExecutor {
    http: reqwest::Client,
}

impl fmt::Debug for HttpExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpExecutor").finish_non_exhaustive()
    }
}

impl HttpExecutor {
    /// Creates an executor with a client that keeps no idle connections,
    /// so every attempt opens a fresh connection.
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .map_err(ProbeError::Client)?;
        Ok(Self { http })
    }

    /// Wraps an existing client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    async fn get(
        &self,
        url: &Url,
        timeout: Duration,
        user_agent: &str,
    ) -> std::result::Result<HttpResponse, ExecuteError> {
        let started = Instant::now();

        // The timeout spans connect, headers and body. When it fires the
        // request future is dropped, which closes the connection.
        let response = self
            .http
            .get(url.clone())
            .header(header::USER_AGENT, user_agent)
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| classify(err, timeout))?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|err| classify(err, timeout))?;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        Ok(HttpResponse {
            status,
            latency_ms,
            body,
            headers,
        })
    }
}

impl Execute for HttpExecutor {
    fn execute(
        &self,
        url: &Url,
        timeout: Duration,
        user_agent: &str,
    ) -> impl Future<Output = std::result::Result<HttpResponse, ExecuteError>> + Send {
        self.get(url, timeout, user_agent)
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> ExecuteError {
    if err.is_timeout() {
        ExecuteError::Timeout(timeout)
    } else if err.is_connect() {
        ExecuteError::Connection(error_chain(&err))
    } else {
        ExecuteError::Protocol(error_chain(&err))
    }
}

/// Joins an error with its sources, e.g.
/// `error sending request: client error (Connect): tcp connect error: Connection refused`.
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    message
}
