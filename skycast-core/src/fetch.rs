use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

use crate::config::{ATTEMPT_BUDGET, REQUEST_TIMEOUT, RETRY_DELAY};
use crate::error::WeatherError;

/// Fixed-delay retry settings. The delay is flat between attempts, not
/// exponential, and the budget counts the first try.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: ATTEMPT_BUDGET,
            delay: RETRY_DELAY,
        }
    }
}

/// Maps a non-success status onto the pipeline error taxonomy.
pub fn classify_status(status: StatusCode) -> WeatherError {
    match status.as_u16() {
        401 | 403 => WeatherError::InvalidCredential(status.as_u16()),
        404 => WeatherError::NotFound,
        429 => WeatherError::RateLimited,
        s if s >= 500 => WeatherError::ServiceUnavailable(s),
        s => WeatherError::Http(s),
    }
}

fn classify_transport(err: &reqwest::Error) -> WeatherError {
    if err.is_timeout() {
        WeatherError::Timeout
    } else {
        WeatherError::Network(err.to_string())
    }
}

/// HTTP executor with per-attempt timeout and a bounded retry loop.
///
/// The shared [`Client`] is cheap to clone and safe to use from
/// concurrent tasks fetching different URLs.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    policy: RetryPolicy,
}

impl FetchClient {
    pub fn new(timeout: Duration, policy: RetryPolicy) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, policy })
    }

    pub fn with_defaults() -> Result<Self, WeatherError> {
        Self::new(REQUEST_TIMEOUT, RetryPolicy::default())
    }

    /// Executes a GET and returns the response body.
    ///
    /// Transient failures (5xx, timeout, transport) are retried with the
    /// policy's fixed delay while attempts remain. Credential, not-found
    /// and rate-limit classifications surface immediately.
    pub async fn get_text(&self, url: &Url) -> Result<String, WeatherError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!(%url, attempt, "requesting");

            match self.execute(url).await {
                Ok(body) => return Ok(body),
                Err(err) if err.is_retryable() && attempt < self.policy.attempts => {
                    warn!(%url, attempt, error = %err, "transient failure, retrying");
                    tokio::time::sleep(self.policy.delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn execute(&self, url: &Url) -> Result<String, WeatherError> {
        let res = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        let status = res.status();
        if !status.is_success() {
            return Err(classify_status(status));
        }

        res.text().await.map_err(|e| classify_transport(&e))
    }
}
