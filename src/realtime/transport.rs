//! HTTP transport for query submission with retry and exponential backoff.

use crate::config::Config;
use crate::realtime::error::{ClientError, TransportCause};
use crate::realtime::models::{Credentials, RawResponse};
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, warn};
use wreq::Client;

/// Endpoint path for realtime query submission.
const QUERIES_PATH: &str = "/v1/queries";

/// Upper bound on a single backoff delay.
const BACKOFF_CAP: Duration = Duration::from_secs(30);

/// Trait for the HTTP exchange - enables mocking for tests.
#[async_trait]
pub trait QueryTransport: Send + Sync {
    /// Performs the POST exchange for an already-serialized payload,
    /// retrying transient failures. Returns the terminal response.
    async fn send(&self, payload: &str, creds: &Credentials) -> Result<RawResponse, ClientError>;
}

#[async_trait]
impl<T: QueryTransport + ?Sized> QueryTransport for std::sync::Arc<T> {
    async fn send(&self, payload: &str, creds: &Credentials) -> Result<RawResponse, ClientError> {
        (**self).send(payload, creds).await
    }
}

/// One attempt's triage before the retry decision.
enum Outcome {
    /// Terminal response, hand to the decoder (2xx and non-retryable 4xx).
    Done(RawResponse),
    /// Credentials rejected, never retried.
    Auth(u16),
    /// 429 or 5xx, eligible for retry.
    Retryable(u16),
}

/// Transport backed by a pooled [`wreq::Client`].
///
/// The pool is safe for concurrent reuse; retries within one `send` are
/// strictly sequential so backoff never amplifies load on the remote.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    max_retries: u32,
    backoff_base: Duration,
    jitter: bool,
}

impl HttpTransport {
    /// Creates a transport from the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            backoff_base: Duration::from_millis(config.backoff_base_ms),
            jitter: config.backoff_jitter,
        })
    }

    /// Issues a single POST and triages the result.
    async fn attempt(
        &self,
        url: &str,
        payload: &str,
        creds: &Credentials,
    ) -> Result<Outcome, wreq::Error> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("Authorization", creds.header_value())
            .body(payload.to_string())
            .send()
            .await?;

        let status = response.status().as_u16();
        debug!("Response status: {}", status);

        match status {
            401 | 403 => Ok(Outcome::Auth(status)),
            429 | 500..=599 => Ok(Outcome::Retryable(status)),
            _ => {
                let body = response.text().await?;
                Ok(Outcome::Done(RawResponse { status, body }))
            }
        }
    }

    /// Returns the delay before the next attempt once `completed` attempts
    /// have failed: `backoff_base * 2^(completed-1)`, capped, with optional
    /// upward jitter of at most 25%.
    ///
    /// Jitter only stretches a delay, so the schedule stays strictly
    /// increasing until the cap.
    fn backoff_delay(&self, completed: u32) -> Duration {
        let exponent = completed.saturating_sub(1).min(16);
        let delay = self.backoff_base.saturating_mul(1u32 << exponent).min(BACKOFF_CAP);

        if self.jitter {
            delay + delay.mul_f64(rand::rng().random_range(0.0..0.25))
        } else {
            delay
        }
    }
}

#[async_trait]
impl QueryTransport for HttpTransport {
    async fn send(&self, payload: &str, creds: &Credentials) -> Result<RawResponse, ClientError> {
        let url = format!("{}{}", self.base_url, QUERIES_PATH);
        let total_attempts = self.max_retries.saturating_add(1);
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            debug!("POST {} (attempt {}/{})", url, attempt, total_attempts);

            let cause = match self.attempt(&url, payload, creds).await {
                Ok(Outcome::Done(raw)) => return Ok(raw),
                Ok(Outcome::Auth(status)) => {
                    warn!("Authentication rejected with status {}", status);
                    return Err(ClientError::Auth(status));
                }
                Ok(Outcome::Retryable(status)) => TransportCause::Status(status),
                Err(e) => TransportCause::Connection(e),
            };

            if attempt >= total_attempts {
                return Err(ClientError::Transport { attempts: attempt, cause });
            }

            let delay = self.backoff_delay(attempt);
            warn!(
                "Attempt {}/{} failed ({}), retrying in {:?}",
                attempt, total_attempts, cause, delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}
