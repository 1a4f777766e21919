//! Request Executor
//!
//! Issues planned requests against the upstream API, classifies failures by
//! HTTP status category, and retries transient failures with linear backoff.

use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::future::retry_notify;
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::client::request::{Method, RequestDescriptor};
use crate::config::Config;
use crate::error::{NeonError, Result};

const USER_AGENT: &str = concat!("neon_gateway/", env!("CARGO_PKG_VERSION"));

// == Retry Policy ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Wait before the attempt following attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    fn backoff(&self) -> LinearBackoff {
        LinearBackoff {
            policy: *self,
            attempt: 0,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Waits `base * n` after the n-th failed attempt and stops once
/// `max_attempts` attempts have been made.
#[derive(Debug, Clone)]
struct LinearBackoff {
    policy: RetryPolicy,
    attempt: u32,
}

impl Backoff for LinearBackoff {
    fn reset(&mut self) {
        self.attempt = 0;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        self.attempt += 1;
        (self.attempt < self.policy.max_attempts.max(1)).then(|| self.policy.delay_for(self.attempt))
    }
}

/// Upstream success wrapper.
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Upstream failure body, either flat or nested under `error`.
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
    error: Option<Box<ErrorBody>>,
}

impl ErrorBody {
    fn into_detail(self) -> Option<String> {
        self.detail.or_else(|| self.error.and_then(|e| e.into_detail()))
    }
}

/// Headers and body of a successful response.
#[derive(Debug)]
struct Fetched {
    headers: HeaderMap,
    body: Vec<u8>,
}

// == Request Executor ==
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    http: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl RequestExecutor {
    pub fn new(base_url: impl Into<String>, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| NeonError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            config.request_timeout(),
            RetryPolicy {
                max_attempts: config.retry_attempts,
                base_delay: config.backoff_base(),
            },
        )
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Resolves an endpoint against the base URL; absolute URLs pass through.
    pub fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
        }
    }

    // == Execute ==
    /// Performs the request and decodes the `data` field of the response.
    pub async fn execute<T: DeserializeOwned>(&self, request: &RequestDescriptor) -> Result<T> {
        let fetched = self.send_with_retry(request).await?;

        serde_json::from_slice::<Envelope<T>>(&fetched.body)
            .map(|envelope| envelope.data)
            .map_err(|e| NeonError::Decode(format!("{} {}: {}", request.method, request.endpoint, e)))
    }

    /// Performs the request and returns only the response headers.
    pub async fn probe(&self, request: &RequestDescriptor) -> Result<HeaderMap> {
        self.send_with_retry(request).await.map(|fetched| fetched.headers)
    }

    // == Retry Loop ==
    async fn send_with_retry(&self, request: &RequestDescriptor) -> Result<Fetched> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;

        let operation = move || async move {
            self.send_once(request).await.map_err(|err| {
                if err.is_transient() {
                    backoff::Error::transient(err)
                } else {
                    backoff::Error::permanent(err)
                }
            })
        };
        let notify = |err: NeonError, delay: Duration| {
            attempt += 1;
            warn!(
                "{} {} failed, retrying in {:?} (attempt {}/{}): {}",
                request.method, request.endpoint, delay, attempt, max_attempts, err
            );
        };

        match retry_notify(self.retry.backoff(), operation, notify).await {
            Ok(fetched) => Ok(fetched),
            Err(err) if err.is_transient() => {
                warn!(endpoint = %request.endpoint, attempts = max_attempts, "giving up: {}", err);
                Err(NeonError::ExhaustedRetries {
                    attempts: max_attempts,
                    last: Box::new(err),
                })
            }
            Err(err) => {
                debug!(endpoint = %request.endpoint, "not retrying: {}", err);
                Err(err)
            }
        }
    }

    async fn send_once(&self, request: &RequestDescriptor) -> Result<Fetched> {
        let url = self.url_for(&request.endpoint);
        let mut builder = self.http.request(request.method.into(), url.as_str());

        builder = match (&request.method, &request.body) {
            (Method::Post, Some(body)) => builder.json(body),
            _ if !request.params.is_empty() => builder.query(request.params.as_slice()),
            _ => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| NeonError::Transient(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| NeonError::Transient(format!("reading body from {} failed: {}", url, e)))?
            .to_vec();

        if status.is_success() {
            return Ok(Fetched { headers, body });
        }

        let detail = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_detail)
            .or_else(|| {
                let text = String::from_utf8_lossy(&body).trim().to_string();
                (!text.is_empty()).then_some(text)
            })
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown status").to_string());

        if status.is_client_error() {
            Err(NeonError::Client {
                status: status.as_u16(),
                detail,
            })
        } else {
            Err(NeonError::Transient(format!("HTTP {}: {}", status.as_u16(), detail)))
        }
    }
}
