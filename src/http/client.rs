//! JSON fetch client with per-attempt timeout and bounded retries.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;

use super::error::{ApiError, FetchError};
use super::retry::{AttemptOutcome, RetryPolicy};
use crate::settings::FetchDefaults;

pub const API_ORIGIN: &str = "https://www.moltbook.com";
pub const API_PREFIX: &str = "api/v1/";

/// Per-call request options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub api_key: String,
    /// Overrides the client's default per-attempt timeout.
    pub timeout: Option<Duration>,
    /// Overrides the client's default retry count.
    pub max_retries: Option<u32>,
}

impl FetchOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            timeout: None,
            max_retries: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FetchJson: Send + Sync {
    /// GETs `path` relative to the API base and returns the decoded body.
    async fn fetch_json(&self, path: &str, options: &FetchOptions) -> Result<Value, FetchError>;
}

/// HTTP client for the Moltbook API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    defaults: FetchDefaults,
    retry_policy: RetryPolicy,
}

impl ApiClient {
    /// Creates a client for `origin` (defaults to [`API_ORIGIN`]).
    #[tracing::instrument(skip(client, defaults))]
    pub fn new(client: Client, origin: Option<&str>, defaults: FetchDefaults) -> Result<Self> {
        let origin = origin.unwrap_or(API_ORIGIN);
        let base_url = Url::parse(&format!("{}/{}", origin.trim_end_matches('/'), API_PREFIX))
            .with_context(|| format!("Invalid API URL: {}", origin))?;

        Ok(Self {
            client,
            base_url,
            defaults,
            retry_policy: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` against the API base. Leading `/` are ignored.
    pub fn resolve(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| FetchError::InvalidRequest(format!("cannot resolve path {:?}: {}", path, e)))
    }

    #[tracing::instrument(skip(self, options))]
    pub async fn get_json(&self, path: &str, options: &FetchOptions) -> Result<Value, FetchError> {
        let url = self.resolve(path)?;
        let auth = bearer(&options.api_key)?;
        let timeout = options.timeout.unwrap_or(self.defaults.timeout);
        let max_retries = options.max_retries.unwrap_or(self.defaults.max_retries);

        let mut attempt: u32 = 0;
        loop {
            debug!(
                "GET {} (attempt {}/{})",
                url,
                attempt.saturating_add(1),
                max_retries.saturating_add(1)
            );

            let error = match self.attempt(&url, &auth, timeout).await {
                AttemptOutcome::Success(body) => return Ok(body),
                AttemptOutcome::Fatal(e) => {
                    debug!("GET {}: non-retriable error: {}", url, e);
                    return Err(e);
                }
                AttemptOutcome::Retriable(e) => e,
            };

            if attempt >= max_retries {
                debug!(
                    "GET {}: giving up after {} attempts",
                    url,
                    attempt.saturating_add(1)
                );
                return Err(error);
            }

            let delay = self.retry_policy.backoff(attempt);
            debug!(
                "GET {}: attempt {} failed ({}), retrying in {}ms...",
                url,
                attempt.saturating_add(1),
                error,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// One request/response cycle bounded by `timeout`. The timer is dropped
    /// together with the attempt future on every exit path.
    async fn attempt(&self, url: &Url, auth: &HeaderValue, timeout: Duration) -> AttemptOutcome {
        let request = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, auth.clone());

        let result = match tokio::time::timeout(timeout, send_once(request, url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url: url.clone(),
                timeout,
            }),
        };

        AttemptOutcome::from(result)
    }
}

#[async_trait]
impl FetchJson for ApiClient {
    async fn fetch_json(&self, path: &str, options: &FetchOptions) -> Result<Value, FetchError> {
        self.get_json(path, options).await
    }
}

async fn send_once(request: reqwest::RequestBuilder, url: &Url) -> Result<Value, FetchError> {
    let response = request.send().await.map_err(FetchError::transport)?;
    let status = response.status();
    let text = response.text().await.map_err(FetchError::transport)?;
    let body = decode_body(&text);

    if status.is_success() {
        Ok(body)
    } else {
        Err(ApiError::from_status(status, url, body).into())
    }
}

/// Empty text decodes to `null`; text that is not JSON is kept as a string.
pub fn decode_body(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn bearer(api_key: &str) -> Result<HeaderValue, FetchError> {
    if api_key.trim().is_empty() {
        return Err(FetchError::InvalidRequest("API key is empty".to_string()));
    }
    let mut value = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|_| {
        FetchError::InvalidRequest("API key contains characters not allowed in a header".to_string())
    })?;
    value.set_sensitive(true);
    Ok(value)
}
