//! Retry policy: which failures are retried and how long to wait in between.

use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

use super::error::FetchError;

/// Base delay before the first retry in milliseconds.
pub const BACKOFF_BASE_MS: u64 = 400;

/// Upper bound of the exponential part of the delay in milliseconds.
pub const BACKOFF_CAP_MS: u64 = 4_000;

/// Jitter is drawn uniformly from `[0, BACKOFF_JITTER_MS)`.
pub const BACKOFF_JITTER_MS: u64 = 150;

/// Returns true for 408, 429 and every 5xx (or higher) status.
pub fn is_retriable_status(status: StatusCode) -> bool {
    status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.as_u16() >= 500
}

/// Exponential backoff with additive jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base: Duration,
    pub cap: Duration,
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(BACKOFF_BASE_MS),
            cap: Duration::from_millis(BACKOFF_CAP_MS),
            jitter: Duration::from_millis(BACKOFF_JITTER_MS),
        }
    }
}

impl RetryPolicy {
    /// Delay before retrying after the zero-based `attempt`, with a fresh
    /// random jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            0
        } else {
            fastrand::u64(0..jitter_ms)
        };
        self.delay(attempt, jitter)
    }

    /// `min(cap, base * 2^attempt) + jitter_ms`.
    pub fn delay(&self, attempt: u32, jitter_ms: u64) -> Duration {
        let base_ms = self.base.as_millis() as u64;
        let cap_ms = self.cap.as_millis() as u64;
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let exponential = base_ms.saturating_mul(factor).min(cap_ms);
        Duration::from_millis(exponential.saturating_add(jitter_ms))
    }
}

/// Result of a single attempt, as seen by the retry loop.
#[derive(Debug)]
pub enum AttemptOutcome {
    Success(Value),
    Retriable(FetchError),
    Fatal(FetchError),
}

impl From<Result<Value, FetchError>> for AttemptOutcome {
    fn from(result: Result<Value, FetchError>) -> Self {
        match result {
            Ok(body) => AttemptOutcome::Success(body),
            Err(e) if e.is_retriable() => AttemptOutcome::Retriable(e),
            Err(e) => AttemptOutcome::Fatal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ApiError;
    use serde_json::json;

    #[test]
    fn test_retriable_statuses() {
        for code in [408, 429, 500, 501, 502, 503, 504, 599] {
            assert!(is_retriable_status(StatusCode::from_u16(code).unwrap()), "{}", code);
        }
        for code in [200, 204, 301, 400, 401, 403, 404, 407, 409, 428, 430] {
            assert!(!is_retriable_status(StatusCode::from_u16(code).unwrap()), "{}", code);
        }
    }

    #[test]
    fn test_delay_grows_exponentially_until_cap() {
        let policy = RetryPolicy::default();
        let expected = [400, 800, 1600, 3200, 4000, 4000];
        for (attempt, ms) in expected.iter().enumerate() {
            assert_eq!(policy.delay(attempt as u32, 0), Duration::from_millis(*ms));
        }
        assert_eq!(policy.delay(2, 149), Duration::from_millis(1749));
    }

    #[test]
    fn test_delay_does_not_overflow() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay(63, 0), Duration::from_millis(BACKOFF_CAP_MS));
        assert_eq!(policy.delay(64, 0), Duration::from_millis(BACKOFF_CAP_MS));
        assert_eq!(policy.delay(u32::MAX, 10), Duration::from_millis(BACKOFF_CAP_MS + 10));
    }

    #[test]
    fn test_backoff_stays_within_jitter_window() {
        let policy = RetryPolicy::default();
        for attempt in 0..8u32 {
            let floor = (BACKOFF_BASE_MS << attempt).min(BACKOFF_CAP_MS);
            for _ in 0..200 {
                let delay = policy.backoff(attempt).as_millis() as u64;
                assert!(delay >= floor, "attempt {}: {} < {}", attempt, delay, floor);
                assert!(
                    delay < floor + BACKOFF_JITTER_MS,
                    "attempt {}: {} >= {}",
                    attempt,
                    delay,
                    floor + BACKOFF_JITTER_MS
                );
            }
        }
    }

    #[test]
    fn test_backoff_without_jitter() {
        let policy = RetryPolicy {
            jitter: Duration::ZERO,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(800));
    }

    #[test]
    fn test_attempt_outcome_classification() {
        let outcome = AttemptOutcome::from(Ok(json!({"ok": true})));
        assert!(matches!(outcome, AttemptOutcome::Success(_)));

        let url = reqwest::Url::parse("https://www.moltbook.com/api/v1/x").unwrap();
        let retriable = ApiError::from_status(StatusCode::SERVICE_UNAVAILABLE, &url, Value::Null);
        let outcome = AttemptOutcome::from(Err(FetchError::Http(retriable)));
        assert!(matches!(outcome, AttemptOutcome::Retriable(_)));

        let fatal = ApiError::from_status(StatusCode::UNAUTHORIZED, &url, Value::Null);
        let outcome = AttemptOutcome::from(Err(FetchError::Http(fatal)));
        assert!(matches!(outcome, AttemptOutcome::Fatal(_)));
    }
}
