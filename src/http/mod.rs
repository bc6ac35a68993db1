//! Resilient JSON fetch client: per-attempt timeout, bounded retries with
//! exponential backoff, and a typed error taxonomy.

mod client;
mod error;
mod retry;

pub use client::{API_ORIGIN, API_PREFIX, ApiClient, FetchJson, FetchOptions, decode_body};
#[cfg(test)]
pub use client::MockFetchJson;
pub use error::{ApiError, FetchError, TransportErrorKind};
pub use retry::{
    AttemptOutcome, BACKOFF_BASE_MS, BACKOFF_CAP_MS, BACKOFF_JITTER_MS, RetryPolicy,
    is_retriable_status,
};
