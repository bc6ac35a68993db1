//! Environment-derived defaults for the fetch client.

use log::debug;
use std::time::Duration;

use crate::runtime::Runtime;

pub const TIMEOUT_ENV: &str = "MOLTBOOK_TIMEOUT_MS";
pub const RETRIES_ENV: &str = "MOLTBOOK_RETRIES";

pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_RETRIES: u32 = 2;

/// Timeout and retry count used when a call does not set its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchDefaults {
    pub timeout: Duration,
    pub max_retries: u32,
}

impl Default for FetchDefaults {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_retries: DEFAULT_RETRIES,
        }
    }
}

impl FetchDefaults {
    /// Reads `MOLTBOOK_TIMEOUT_MS` and `MOLTBOOK_RETRIES`, falling back to the
    /// built-in defaults for missing or unusable values.
    #[tracing::instrument(skip(runtime))]
    pub fn from_runtime<R: Runtime>(runtime: &R) -> Self {
        let timeout_ms = read_env_int(runtime, TIMEOUT_ENV)
            .filter(|ms| *ms > 0)
            .and_then(|ms| u64::try_from(ms).ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        let max_retries = read_env_int(runtime, RETRIES_ENV)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(DEFAULT_RETRIES);

        debug!(
            "Fetch defaults: timeout={}ms, max_retries={}",
            timeout_ms, max_retries
        );

        Self {
            timeout: Duration::from_millis(timeout_ms),
            max_retries,
        }
    }
}

fn read_env_int<R: Runtime>(runtime: &R, key: &str) -> Option<i64> {
    runtime
        .env_var(key)
        .ok()
        .and_then(|raw| parse_int_prefix(&raw))
}

/// Parses the leading integer of `raw`, ignoring anything after the digits.
///
/// `"15000"` and `"15000ms"` both yield 15000; `"abc"` yields `None`.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}
