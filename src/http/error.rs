//! Error taxonomy for the fetch client.

use reqwest::{StatusCode, Url};
use serde_json::Value;
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::time::Duration;

use super::retry::is_retriable_status;

/// Failure of an HTTP request that did produce a response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub message: String,
    pub status: Option<u16>,
    /// Response body, JSON-decoded when possible, otherwise the raw text.
    pub body: Option<Value>,
}

impl ApiError {
    /// Builds the error for a non-2xx `status` returned by `url`.
    pub fn from_status(status: StatusCode, url: &Url, body: Value) -> Self {
        let message = match status.canonical_reason() {
            Some(reason) => format!("HTTP {} {} for {}", status.as_u16(), reason, url),
            None => format!("HTTP {} for {}", status.as_u16(), url),
        };

        Self {
            message,
            status: Some(status.as_u16()),
            body: (!body.is_null()).then_some(body),
        }
    }

    pub fn is_retriable(&self) -> bool {
        self.status
            .and_then(|s| StatusCode::from_u16(s).ok())
            .is_some_and(is_retriable_status)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for ApiError {}

/// Structured kinds of transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The transport itself reported a timeout.
    TimedOut,
    /// Connection could not be established (refused, DNS failure).
    Connect,
    /// Connection dropped mid-exchange (reset, aborted, broken pipe, EOF).
    ConnectionReset,
    /// Generic failure while sending the request or reading the body.
    Network,
    /// Request could not be built.
    Builder,
    /// Redirect policy violation.
    Redirect,
    /// Body could not be decoded as text.
    Decode,
    Other,
}

impl TransportErrorKind {
    pub fn classify(error: &reqwest::Error) -> Self {
        if error.is_builder() {
            return Self::Builder;
        }
        if error.is_timeout() {
            return Self::TimedOut;
        }
        if let Some(kind) = io_error_kind(error) {
            match kind {
                io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::BrokenPipe
                | io::ErrorKind::UnexpectedEof => return Self::ConnectionReset,
                io::ErrorKind::TimedOut => return Self::TimedOut,
                io::ErrorKind::ConnectionRefused => return Self::Connect,
                _ => {}
            }
        }
        if error.is_connect() {
            return Self::Connect;
        }
        if error.is_redirect() {
            return Self::Redirect;
        }
        if error.is_decode() {
            return Self::Decode;
        }
        if error.is_request() || error.is_body() {
            return Self::Network;
        }
        Self::Other
    }

    pub fn is_retriable(self) -> bool {
        matches!(
            self,
            Self::TimedOut | Self::Connect | Self::ConnectionReset | Self::Network
        )
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::TimedOut => "connection timed out",
            Self::Connect => "could not connect",
            Self::ConnectionReset => "connection reset",
            Self::Network => "network error",
            Self::Builder => "could not build request",
            Self::Redirect => "redirect error",
            Self::Decode => "could not decode response body",
            Self::Other => "unexpected error",
        };
        f.write_str(text)
    }
}

/// First `io::Error` in the source chain of `error`, if any.
fn io_error_kind(error: &reqwest::Error) -> Option<io::ErrorKind> {
    let mut source = error.source();
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = err.source();
    }
    None
}

/// Every way a fetch can fail.
#[derive(Debug)]
pub enum FetchError {
    /// Non-2xx response.
    Http(ApiError),
    /// The attempt did not finish within its timeout.
    Timeout { url: Url, timeout: Duration },
    /// The request failed before a response was received.
    Transport {
        kind: TransportErrorKind,
        source: reqwest::Error,
    },
    /// The request could not be formed.
    InvalidRequest(String),
}

impl FetchError {
    pub fn transport(source: reqwest::Error) -> Self {
        Self::Transport {
            kind: TransportErrorKind::classify(&source),
            source,
        }
    }

    pub fn is_retriable(&self) -> bool {
        match self {
            FetchError::Http(err) => err.is_retriable(),
            FetchError::Timeout { .. } => true,
            FetchError::Transport { kind, .. } => kind.is_retriable(),
            FetchError::InvalidRequest(_) => false,
        }
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http(err) => err.status,
            _ => None,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Http(err) => write!(f, "{}", err),
            FetchError::Timeout { url, timeout } => {
                write!(
                    f,
                    "Request to {} timed out after {}ms",
                    url,
                    timeout.as_millis()
                )
            }
            FetchError::Transport { kind, .. } => write!(f, "Transport error: {}", kind),
            FetchError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
        }
    }
}

impl StdError for FetchError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            // Display already is the API error's message.
            FetchError::Http(err) => err.source(),
            FetchError::Transport { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ApiError> for FetchError {
    fn from(err: ApiError) -> Self {
        FetchError::Http(err)
    }
}
