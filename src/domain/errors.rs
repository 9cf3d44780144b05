//! Failure descriptions handed back to the caller instead of a response.

use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Classifies why a send produced no response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// The request was malformed; nothing was sent.
    InvalidUrl,
    /// DNS, connect, TLS or HTTP protocol failure.
    NetworkFailure,
    /// The configured deadline passed before the response was complete.
    Timeout,
    /// The caller cancelled the request.
    Aborted,
    /// A transport failure that fits none of the other kinds.
    UnknownTransportError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidUrl => "InvalidUrl",
            ErrorKind::NetworkFailure => "NetworkFailure",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::Aborted => "Aborted",
            ErrorKind::UnknownTransportError => "UnknownTransportError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed send, as delivered to the caller.
///
/// Exactly one of this or a `ResponseDescription` is produced per send.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind}: {message}")]
pub struct ErrorDescription {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorDescription {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidUrl, message)
    }

    pub fn network_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkFailure, message)
    }

    pub fn timeout(limit: Duration) -> Self {
        Self::new(
            ErrorKind::Timeout,
            format!("Request did not complete within {}ms", limit.as_millis()),
        )
    }

    pub fn aborted() -> Self {
        Self::new(ErrorKind::Aborted, "Request was cancelled")
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownTransportError, message)
    }
}
