//! Error taxonomy for backend calls
//!
//! Transport failures (timeouts, non-2xx statuses, connection problems) and
//! body parse failures are kept apart so callers can decide whether a
//! fallback dataset may stand in for the missing data.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Category of a transport-level failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The call exceeded its deadline
    Timeout,
    /// The backend answered with a non-2xx status
    HttpStatus(u16),
    /// No connection could be established (DNS, refused, reset, TLS)
    NetworkFailure,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::HttpStatus(code) => write!(f, "HTTP {}", code),
            Self::NetworkFailure => write!(f, "network failure"),
        }
    }
}

/// A failed network call against one endpoint
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind} calling {endpoint}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub endpoint: String,
    pub message: String,
}

impl TransportError {
    pub fn timeout(endpoint: impl Into<String>, after: Duration) -> Self {
        Self {
            kind: TransportErrorKind::Timeout,
            endpoint: endpoint.into(),
            message: format!("no response within {}ms", after.as_millis()),
        }
    }

    pub fn http_status(endpoint: impl Into<String>, code: u16, body: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::HttpStatus(code),
            endpoint: endpoint.into(),
            message: body.into(),
        }
    }

    pub fn network(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::NetworkFailure,
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// HTTP status code, if the backend answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self.kind {
            TransportErrorKind::HttpStatus(code) => Some(code),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }
}

/// The response body matched neither the envelope nor the bare array shape
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unexpected response body from {endpoint}: {message}")]
pub struct ParseError {
    pub endpoint: String,
    pub message: String,
}

impl ParseError {
    pub fn new(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }
}

/// Any failure produced by the query and mutation layers
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A newer query was issued on the same list before this one completed
    #[error("query superseded by a newer request")]
    Superseded,
}

impl ApiError {
    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}
