//! Error types for the integration crate.
//!
//! - `ParseServiceError`: a service label that names no known service
//! - `DialogError`: misuse of the connection form
//! - `ConnectorError`: failures of the backend connect/list calls
//!
//! Submission failures never surface as errors from the dialog controller;
//! they are turned into the `Failed` state instead.

use std::fmt;

/// A service label that does not name any known service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseServiceError {
    /// The label that failed to parse.
    pub label: String,
}

impl fmt::Display for ParseServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown service: '{}'", self.label)
    }
}

impl std::error::Error for ParseServiceError {}

/// Errors from editing the connection form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogError {
    /// The field is not part of the active service's configuration.
    UnknownField { service: String, key: String },
    /// The dialog was already closed.
    Closed,
    /// The operation is not allowed while a submission is in flight.
    SubmissionInFlight,
}

impl fmt::Display for DialogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField { service, key } => {
                write!(f, "{service} has no configuration field '{key}'")
            }
            Self::Closed => write!(f, "the connection dialog is closed"),
            Self::SubmissionInFlight => {
                write!(f, "a connection attempt is already in progress")
            }
        }
    }
}

impl std::error::Error for DialogError {}

/// Errors from the backend integration API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    /// The backend refused the connection; the reason is its own message.
    Rejected { reason: String },
    /// The request could not be sent or the response not read.
    Transport { reason: String },
    /// The backend answered with a body we could not decode.
    InvalidResponse { reason: String },
    /// The integration configuration could not be encoded for transport.
    InvalidRequest { reason: String },
}

impl ConnectorError {
    /// The human-readable cause shown to the user after the fixed
    /// "Unable to connect integration." phrase.
    #[must_use]
    pub fn cause(&self) -> &str {
        match self {
            Self::Rejected { reason }
            | Self::Transport { reason }
            | Self::InvalidResponse { reason }
            | Self::InvalidRequest { reason } => reason,
        }
    }
}

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { reason } => write!(f, "backend rejected the request: {reason}"),
            Self::Transport { reason } => write!(f, "request to backend failed: {reason}"),
            Self::InvalidResponse { reason } => {
                write!(f, "invalid response from backend: {reason}")
            }
            Self::InvalidRequest { reason } => write!(f, "invalid request: {reason}"),
        }
    }
}

impl std::error::Error for ConnectorError {}
