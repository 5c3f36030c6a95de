//! Errors reported by the connect command.

use std::fmt;

#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded.
    Config { details: String },
    /// The configured service label names no known service.
    UnknownService { label: String },
    /// A configured field was rejected by the form.
    InvalidField { details: String },
    /// A file-path field could not be read.
    ReadFile { path: String, details: String },
    /// Required values are missing, so the form cannot be confirmed.
    Incomplete { missing: Vec<String> },
    /// The backend client could not be set up or listing failed.
    Backend { details: String },
    /// The connection attempt failed; `message` is what the dialog shows.
    ConnectFailed { message: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { details } => write!(f, "invalid configuration: {details}"),
            Self::UnknownService { label } => write!(f, "unknown service '{label}'"),
            Self::InvalidField { details } => write!(f, "invalid field: {details}"),
            Self::ReadFile { path, details } => {
                write!(f, "failed to read '{path}': {details}")
            }
            Self::Incomplete { missing } if missing.is_empty() => {
                write!(f, "connection name is required")
            }
            Self::Incomplete { missing } => {
                write!(f, "missing required fields: {}", missing.join(", "))
            }
            Self::Backend { details } => write!(f, "backend error: {details}"),
            Self::ConnectFailed { message } => f.write_str(message),
        }
    }
}

impl std::error::Error for CliError {}
