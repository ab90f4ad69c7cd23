use std::fmt;

/// Where an analysis failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure or non-2xx HTTP status.
    Transport,
    /// A 2xx response whose body declares `error`.
    ServiceReported,
    /// A 2xx response missing required fields or with out-of-range values.
    MalformedResponse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::ServiceReported => write!(f, "service reported error"),
            ErrorKind::MalformedResponse => write!(f, "malformed response"),
        }
    }
}

/// A failed analysis attempt. `message` is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AnalysisError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AnalysisError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    pub fn service_reported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceReported, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedResponse, message)
    }
}
