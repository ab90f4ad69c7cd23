use std::fmt;

/// Per-submission tag, matching the core's sequence numbers.
pub type Seq = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    PredictText(String),
    PredictUrl(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Completed {
        seq: Seq,
        result: Result<serde_json::Value, TransportError>,
    },
}

/// The engine thread is gone; nothing submitted to it will complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("analysis engine stopped")]
pub struct EngineStopped;

/// A failed call. `message` is human readable and safe to show as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            TransportErrorKind::Timeout => write!(f, "timeout"),
            TransportErrorKind::Network => write!(f, "network error"),
            TransportErrorKind::Decode => write!(f, "undecodable response"),
        }
    }
}

/// Setup failures, raised before any request is made.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid api base url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported api base url {0:?}: expected http or https")]
    UnsupportedScheme(String),
    #[error("failed to build http client: {0}")]
    Http(String),
    #[error("failed to start engine: {0}")]
    Runtime(#[from] std::io::Error),
}
