//! Verdict client: HTTP transport to the analysis service and the background
//! engine that runs requests off the UI thread.
mod client;
mod engine;
mod settings;
mod types;

pub use client::{execute, AnalysisService, ReqwestAnalysisClient, GENERIC_FAILURE};
pub use engine::EngineHandle;
pub use settings::{ClientSettings, API_BASE_ENV, DEFAULT_API_BASE};
pub use types::{AnalysisRequest, ClientError, EngineEvent, EngineStopped, Seq, TransportError, TransportErrorKind};
