//! Verdict core: pure request state machine, response normalization and
//! view-model derivation.
mod effect;
mod error;
mod msg;
mod normalize;
mod present;
mod result;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::{AnalysisError, ErrorKind};
pub use msg::Msg;
pub use normalize::{normalize, normalize_insights};
pub use present::{
    clean_red_flag, progress_percent, truncate_text, verdict_band, ResultView, Tone,
    TruncatedText, VerdictBand, ELLIPSIS, PREVIEW_CHARS,
};
pub use result::{AnalysisInsights, AnalysisResult, SourceLink};
pub use state::{AnalysisMode, Phase, RequestState, Seq, Submission, SubmissionInput};
pub use update::update;
pub use view_model::{AppViewModel, PhaseLabel};
