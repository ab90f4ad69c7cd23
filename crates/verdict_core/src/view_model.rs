use crate::{AnalysisMode, AnalysisResult, Phase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhaseLabel {
    #[default]
    Idle,
    Loading,
    Success,
    Failure,
}

impl From<&Phase> for PhaseLabel {
    fn from(phase: &Phase) -> Self {
        match phase {
            Phase::Idle => PhaseLabel::Idle,
            Phase::Loading { .. } => PhaseLabel::Loading,
            Phase::Success(_) => PhaseLabel::Success,
            Phase::Failure(_) => PhaseLabel::Failure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub mode: AnalysisMode,
    pub text: String,
    pub url: String,
    pub phase: PhaseLabel,
    pub can_submit: bool,
    pub error: Option<String>,
    pub result: Option<AnalysisResult>,
}
