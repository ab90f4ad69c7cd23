use verdict_logging::verdict_debug;

use crate::view_model::{AppViewModel, PhaseLabel};
use crate::{AnalysisError, AnalysisResult};

/// Per-submission tag used to discard completions that arrive too late.
pub type Seq = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    #[default]
    Text,
    Url,
}

/// Staged user input. Both fields survive mode switches; only the active one
/// is ever sent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionInput {
    pub mode: AnalysisMode,
    pub text: String,
    pub url: String,
}

impl SubmissionInput {
    pub fn active_field(&self) -> &str {
        match self.mode {
            AnalysisMode::Text => &self.text,
            AnalysisMode::Url => &self.url,
        }
    }

    fn active_field_mut(&mut self) -> &mut String {
        match self.mode {
            AnalysisMode::Text => &mut self.text,
            AnalysisMode::Url => &mut self.url,
        }
    }

    /// The payload that would be sent right now, or `None` when the active
    /// field is blank.
    pub fn submission(&self) -> Option<Submission> {
        let value = self.active_field().trim();
        if value.is_empty() {
            return None;
        }
        Some(match self.mode {
            AnalysisMode::Text => Submission::Text(value.to_string()),
            AnalysisMode::Url => Submission::Url(value.to_string()),
        })
    }
}

/// Snapshot of what was actually sent for an in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Text(String),
    Url(String),
}

impl Submission {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            Submission::Text(_) => AnalysisMode::Text,
            Submission::Url(_) => AnalysisMode::Url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading {
        seq: Seq,
        submission: Submission,
    },
    Success(AnalysisResult),
    Failure(AnalysisError),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestState {
    input: SubmissionInput,
    phase: Phase,
    last_seq: Seq,
    dirty: bool,
}

impl RequestState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            mode: self.input.mode,
            text: self.input.text.clone(),
            url: self.input.url.clone(),
            phase: PhaseLabel::from(&self.phase),
            can_submit: !self.is_loading() && self.input.submission().is_some(),
            error: self.error().map(|err| err.message.clone()),
            result: self.result().cloned(),
        }
    }

    pub fn input(&self) -> &SubmissionInput {
        &self.input
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.phase {
            Phase::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match &self.phase {
            Phase::Failure(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    /// Sequence of the request currently in flight, if any.
    pub fn in_flight(&self) -> Option<Seq> {
        match self.phase {
            Phase::Loading { seq, .. } => Some(seq),
            _ => None,
        }
    }

    /// Returns whether the state changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_active_input(&mut self, value: String) {
        let field = self.input.active_field_mut();
        if *field != value {
            *field = value;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_mode(&mut self, mode: AnalysisMode) {
        verdict_debug!("mode {:?} -> {:?}", self.input.mode, mode);
        self.input.mode = mode;
        self.phase = Phase::Idle;
        self.mark_dirty();
    }

    /// Moves to `Loading` with a fresh sequence number and returns it.
    pub(crate) fn begin_loading(&mut self, submission: Submission) -> Seq {
        self.last_seq += 1;
        let seq = self.last_seq;
        verdict_debug!("submission seq={} mode={:?}", seq, submission.mode());
        self.phase = Phase::Loading { seq, submission };
        self.mark_dirty();
        seq
    }

    pub(crate) fn finish(&mut self, outcome: Result<AnalysisResult, AnalysisError>) {
        self.phase = match outcome {
            Ok(result) => Phase::Success(result),
            Err(err) => Phase::Failure(err),
        };
        self.mark_dirty();
    }

    pub(crate) fn clear(&mut self) {
        self.input.text.clear();
        self.input.url.clear();
        self.phase = Phase::Idle;
        self.mark_dirty();
    }
}
