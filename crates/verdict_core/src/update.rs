use verdict_logging::{verdict_debug, verdict_info, verdict_warn};

use crate::{normalize, AnalysisError, Effect, Msg, RequestState, Seq, Submission};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: RequestState, msg: Msg) -> (RequestState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(value) => {
            // Edits stay live while loading; a late response never reverts them.
            state.set_active_input(value);
            Vec::new()
        }
        Msg::ModeChanged(mode) => {
            if state.is_loading() || state.input().mode == mode {
                return (state, Vec::new());
            }
            state.set_mode(mode);
            Vec::new()
        }
        Msg::SubmitClicked => {
            if state.is_loading() {
                verdict_debug!("submit ignored: request already in flight");
                return (state, Vec::new());
            }
            let Some(submission) = state.input().submission() else {
                verdict_debug!("submit ignored: {:?} field is empty", state.input().mode);
                return (state, Vec::new());
            };
            let seq = state.begin_loading(submission.clone());
            vec![match submission {
                Submission::Text(text) => Effect::SubmitText { seq, text },
                Submission::Url(url) => Effect::SubmitUrl { seq, url },
            }]
        }
        Msg::ClearClicked => {
            if let Some(seq) = state.in_flight() {
                verdict_info!("clear abandons in-flight request seq={}", seq);
            }
            state.clear();
            Vec::new()
        }
        Msg::AnalysisReceived { seq, payload } => {
            if !accepts(&state, seq) {
                return (state, Vec::new());
            }
            let outcome = normalize(&payload);
            if let Err(err) = &outcome {
                verdict_warn!("seq={} rejected: {} ({})", seq, err, err.kind);
            }
            state.finish(outcome);
            Vec::new()
        }
        Msg::AnalysisFailed { seq, message } => {
            if !accepts(&state, seq) {
                return (state, Vec::new());
            }
            verdict_warn!("seq={} transport failure: {}", seq, message);
            state.finish(Err(AnalysisError::transport(message)));
            Vec::new()
        }
    };

    (state, effects)
}

/// Only the completion for the request currently in flight may land.
fn accepts(state: &RequestState, seq: Seq) -> bool {
    let current = state.in_flight();
    if current != Some(seq) {
        verdict_debug!("discarding stale completion seq={} (in flight: {:?})", seq, current);
        return false;
    }
    true
}
