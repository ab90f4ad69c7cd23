#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the input box of the active mode.
    InputChanged(String),
    /// User picked the text or URL tab.
    ModeChanged(crate::AnalysisMode),
    /// User asked to run the analysis on the staged input.
    SubmitClicked,
    /// User clicked Clear.
    ClearClicked,
    /// Transport returned a 2xx payload for a submission.
    AnalysisReceived {
        seq: crate::Seq,
        payload: serde_json::Value,
    },
    /// Transport failed for a submission.
    AnalysisFailed { seq: crate::Seq, message: String },
}
