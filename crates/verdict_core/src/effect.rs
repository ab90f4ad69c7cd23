use crate::Seq;

/// Side effects requested by [`crate::update`]; executed by the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitText { seq: Seq, text: String },
    SubmitUrl { seq: Seq, url: String },
}

impl Effect {
    pub fn seq(&self) -> Seq {
        match self {
            Effect::SubmitText { seq, .. } | Effect::SubmitUrl { seq, .. } => *seq,
        }
    }
}
