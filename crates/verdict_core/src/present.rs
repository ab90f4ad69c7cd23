//! Display derivations computed from a normalized result on every render.

use crate::{AnalysisInsights, AnalysisResult, SourceLink};

/// Characters of article text shown before the "Read more" affordance.
pub const PREVIEW_CHARS: usize = 350;
pub const ELLIPSIS: &str = "...";

/// Leading glyphs the service decorates red flags with. Longer sequences first
/// so the emoji variation selector goes with its base glyph.
const RED_FLAG_MARKERS: &[&str] = &["\u{26a0}\u{fe0f}", "\u{26a0}", "\u{1f6a8}", "\u{1f9fe}", "\u{274c}"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictBand {
    Positive,
    Negative,
    Neutral,
}

/// Color family used for the verdict banner and the score bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Red,
    Blue,
}

impl VerdictBand {
    pub fn tone(self) -> Tone {
        match self {
            VerdictBand::Positive => Tone::Green,
            VerdictBand::Negative => Tone::Red,
            VerdictBand::Neutral => Tone::Blue,
        }
    }
}

/// Substring match, case-insensitive, so "Likely Real" still bands positive.
pub fn verdict_band(label: &str) -> VerdictBand {
    let label = label.to_lowercase();
    if label.contains("real") {
        VerdictBand::Positive
    } else if label.contains("fake") {
        VerdictBand::Negative
    } else {
        VerdictBand::Neutral
    }
}

/// Bar width in percent for a combined score.
pub fn progress_percent(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncatedText {
    pub text: String,
    /// True when the text exceeds the preview length, whether or not it is
    /// currently expanded.
    pub can_expand: bool,
}

pub fn truncate_text(text: &str, expanded: bool) -> TruncatedText {
    let cut = text.char_indices().nth(PREVIEW_CHARS).map(|(idx, _)| idx);
    match cut {
        Some(idx) if !expanded => TruncatedText {
            text: format!("{}{ELLIPSIS}", &text[..idx]),
            can_expand: true,
        },
        Some(_) => TruncatedText {
            text: text.to_string(),
            can_expand: true,
        },
        None => TruncatedText {
            text: text.to_string(),
            can_expand: false,
        },
    }
}

/// Strip known decorative markers from the front of a red flag. Anything else
/// is returned as-is.
pub fn clean_red_flag(flag: &str) -> &str {
    let mut rest = flag;
    let mut stripped = false;
    loop {
        let trimmed = if stripped { rest.trim_start() } else { rest };
        match RED_FLAG_MARKERS
            .iter()
            .find_map(|marker| trimmed.strip_prefix(marker))
        {
            Some(after) => {
                rest = after;
                stripped = true;
            }
            None => break,
        }
    }
    if stripped {
        rest.trim_start()
    } else {
        flag
    }
}

/// Everything a renderer needs for one result, derived in a single pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub final_label: String,
    pub band: VerdictBand,
    pub tone: Tone,
    pub ml_label: String,
    pub ml_confidence: f64,
    pub web_similarity: f64,
    pub combined_score: f64,
    pub progress_percent: f64,
    pub headline: Option<String>,
    pub article: Option<TruncatedText>,
    pub web_verification_status: Option<String>,
    pub sources: Vec<SourceLink>,
    pub sentiment: Option<String>,
    pub red_flags: Vec<String>,
}

impl ResultView {
    pub fn derive(result: &AnalysisResult, expanded: bool) -> Self {
        let band = verdict_band(&result.final_label);
        let (sentiment, red_flags) = match &result.analysis {
            Some(AnalysisInsights {
                sentiment,
                red_flags,
                ..
            }) => (
                Some(sentiment.clone()),
                red_flags
                    .iter()
                    .map(|flag| clean_red_flag(flag).to_string())
                    .collect(),
            ),
            None => (None, Vec::new()),
        };
        Self {
            final_label: result.final_label.clone(),
            band,
            tone: band.tone(),
            ml_label: result.ml_label.clone(),
            ml_confidence: result.ml_confidence,
            web_similarity: result.web_similarity,
            combined_score: result.combined_score,
            progress_percent: progress_percent(result.combined_score),
            headline: result.headline.clone(),
            article: result
                .news_text
                .as_deref()
                .map(|text| truncate_text(text, expanded)),
            web_verification_status: result.web_verification_status.clone(),
            sources: result.sources.clone(),
            sentiment,
            red_flags,
        }
    }
}
