use std::fmt::Write;

use verdict_core::{
    AnalysisInsights, AnalysisMode, AppViewModel, PhaseLabel, ResultView, Tone,
};

const BAR_CELLS: usize = 20;

pub fn render(view: &AppViewModel, expanded: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Mode: {} | Status: {}",
        mode_label(view.mode),
        phase_label(view.phase)
    );

    if view.phase == PhaseLabel::Idle && !view.can_submit {
        let _ = writeln!(out, "Nothing to submit: {}", empty_hint(view.mode));
    }

    if let Some(error) = &view.error {
        let _ = writeln!(out, "Error: {error}");
    }

    if let Some(result) = &view.result {
        render_result(&mut out, &ResultView::derive(result, expanded));
    }
    out
}

fn render_result(out: &mut String, view: &ResultView) {
    let _ = writeln!(
        out,
        "=== Result: {} [{}] ===",
        view.final_label,
        tone_label(view.tone)
    );
    let _ = writeln!(
        out,
        "ML Model Prediction: {} ({}% confidence)",
        view.ml_label, view.ml_confidence
    );
    let _ = writeln!(out, "Web Similarity: {}%", view.web_similarity);
    if let Some(status) = &view.web_verification_status {
        let _ = writeln!(out, "Web Verification: {status}");
    }
    let _ = writeln!(out, "Combined Score: {}%", view.combined_score);
    let _ = writeln!(out, "{}", progress_bar(view.progress_percent));

    if let Some(headline) = &view.headline {
        let _ = writeln!(out, "Headline: {headline}");
    }
    if let Some(article) = &view.article {
        let _ = writeln!(out, "Article:");
        let _ = writeln!(out, "  {}", article.text);
        if article.can_expand {
            let _ = writeln!(out, "  (:more to toggle the full article)");
        }
    }

    if !view.sources.is_empty() {
        let _ = writeln!(out, "Referenced Sources:");
        for source in &view.sources {
            if source.title.is_some() {
                let _ = writeln!(out, "  - {} <{}>", source.display_text(), source.link);
            } else {
                let _ = writeln!(out, "  - {}", source.link);
            }
        }
    }

    if let Some(sentiment) = &view.sentiment {
        let _ = writeln!(out, "Analysis Insights:");
        let _ = writeln!(out, "  Sentiment: {sentiment}");
        for flag in &view.red_flags {
            let _ = writeln!(out, "  ! {flag}");
        }
    }
}

/// Output for the standalone insights route.
pub fn render_insights(insights: &AnalysisInsights) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Sentiment: {}", insights.sentiment);
    if !insights.suspicious_keywords.is_empty() {
        let _ = writeln!(
            out,
            "Suspicious keywords: {}",
            insights.suspicious_keywords.join(", ")
        );
    }
    if !insights.trust_keywords.is_empty() {
        let _ = writeln!(out, "Trust keywords: {}", insights.trust_keywords.join(", "));
    }
    for flag in &insights.red_flags {
        let _ = writeln!(out, "! {}", verdict_core::clean_red_flag(flag));
    }
    out
}

fn progress_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_CELLS as f64).round() as usize;
    let filled = filled.min(BAR_CELLS);
    format!(
        "[{}{}] {:.0}%",
        "#".repeat(filled),
        "-".repeat(BAR_CELLS - filled),
        percent
    )
}

fn empty_hint(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Text => "type or paste the article text",
        AnalysisMode::Url => "enter the article URL",
    }
}

fn mode_label(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Text => "Text",
        AnalysisMode::Url => "URL",
    }
}

fn phase_label(phase: PhaseLabel) -> &'static str {
    match phase {
        PhaseLabel::Idle => "Idle",
        PhaseLabel::Loading => "Analyzing...",
        PhaseLabel::Success => "Done",
        PhaseLabel::Failure => "Failed",
    }
}

fn tone_label(tone: Tone) -> &'static str {
    match tone {
        Tone::Green => "green",
        Tone::Red => "red",
        Tone::Blue => "blue",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use verdict_core::normalize;

    fn view_with(payload: serde_json::Value) -> AppViewModel {
        AppViewModel {
            phase: PhaseLabel::Success,
            result: Some(normalize(&payload).unwrap()),
            ..AppViewModel::default()
        }
    }

    #[test]
    fn bar_is_clamped_to_full_width() {
        assert_eq!(progress_bar(100.0), format!("[{}] 100%", "#".repeat(BAR_CELLS)));
        assert_eq!(progress_bar(0.0), format!("[{}] 0%", "-".repeat(BAR_CELLS)));
        assert_eq!(progress_bar(50.0), "[##########----------] 50%");
    }

    #[test]
    fn renders_result_sections() {
        let view = view_with(json!({
            "ml_label": "Fake",
            "ml_confidence": 72.45,
            "web_similarity": 12.5,
            "combined_score": 48.27,
            "final_label": "Likely Fake",
            "headline": "Miracle cure",
            "news_text": "y".repeat(500),
            "sources": [
                { "title": "Snopes", "link": "https://snopes.com/x" },
                { "link": "https://b.example/y" }
            ],
            "analysis": { "sentiment": "Negative", "red_flags": ["\u{1f6a8} Loud words."] }
        }));

        let text = render(&view, false);
        assert!(text.contains("Status: Done"));
        assert!(text.contains("=== Result: Likely Fake [red] ==="));
        assert!(text.contains("ML Model Prediction: Fake (72.45% confidence)"));
        assert!(text.contains("Combined Score: 48.27%"));
        assert!(text.contains("Headline: Miracle cure"));
        assert!(text.contains("(:more to toggle the full article)"));
        assert!(text.contains("  - Snopes <https://snopes.com/x>"));
        assert!(text.contains("  - https://b.example/y"));
        assert!(text.contains("  ! Loud words."));
        assert!(!text.contains(&"y".repeat(351)));

        let full = render(&view, true);
        assert!(full.contains(&"y".repeat(500)));
    }

    #[test]
    fn renders_error_without_result() {
        let view = AppViewModel {
            phase: PhaseLabel::Failure,
            error: Some("Request failed".to_string()),
            ..AppViewModel::default()
        };
        let text = render(&view, false);
        assert!(text.contains("Status: Failed"));
        assert!(text.contains("Error: Request failed"));
        assert!(!text.contains("Result:"));
    }

    #[test]
    fn idle_hint_follows_submittable_input() {
        let empty = AppViewModel {
            mode: AnalysisMode::Url,
            ..AppViewModel::default()
        };
        assert!(render(&empty, false).contains("Nothing to submit: enter the article URL"));

        let staged = AppViewModel {
            text: "article".to_string(),
            can_submit: true,
            ..AppViewModel::default()
        };
        assert!(!render(&staged, false).contains("Nothing to submit"));
    }
}
