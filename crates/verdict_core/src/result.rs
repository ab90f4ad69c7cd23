use serde::{Deserialize, Serialize};

/// A normalized service response. Only [`crate::normalize`] builds these from
/// raw payloads, so every field here has already been validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub ml_label: String,
    pub ml_confidence: f64,
    pub web_similarity: f64,
    pub combined_score: f64,
    /// Always populated; falls back to `ml_label` when the service omits it.
    pub final_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_verification_status: Option<String>,
    /// Relevance order as received.
    #[serde(default)]
    pub sources: Vec<SourceLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisInsights>,
}

impl AnalysisResult {
    /// Serializes back into the service's wire shape.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub link: String,
}

impl SourceLink {
    /// Text to show for the link: the title when present, else the link itself.
    pub fn display_text(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.link)
    }
}

/// Linguistic insights extracted by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisInsights {
    pub sentiment: String,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub suspicious_keywords: Vec<String>,
    #[serde(default)]
    pub trust_keywords: Vec<String>,
}
