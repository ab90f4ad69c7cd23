use serde_json::{Map, Value};

use crate::{AnalysisError, AnalysisInsights, AnalysisResult, SourceLink};

const SCORE_MIN: f64 = 0.0;
const SCORE_MAX: f64 = 100.0;

/// Shown when the service reports an error without saying what went wrong.
const UNSPECIFIED_FAILURE: &str = "Request failed";

/// Validate a raw service payload and coerce it into an [`AnalysisResult`].
///
/// An `error` field short-circuits as a service-reported failure. Required
/// scores must be numeric (or numeric-looking strings) within 0..=100; nothing
/// is clamped here.
pub fn normalize(raw: &Value) -> Result<AnalysisResult, AnalysisError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| AnalysisError::malformed("response is not a JSON object"))?;

    if let Some(err) = obj.get("error").filter(|v| !v.is_null()) {
        return Err(AnalysisError::service_reported(reported_message(err)));
    }

    let ml_label = optional_string(obj, "ml_label")?
        .ok_or_else(|| AnalysisError::malformed("missing ml_label"))?;
    let ml_confidence = score(obj, "ml_confidence")?;
    let web_similarity = score(obj, "web_similarity")?;
    let combined_score = score(obj, "combined_score")?;
    let final_label = optional_string(obj, "final_label")?.unwrap_or_else(|| ml_label.clone());

    Ok(AnalysisResult {
        ml_label,
        ml_confidence,
        web_similarity,
        combined_score,
        final_label,
        headline: optional_string(obj, "headline")?,
        news_text: optional_string(obj, "news_text")?,
        web_verification_status: optional_string(obj, "web_verification_status")?,
        sources: sources(obj)?,
        analysis: match obj.get("analysis") {
            None | Some(Value::Null) => None,
            Some(value) => Some(normalize_insights(value)?),
        },
    })
}

/// Validate the `analysis` block, or the body of the standalone insights route.
pub fn normalize_insights(raw: &Value) -> Result<AnalysisInsights, AnalysisError> {
    if let Some(err) = raw.get("error").filter(|v| !v.is_null()) {
        return Err(AnalysisError::service_reported(reported_message(err)));
    }
    let obj = raw
        .as_object()
        .ok_or_else(|| AnalysisError::malformed("analysis is not an object"))?;
    let sentiment = match obj.get("sentiment") {
        Some(Value::String(s)) => s.clone(),
        _ => return Err(AnalysisError::malformed("analysis.sentiment must be a string")),
    };
    Ok(AnalysisInsights {
        sentiment,
        red_flags: string_list(obj, "red_flags")?,
        suspicious_keywords: string_list(obj, "suspicious_keywords")?,
        trust_keywords: string_list(obj, "trust_keywords")?,
    })
}

fn reported_message(err: &Value) -> String {
    let message = match err {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    if message.is_empty() {
        UNSPECIFIED_FAILURE.to_string()
    } else {
        message
    }
}

fn score(obj: &Map<String, Value>, field: &str) -> Result<f64, AnalysisError> {
    let value = match obj.get(field) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        None | Some(Value::Null) => {
            return Err(AnalysisError::malformed(format!("missing {field}")));
        }
        Some(_) => None,
    };
    let value = value
        .filter(|v| v.is_finite())
        .ok_or_else(|| AnalysisError::malformed(format!("{field} is not numeric")))?;
    if !(SCORE_MIN..=SCORE_MAX).contains(&value) {
        return Err(AnalysisError::malformed(format!(
            "{field} out of range: {value}"
        )));
    }
    Ok(value)
}

/// Absent, null and empty strings all become `None`.
fn optional_string(obj: &Map<String, Value>, field: &str) -> Result<Option<String>, AnalysisError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(AnalysisError::malformed(format!("{field} must be a string"))),
    }
}

fn string_list(obj: &Map<String, Value>, field: &str) -> Result<Vec<String>, AnalysisError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    AnalysisError::malformed(format!("{field} must contain only strings"))
                })
            })
            .collect(),
        Some(_) => Err(AnalysisError::malformed(format!("{field} must be an array"))),
    }
}

fn sources(obj: &Map<String, Value>) -> Result<Vec<SourceLink>, AnalysisError> {
    let items = match obj.get("sources") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(AnalysisError::malformed("sources must be an array")),
    };
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let entry = item
                .as_object()
                .ok_or_else(|| AnalysisError::malformed(format!("sources[{idx}] is not an object")))?;
            let link = optional_string(entry, "link")?
                .ok_or_else(|| AnalysisError::malformed(format!("sources[{idx}] has no link")))?;
            Ok(SourceLink {
                title: optional_string(entry, "title")?,
                link,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_strings_are_coerced() {
        let obj = json!({ "s": " 87.5 " });
        assert_eq!(score(obj.as_object().unwrap(), "s"), Ok(87.5));
    }

    #[test]
    fn boolean_score_is_rejected() {
        let obj = json!({ "s": true });
        let err = score(obj.as_object().unwrap(), "s").unwrap_err();
        assert_eq!(err.kind, crate::ErrorKind::MalformedResponse);
    }

    #[test]
    fn score_bounds_are_inclusive() {
        let obj = json!({ "lo": 0, "hi": 100, "over": 100.01, "under": -0.5 });
        let obj = obj.as_object().unwrap();
        assert_eq!(score(obj, "lo"), Ok(0.0));
        assert_eq!(score(obj, "hi"), Ok(100.0));
        assert!(score(obj, "over").is_err());
        assert!(score(obj, "under").is_err());
    }

    #[test]
    fn empty_optional_string_is_absent() {
        let obj = json!({ "headline": "" });
        assert_eq!(optional_string(obj.as_object().unwrap(), "headline"), Ok(None));
    }
}
