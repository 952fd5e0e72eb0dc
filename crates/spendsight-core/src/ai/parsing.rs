//! JSON parsing helpers for collaborator responses
//!
//! Generative models often wrap their JSON in markdown fences or surround it
//! with prose. These helpers extract the payload and decode it as a tagged
//! step: success yields structured data, anything else is an explicit parse
//! failure the caller can recover from. Nothing here silently substitutes a
//! default.

use serde::Deserialize;

use crate::error::{Error, Result};

use super::types::{HealthAssessment, SpendingInsight};

/// Strip a leading/trailing markdown code fence (``` or ```json).
pub fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Extract the first balanced JSON object from free text.
pub fn extract_json_object(response: &str) -> Result<&str> {
    extract_balanced(response, '{', '}')
        .ok_or_else(|| Error::InvalidData(format!("No JSON object in response: {}", preview(response))))
}

/// Extract the first balanced JSON array from free text.
pub fn extract_json_array(response: &str) -> Result<&str> {
    extract_balanced(response, '[', ']')
        .ok_or_else(|| Error::InvalidData(format!("No JSON array in response: {}", preview(response))))
}

fn extract_balanced(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Length cap for response excerpts quoted in error messages.
const PREVIEW_MAX_BYTES: usize = 200;

fn preview(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.len() <= PREVIEW_MAX_BYTES {
        return trimmed.to_string();
    }
    // Back up to a char boundary so multi-byte text never splits mid-char
    let mut end = PREVIEW_MAX_BYTES;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &trimmed[..end])
}

/// Parse a bare category label, checked against the allowed list.
pub fn parse_category(response: &str, valid: &[&str]) -> Result<String> {
    let candidate = strip_code_fences(response)
        .trim()
        .trim_matches('"')
        .trim_end_matches('.');
    valid
        .iter()
        .find(|v| v.eq_ignore_ascii_case(candidate))
        .map(|v| v.to_string())
        .ok_or_else(|| {
            Error::InvalidData(format!("Unrecognized category from AI: {}", preview(response)))
        })
}

/// Raw insight item as the collaborator emits it
#[derive(Debug, Deserialize)]
struct RawInsight {
    message: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Collaborator insight confidence when the payload parses cleanly.
const PARSED_INSIGHT_CONFIDENCE: f64 = 0.8;

/// Parse a list of insights from a collaborator response.
pub fn parse_insights(response: &str) -> Result<Vec<SpendingInsight>> {
    let body = strip_code_fences(response);
    let json_str = extract_json_array(body)?;
    let raw: Vec<RawInsight> = serde_json::from_str(json_str)
        .map_err(|e| Error::InvalidData(format!("Invalid insights JSON from AI: {}", e)))?;

    Ok(raw
        .into_iter()
        .map(|item| SpendingInsight {
            message: item.message,
            confidence: PARSED_INSIGHT_CONFIDENCE,
            data: item.data,
        })
        .collect())
}

/// Raw health payload; the model calls the score `health_score`
#[derive(Debug, Deserialize)]
struct RawHealthAssessment {
    health_score: f64,
    grade: String,
    #[serde(default)]
    factors: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
}

/// Parse a health assessment from a collaborator response.
pub fn parse_health_assessment(response: &str) -> Result<HealthAssessment> {
    let body = strip_code_fences(response);
    let json_str = extract_json_object(body)?;
    let raw: RawHealthAssessment = serde_json::from_str(json_str)
        .map_err(|e| Error::InvalidData(format!("Invalid health JSON from AI: {}", e)))?;

    if !(0.0..=100.0).contains(&raw.health_score) {
        return Err(Error::InvalidData(format!(
            "Health score out of range: {}",
            raw.health_score
        )));
    }

    Ok(HealthAssessment {
        score: raw.health_score,
        grade: raw.grade,
        factors: raw.factors,
        recommendations: raw.recommendations,
    })
}
