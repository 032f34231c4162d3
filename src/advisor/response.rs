//! Suggestion payload and model output parsing
//!
//! Models wrap their JSON in prose or code fences often enough that the
//! payload is taken from the first `{` to the last `}` before decoding.

use crate::errors::ModelResponseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Label used when no dataset condition matched
pub const UNKNOWN_CONDITION: &str = "Unknown";

/// Next steps shown when the model gave no usable answer
pub const FALLBACK_NEXT_STEPS: &str = "Consult a healthcare professional.";

/// Disclaimer shown when the model gave no usable answer
pub const FALLBACK_DISCLAIMER: &str = "This is not medical advice";

/// Structured, non-diagnostic guidance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub possible_conditions: Vec<String>,
    pub next_steps: String,
    pub disclaimer: String,
}

impl Suggestion {
    /// Fixed payload built from the dataset lookup alone
    pub fn fallback(retrieved: &BTreeSet<String>) -> Self {
        let possible_conditions = if retrieved.is_empty() {
            vec![UNKNOWN_CONDITION.to_string()]
        } else {
            retrieved.iter().cloned().collect()
        };

        Self {
            possible_conditions,
            next_steps: FALLBACK_NEXT_STEPS.to_string(),
            disclaimer: FALLBACK_DISCLAIMER.to_string(),
        }
    }
}

/// Slice from the first `{` to the last `}`, if both exist in that order
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Decode a suggestion from raw model output
pub fn parse_suggestion(raw: &str) -> Result<Suggestion, ModelResponseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ModelResponseError::EmptyResponse);
    }

    let payload = extract_json_object(trimmed).ok_or(ModelResponseError::NoJsonObject)?;
    serde_json::from_str(payload).map_err(|e| ModelResponseError::InvalidJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{"possible_conditions": ["Flu"], "next_steps": "Rest and hydrate.", "disclaimer": "Not medical advice."}"#;

    #[test]
    fn test_parse_bare_payload() {
        let suggestion = parse_suggestion(PAYLOAD).unwrap();
        assert_eq!(suggestion.possible_conditions, vec!["Flu"]);
        assert_eq!(suggestion.next_steps, "Rest and hydrate.");
    }

    #[test]
    fn test_parse_tolerates_prose_and_fences() {
        let raw = format!("Sure, here you go:\n```json\n{}\n```\nStay well!", PAYLOAD);
        let suggestion = parse_suggestion(&raw).unwrap();
        assert_eq!(suggestion.disclaimer, "Not medical advice.");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_suggestion("  "), Err(ModelResponseError::EmptyResponse));
        assert_eq!(
            parse_suggestion("I cannot help with that."),
            Err(ModelResponseError::NoJsonObject)
        );
        assert_eq!(parse_suggestion("} backwards {"), Err(ModelResponseError::NoJsonObject));
        assert!(matches!(
            parse_suggestion(r#"{"possible_conditions": "Flu"}"#),
            Err(ModelResponseError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_extract_spans_nested_objects() {
        let raw = r#"x {"a": {"b": 1}} y"#;
        assert_eq!(extract_json_object(raw), Some(r#"{"a": {"b": 1}}"#));
    }

    #[test]
    fn test_fallback_uses_retrieved_conditions() {
        let retrieved: BTreeSet<String> = ["Flu".to_string()].into();
        let fallback = Suggestion::fallback(&retrieved);
        assert_eq!(fallback.possible_conditions, vec!["Flu"]);
        assert_eq!(fallback.next_steps, FALLBACK_NEXT_STEPS);
        assert_eq!(fallback.disclaimer, FALLBACK_DISCLAIMER);
    }

    #[test]
    fn test_fallback_unknown_when_nothing_retrieved() {
        let fallback = Suggestion::fallback(&BTreeSet::new());
        assert_eq!(fallback.possible_conditions, vec![UNKNOWN_CONDITION]);
    }
}
