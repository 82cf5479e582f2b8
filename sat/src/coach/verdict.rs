//! Verdict parsing for the structured evaluation reply

use serde::{Deserialize, Serialize};
use tracing::debug;

/// The structured judgment of one submitted answer
///
/// Transient: displayed once and used for the advance/retry branch,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub approved: bool,
    pub feedback: String,
}

impl Verdict {
    /// Parse a verdict from the raw model reply
    ///
    /// Accepts either a bare JSON object or one wrapped in a fenced
    /// json code block; anything else is None and the caller falls
    /// back to the in-band rejection.
    pub fn parse(raw: &str) -> Option<Self> {
        debug!(raw_len = raw.len(), "Verdict::parse: called");
        let json = extract_json_object(raw)?;
        let verdict: Verdict = match serde_json::from_str(&json) {
            Ok(v) => v,
            Err(e) => {
                debug!(error = %e, "Verdict::parse: deserialization failed");
                return None;
            }
        };
        if verdict.feedback.trim().is_empty() {
            debug!("Verdict::parse: empty feedback, treating as malformed");
            return None;
        }
        Some(verdict)
    }
}

/// Extract a JSON object from a model reply
///
/// Handles fenced json code blocks and replies with prose around the
/// object by slicing from the first `{` to the last `}`.
fn extract_json_object(raw: &str) -> Option<String> {
    if let Some(start) = raw.find("```json")
        && let Some(end) = raw[start + 7..].find("```")
    {
        let json = raw[start + 7..start + 7 + end].trim();
        if json.starts_with('{') && json.ends_with('}') {
            debug!("extract_json_object: found fenced block");
            return Some(json.to_string());
        }
    }

    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        debug!("extract_json_object: braces out of order");
        return None;
    }
    Some(raw[start..=end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_object() {
        let verdict = Verdict::parse(r#"{"approved": true, "feedback": "Excelente. Objetivo fijado."}"#).unwrap();
        assert!(verdict.approved);
        assert_eq!(verdict.feedback, "Excelente. Objetivo fijado.");
    }

    #[test]
    fn test_parse_fenced_block() {
        let raw = "Aquí está mi análisis:\n```json\n{\"approved\": false, \"feedback\": \"Falta una métrica.\"}\n```";
        let verdict = Verdict::parse(raw).unwrap();
        assert!(!verdict.approved);
        assert_eq!(verdict.feedback, "Falta una métrica.");
    }

    #[test]
    fn test_parse_object_with_surrounding_prose() {
        let raw = "Veredicto: {\"approved\": true, \"feedback\": \"Bien.\"} Fin.";
        let verdict = Verdict::parse(raw).unwrap();
        assert!(verdict.approved);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Verdict::parse("no hay json aquí"), None);
        assert_eq!(Verdict::parse(""), None);
        assert_eq!(Verdict::parse("} al revés {"), None);
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        assert_eq!(Verdict::parse(r#"{"approved": true}"#), None);
        assert_eq!(Verdict::parse(r#"{"feedback": "sin flag"}"#), None);
    }

    #[test]
    fn test_parse_rejects_empty_feedback() {
        assert_eq!(Verdict::parse(r#"{"approved": true, "feedback": "  "}"#), None);
    }
}
