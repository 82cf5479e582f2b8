//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Question-generation prompt for the active phase
pub const QUESTION: &str = include_str!("../../prompts/question.pmt");

/// Answer-evaluation prompt with the JSON verdict contract
pub const EVALUATE: &str = include_str!("../../prompts/evaluate.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "question" => {
            debug!("get_embedded: matched question");
            Some(QUESTION)
        }
        "evaluate" => {
            debug!("get_embedded: matched evaluate");
            Some(EVALUATE)
        }
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_question() {
        let question = get_embedded("question").unwrap();
        assert!(question.contains("Objetivo del Agente"));
        assert!(question.contains("{{goal}}"));
        assert!(question.contains("{{#each progress}}"));
    }

    #[test]
    fn test_get_embedded_evaluate() {
        let evaluate = get_embedded("evaluate").unwrap();
        assert!(evaluate.contains("{{answer}}"));
        assert!(evaluate.contains("\"approved\": boolean"));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}
