//! LLM error types

use thiserror::Error;

/// Errors that can occur during LLM operations
///
/// None of these reach the sequencer: the coach layer collapses every
/// variant into an in-band fallback result before the state machine
/// sees it.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = LlmError::ApiError {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "API error 503: overloaded");
    }

    #[test]
    fn test_invalid_response_display() {
        let err = LlmError::InvalidResponse("empty candidates".to_string());
        assert_eq!(err.to_string(), "Invalid response: empty candidates");
    }
}
