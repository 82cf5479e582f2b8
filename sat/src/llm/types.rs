//! LLM request/response types
//!
//! Provider-agnostic request/response shapes. The request optionally
//! carries a JSON response schema so a provider can be asked for
//! structured output instead of free text.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt (rendered from Handlebars template)
    pub system_prompt: String,

    /// User messages (typically just one per coaching call)
    pub messages: Vec<Message>,

    /// Max tokens for response (from config)
    pub max_tokens: u32,

    /// When set, the provider is asked to reply with JSON matching
    /// this schema instead of free-form text
    pub response_schema: Option<serde_json::Value>,
}

impl CompletionRequest {
    /// Build a plain free-text request with a single user message
    pub fn text(system_prompt: impl Into<String>, user: impl Into<String>, max_tokens: u32) -> Self {
        debug!(%max_tokens, "CompletionRequest::text: called");
        Self {
            system_prompt: system_prompt.into(),
            messages: vec![Message::user(user)],
            max_tokens,
            response_schema: None,
        }
    }

    /// Build a structured request with a single user message and a
    /// required JSON response schema
    pub fn structured(
        system_prompt: impl Into<String>,
        user: impl Into<String>,
        max_tokens: u32,
        schema: serde_json::Value,
    ) -> Self {
        debug!(%max_tokens, "CompletionRequest::structured: called");
        Self {
            system_prompt: system_prompt.into(),
            messages: vec![Message::user(user)],
            max_tokens,
            response_schema: Some(schema),
        }
    }
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        debug!("Message::user: called");
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(text: impl Into<String>) -> Self {
        debug!("Message::assistant: called");
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Text content (if any)
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Create a response carrying text content
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_user() {
        let msg = Message::user("Hola");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hola");
    }

    #[test]
    fn test_text_request_has_no_schema() {
        let req = CompletionRequest::text("system", "user", 1000);
        assert!(req.response_schema.is_none());
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.max_tokens, 1000);
    }

    #[test]
    fn test_structured_request_carries_schema() {
        let schema = serde_json::json!({"type": "object"});
        let req = CompletionRequest::structured("system", "user", 500, schema.clone());
        assert_eq!(req.response_schema, Some(schema));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }
}
