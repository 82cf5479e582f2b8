//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent (fresh context)
///
/// This is the core abstraction for interacting with language models.
/// Each completion request is independent - no conversation state is
/// maintained between calls. The coach sends at most one request at a
/// time and awaits its resolution before issuing another, so
/// implementations make a single best-effort attempt: no retries, no
/// backoff.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
