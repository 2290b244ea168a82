//! Client layer for the external text-completion service
//!
//! Exposes a single trait seam so the pipeline can run against the real
//! HTTP client in production and a scripted double in tests.

mod error;
mod openai;

pub use error::LlmError;
pub use openai::OpenAiClient;

use async_trait::async_trait;

/// One completion request to the external service
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Constrain the service to emit a single JSON object
    pub json_object: bool,
}

/// Client for an external text-completion service
///
/// `complete` issues exactly one call and returns the raw text content.
/// No retry happens at this layer; retry policy, if any, belongs to the
/// caller.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}
