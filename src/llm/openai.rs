//! OpenAI chat-completions client
//!
//! Implements the CompletionClient trait against the chat-completions
//! endpoint, with JSON-object response formatting for plan generation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{CompletionClient, CompletionRequest, LlmError};
use crate::config::LlmConfig;

/// OpenAI API client
pub struct OpenAiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenAiClient {
    /// Create a new client from configuration
    ///
    /// The configured timeout bounds the whole completion call; background
    /// generation work tolerates a generous one.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            http,
        })
    }

    /// Build the request body for the chat-completions endpoint
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": request.prompt,
                }
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        if request.json_object {
            body["response_format"] = serde_json::json!({ "type": "json_object" });
        }

        body
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(&request);
        debug!(model = %self.model, max_tokens = request.max_tokens, "complete: called");

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!(status, "complete: API error");
            return Err(LlmError::Api { status, message });
        }

        let api_response: ChatCompletionResponse = response.json().await?;
        let choice = api_response.choices.into_iter().next().ok_or_else(|| {
            LlmError::InvalidResponse("completion contained no choices".to_string())
        })?;

        debug!("complete: success");
        Ok(choice.message.content.trim().to_string())
    }
}

// Chat-completions API response types

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}
