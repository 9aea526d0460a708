//! OpenAI-compatible generator implementation.
//!
//! Talks to any endpoint exposing `POST {base_url}/chat/completions`.

use async_trait::async_trait;
use dealflow_abstraction::{
    Generation, GenerationParameters, GeneratorError, TextGenerator, TokenUsage,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible generator.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    /// The model ID (e.g., "gpt-4o-mini").
    model_id: String,
    /// The API key for authentication.
    api_key: String,
    /// The base URL for the API, without trailing slash.
    base_url: String,
    /// HTTP client for making requests.
    client: Client,
}

impl OpenAiGenerator {
    /// Creates a generator using `OPENAI_API_KEY` from the environment.
    ///
    /// # Errors
    /// Returns a `GeneratorError` if the API key is not set or the HTTP client
    /// cannot be built.
    pub fn from_env(model_id: String, timeout: Duration) -> Result<Self, GeneratorError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            GeneratorError::Unsupported("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        Self::with_api_key(model_id, api_key, DEFAULT_BASE_URL.to_string(), timeout)
    }

    /// Creates a generator with an explicit key and endpoint.
    ///
    /// The client-level timeout is a backstop; agents also bound each call.
    ///
    /// # Errors
    /// Returns a `GeneratorError` if the HTTP client cannot be built.
    pub fn with_api_key(
        model_id: String,
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, GeneratorError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeneratorError::RequestError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            model_id,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_messages(prompt: &str, parameters: Option<&GenerationParameters>) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = parameters.and_then(|p| p.system.clone()) {
            messages.push(ChatMessage { role: "system".to_string(), content: system });
        }
        messages.push(ChatMessage { role: "user".to_string(), content: prompt.to_string() });
        messages
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(
        &self,
        prompt: &str,
        parameters: Option<GenerationParameters>,
    ) -> Result<Generation, GeneratorError> {
        debug!(
            model_id = %self.model_id,
            prompt_len = prompt.len(),
            parameters = ?parameters,
            "OpenAiGenerator generating text"
        );

        let url = format!("{}/chat/completions", self.base_url);
        let request_body = ChatRequest {
            model: self.model_id.clone(),
            messages: Self::build_messages(prompt, parameters.as_ref()),
            temperature: parameters.as_ref().and_then(|p| p.temperature),
            max_tokens: parameters.as_ref().and_then(|p| p.max_tokens),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send request to generator backend");
                GeneratorError::RequestError(format!("Network error: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Generator backend returned error status");

            if status.as_u16() == 402 || status.as_u16() == 429 {
                return Err(GeneratorError::QuotaExceeded {
                    provider: "openai".to_string(),
                    message: Some(error_text),
                });
            }

            return Err(GeneratorError::ResponseError(format!(
                "API error ({status}): {error_text}"
            )));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse generator response");
            GeneratorError::SerializationError(format!("Failed to parse response: {e}"))
        })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| GeneratorError::ResponseError("No content in API response".to_string()))?;

        let usage = body.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(Generation { content, model_id: Some(self.model_id.clone()), usage })
    }

    fn generator_id(&self) -> &str {
        &self.model_id
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
#[allow(clippy::struct_field_names)] // Matches API naming
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
