//! Text generation abstraction for Dealflow.
//!
//! Agents that draft human-readable artifacts (contracts, outreach copy, SEO
//! content) talk to an opaque generator through the [`TextGenerator`] trait.
//! Concrete backends live in `dealflow-models`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents an error that can occur when calling a text generator.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneratorError {
    /// An error occurred while sending the request (network, invalid request).
    #[error("Request Error: {0}")]
    RequestError(String),

    /// The backend answered with an error payload or an unusable response.
    #[error("Generator Response Error: {0}")]
    ResponseError(String),

    /// An error occurred during serialization or deserialization.
    #[error("Serialization Error: {0}")]
    SerializationError(String),

    /// The generator backend is not supported or not configured.
    #[error("Unsupported Generator: {0}")]
    Unsupported(String),

    /// Backend quota exceeded or rate limit hit.
    #[error("Generator '{provider}' quota exceeded{}", message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
    QuotaExceeded {
        /// The provider name (e.g., "openai").
        provider: String,
        /// Optional error message from the provider.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Other unexpected errors.
    #[error("Other Generator Error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for GeneratorError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Parameters for controlling generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    /// Sampling temperature, between 0 and 2.
    pub temperature: Option<f32>,

    /// The maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// An optional system instruction sent ahead of the prompt.
    pub system: Option<String>,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self { temperature: Some(0.7), max_tokens: Some(1024), system: None }
    }
}

impl GenerationParameters {
    /// Parameters with the given temperature and token budget.
    #[must_use]
    pub fn new(temperature: f32, max_tokens: u32) -> Self {
        Self { temperature: Some(temperature), max_tokens: Some(max_tokens), system: None }
    }

    /// Sets the system instruction.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// The text returned by a generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generation {
    /// The generated content.
    pub content: String,

    /// Optional: the backend model that produced the content.
    pub model_id: Option<String>,

    /// Optional: token usage for the request.
    pub usage: Option<TokenUsage>,
}

impl Generation {
    /// Total tokens consumed, or zero when the backend reports no usage.
    #[must_use]
    pub fn total_tokens(&self) -> u64 {
        self.usage.as_ref().map_or(0, |u| u64::from(u.total_tokens))
    }
}

/// Usage statistics for a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt.
    pub prompt_tokens: u32,

    /// Number of tokens in the completion.
    pub completion_tokens: u32,

    /// Total number of tokens used.
    pub total_tokens: u32,
}

/// An opaque text-generation capability.
///
/// Implementations must be `Send + Sync` so a single generator can be shared
/// by every agent in an orchestrator. Callers are responsible for bounding
/// the call with a timeout.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates text for the given prompt.
    ///
    /// # Errors
    /// Returns a `GeneratorError` if the backend call fails.
    async fn generate(
        &self,
        prompt: &str,
        parameters: Option<GenerationParameters>,
    ) -> Result<Generation, GeneratorError>;

    /// Returns the identifier of the backing model.
    fn generator_id(&self) -> &str;
}
