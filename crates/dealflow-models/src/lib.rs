//! Text generator implementations for Dealflow.
//!
//! This crate provides concrete implementations of the `TextGenerator` trait.
//!
//! # Supported Backends
//!
//! - **Mock**: deterministic offline output for tests and local runs
//! - **OpenAI**: any OpenAI-compatible chat completions endpoint

pub mod factory;
pub mod openai;

use async_trait::async_trait;
use dealflow_abstraction::{
    Generation, GenerationParameters, GeneratorError, TextGenerator, TokenUsage,
};
use tracing::debug;

pub use factory::{GeneratorConfig, GeneratorFactory, GeneratorKind};
pub use openai::OpenAiGenerator;

/// A deterministic generator that never leaves the process.
///
/// The output echoes the first line of the prompt so drafts stay traceable to
/// the request that produced them.
#[derive(Debug, Default)]
pub struct MockGenerator {
    id: String,
}

impl MockGenerator {
    /// Creates a new `MockGenerator` with the given ID.
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self { id }
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(
        &self,
        prompt: &str,
        parameters: Option<GenerationParameters>,
    ) -> Result<Generation, GeneratorError> {
        debug!(
            generator_id = %self.id,
            prompt_len = prompt.len(),
            parameters = ?parameters,
            "MockGenerator generating text"
        );

        let headline = prompt.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or_default();
        let content = format!("[draft:{}] {headline}", self.id);

        let prompt_tokens = count_tokens(prompt);
        let completion_tokens = count_tokens(&content);

        Ok(Generation {
            content,
            model_id: Some(self.id.clone()),
            usage: Some(TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            }),
        })
    }

    fn generator_id(&self) -> &str {
        &self.id
    }
}

/// Whitespace token count used for mock usage figures.
fn count_tokens(text: &str) -> u32 {
    u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX)
}
