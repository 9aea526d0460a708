//! Generator factory for creating generator instances from configuration.

use crate::openai::DEFAULT_BASE_URL;
use crate::{MockGenerator, OpenAiGenerator};
use dealflow_abstraction::{GeneratorError, TextGenerator};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Generator backend enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    /// Deterministic offline generator.
    Mock,
    /// OpenAI or any OpenAI-compatible endpoint.
    OpenAI,
}

impl FromStr for GeneratorKind {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "openai" | "openai-compatible" => Ok(Self::OpenAI),
            other => Err(GeneratorError::Unsupported(format!("Unknown generator kind: {other}"))),
        }
    }
}

/// Generator configuration.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// The backend to create.
    pub kind: GeneratorKind,
    /// The model ID passed to the backend.
    pub model_id: String,
    /// Optional API key (falls back to `OPENAI_API_KEY`).
    pub api_key: Option<String>,
    /// Optional endpoint override.
    pub base_url: Option<String>,
    /// HTTP client timeout.
    pub timeout: Duration,
}

impl GeneratorConfig {
    /// Creates a configuration with no key or endpoint override.
    #[must_use]
    pub fn new(kind: GeneratorKind, model_id: String) -> Self {
        Self { kind, model_id, api_key: None, base_url: None, timeout: Duration::from_secs(30) }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Sets the endpoint base URL (e.g. "http://localhost:8000/v1").
    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the HTTP client timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Factory for creating generator instances.
pub struct GeneratorFactory;

impl GeneratorFactory {
    /// Creates a generator from the given configuration.
    ///
    /// # Errors
    /// Returns a `GeneratorError` if creation fails (e.g. missing API key).
    pub fn create(config: GeneratorConfig) -> Result<Arc<dyn TextGenerator>, GeneratorError> {
        debug!(kind = ?config.kind, model_id = %config.model_id, "Creating generator instance");

        match config.kind {
            GeneratorKind::Mock => Ok(Arc::new(MockGenerator::new(config.model_id))),
            GeneratorKind::OpenAI => {
                let generator = match config.api_key {
                    Some(api_key) => OpenAiGenerator::with_api_key(
                        config.model_id,
                        api_key,
                        config.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                        config.timeout,
                    )?,
                    None => OpenAiGenerator::from_env(config.model_id, config.timeout)?,
                };
                Ok(Arc::new(generator))
            }
        }
    }

    /// Creates a generator from a kind string and model ID.
    ///
    /// # Errors
    /// Returns a `GeneratorError` if the kind is unknown or creation fails.
    pub fn create_from_str(
        kind: &str,
        model_id: String,
    ) -> Result<Arc<dyn TextGenerator>, GeneratorError> {
        Self::create(GeneratorConfig::new(kind.parse()?, model_id))
    }
}
