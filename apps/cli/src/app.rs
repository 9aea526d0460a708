//! Settings and orchestrator construction shared by the commands.

use anyhow::Context;
use dealflow_abstraction::TextGenerator;
use dealflow_core::{Providers, Settings};
use dealflow_models::{GeneratorConfig, GeneratorFactory, GeneratorKind};
use dealflow_orchestrator::Orchestrator;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Loads an explicit config file, or discovers the global and local ones.
pub fn load_settings(config: Option<&Path>) -> anyhow::Result<Arc<Settings>> {
    let settings = match config {
        Some(path) => Settings::load_with_env(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Settings::discover_and_load().context("loading configuration")?,
    };
    debug!(
        generator = %settings.generator.kind,
        agent_timeout_secs = settings.runtime.agent_timeout_secs,
        "Configuration loaded"
    );
    Ok(Arc::new(settings))
}

fn build_generator(settings: &Settings) -> anyhow::Result<Arc<dyn TextGenerator>> {
    let section = &settings.generator;
    let kind: GeneratorKind = section.kind.parse()?;

    let mut config = GeneratorConfig::new(kind, section.model_id.clone())
        .with_timeout(settings.runtime.generator_timeout());
    if let Some(api_key) = &section.api_key {
        config = config.with_api_key(api_key.clone());
    }
    if let Some(base_url) = &section.base_url {
        config = config.with_base_url(base_url.clone());
    }

    GeneratorFactory::create(config).context("creating text generator")
}

/// An orchestrator with every built-in agent over the sample providers.
pub async fn build_orchestrator(settings: &Arc<Settings>) -> anyhow::Result<Arc<Orchestrator>> {
    let generator = build_generator(settings)?;
    let orchestrator =
        Orchestrator::with_default_agents(Arc::clone(settings), generator, Providers::sample())
            .await;
    Ok(Arc::new(orchestrator))
}
