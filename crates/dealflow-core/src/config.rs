//! Runtime configuration.
//!
//! Settings are loaded once at process start and handed to agents behind an
//! `Arc`; nothing in the core mutates them afterwards.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. Global config (`~/.dealflow/config.toml`)
//! 3. Local config (`./dealflow.toml`)
//! 4. `DEALFLOW_*` environment variables

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    ReadError(String),

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Lead and buyer decision thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessConfig {
    /// Leads scoring at or above this are recommended for qualification.
    pub min_lead_score_threshold: u32,
    /// Leads scoring at or above this (but below the qualify threshold) are re-engaged.
    pub reengage_score_threshold: u32,
    /// Maximum leads returned from a single scout run.
    pub max_leads_returned: usize,
    /// Buyer matches must score strictly above this to be surfaced.
    pub qualified_match_threshold: f64,
    /// Number of buyer matches returned.
    pub top_matches: usize,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            min_lead_score_threshold: 65,
            reengage_score_threshold: 40,
            max_leads_returned: 20,
            qualified_match_threshold: 50.0,
            top_matches: 5,
        }
    }
}

/// Offer pricing fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub default_offer_discount_percent: f64,
    pub wholesale_fee_percent: f64,
    pub default_repair_cost: f64,
    pub default_holding_cost: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            default_offer_discount_percent: 30.0,
            wholesale_fee_percent: 6.0,
            default_repair_cost: 50_000.0,
            default_holding_cost: 10_000.0,
        }
    }
}

/// Timeouts applied at every external boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Upper bound on a single agent execution.
    pub agent_timeout_secs: u64,
    /// Upper bound on a single data-provider call.
    pub provider_timeout_secs: u64,
    /// Upper bound on a single generator call.
    pub generator_timeout_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { agent_timeout_secs: 120, provider_timeout_secs: 15, generator_timeout_secs: 30 }
    }
}

impl RuntimeConfig {
    #[must_use]
    pub const fn agent_timeout(&self) -> Duration {
        Duration::from_secs(self.agent_timeout_secs)
    }

    #[must_use]
    pub const fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    #[must_use]
    pub const fn generator_timeout(&self) -> Duration {
        Duration::from_secs(self.generator_timeout_secs)
    }
}

/// Text generator selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSection {
    /// Backend kind (`mock` or `openai`).
    pub kind: String,
    /// Model ID passed to the backend.
    pub model_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            kind: "mock".to_string(),
            model_id: "mock-generator".to_string(),
            base_url: None,
            api_key: None,
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub business: BusinessConfig,
    pub pricing: PricingConfig,
    pub runtime: RuntimeConfig,
    pub generator: GeneratorSection,
}

impl Settings {
    /// Load configuration from a TOML file. Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file is missing, unreadable or malformed.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let table = read_table(path)?;
        Self::from_table(table, path)
    }

    /// Get default global configuration file path.
    pub fn default_global_path() -> PathBuf {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".dealflow")
            .join("config.toml")
    }

    /// Get default local configuration file path.
    pub fn default_local_path() -> PathBuf {
        PathBuf::from("dealflow.toml")
    }

    /// Discover and load configuration files, then apply the environment.
    ///
    /// Local config overrides global config key by key; absent files are
    /// skipped.
    ///
    /// # Errors
    /// Returns `ConfigError` if a present file is malformed, an environment
    /// override does not parse, or the merged result fails validation.
    pub fn discover_and_load() -> ConfigResult<Self> {
        let mut merged = toml::Table::new();
        for path in [Self::default_global_path(), Self::default_local_path()] {
            if path.exists() {
                debug!(path = %path.display(), "Reading configuration file");
                merge_tables(&mut merged, read_table(&path)?);
            }
        }

        let mut settings = Self::from_table(merged, Path::new("<discovered>"))?;
        settings.apply_env_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load an explicit file, then apply the environment.
    ///
    /// # Errors
    /// Same as [`Settings::discover_and_load`], plus a missing file.
    pub fn load_with_env(path: &Path) -> ConfigResult<Self> {
        let mut settings = Self::load_from_file(path)?;
        settings.apply_env_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `DEALFLOW_*` overrides read through `lookup`.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` if a present variable does not parse.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DEALFLOW_MIN_LEAD_SCORE") {
            self.business.min_lead_score_threshold = parse_env("DEALFLOW_MIN_LEAD_SCORE", &v)?;
        }
        if let Some(v) = lookup("DEALFLOW_REENGAGE_SCORE") {
            self.business.reengage_score_threshold = parse_env("DEALFLOW_REENGAGE_SCORE", &v)?;
        }
        if let Some(v) = lookup("DEALFLOW_OFFER_DISCOUNT_PERCENT") {
            self.pricing.default_offer_discount_percent =
                parse_env("DEALFLOW_OFFER_DISCOUNT_PERCENT", &v)?;
        }
        if let Some(v) = lookup("DEALFLOW_WHOLESALE_FEE_PERCENT") {
            self.pricing.wholesale_fee_percent = parse_env("DEALFLOW_WHOLESALE_FEE_PERCENT", &v)?;
        }
        if let Some(v) = lookup("DEALFLOW_AGENT_TIMEOUT_SECS") {
            self.runtime.agent_timeout_secs = parse_env("DEALFLOW_AGENT_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("DEALFLOW_GENERATOR") {
            self.generator.kind = v;
        }
        if let Some(v) = lookup("DEALFLOW_GENERATOR_MODEL") {
            self.generator.model_id = v;
        }
        if let Some(v) = lookup("DEALFLOW_GENERATOR_BASE_URL") {
            self.generator.base_url = Some(v);
        }
        Ok(())
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` naming the first offending key.
    pub fn validate(&self) -> ConfigResult<()> {
        let pricing = &self.pricing;
        if !(0.0..=50.0).contains(&pricing.default_offer_discount_percent) {
            return Err(ConfigError::InvalidValue(format!(
                "pricing.default_offer_discount_percent must be within [0, 50], got {}",
                pricing.default_offer_discount_percent
            )));
        }
        for (key, value) in [
            ("pricing.wholesale_fee_percent", pricing.wholesale_fee_percent),
            ("pricing.default_repair_cost", pricing.default_repair_cost),
            ("pricing.default_holding_cost", pricing.default_holding_cost),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::InvalidValue(format!("{key} must be >= 0, got {value}")));
            }
        }

        let business = &self.business;
        if business.min_lead_score_threshold > 100 {
            return Err(ConfigError::InvalidValue(
                "business.min_lead_score_threshold must be <= 100".to_string(),
            ));
        }
        if business.reengage_score_threshold > business.min_lead_score_threshold {
            return Err(ConfigError::InvalidValue(format!(
                "business.reengage_score_threshold ({}) exceeds min_lead_score_threshold ({})",
                business.reengage_score_threshold, business.min_lead_score_threshold
            )));
        }

        let runtime = &self.runtime;
        if runtime.agent_timeout_secs == 0
            || runtime.provider_timeout_secs == 0
            || runtime.generator_timeout_secs == 0
        {
            return Err(ConfigError::InvalidValue("runtime timeouts must be non-zero".to_string()));
        }

        Ok(())
    }

    fn from_table(table: toml::Table, origin: &Path) -> ConfigResult<Self> {
        toml::Value::Table(table)
            .try_into::<Self>()
            .map_err(|e| ConfigError::ParseError(format!("{}: {e}", origin.display())))
    }
}

fn read_table(path: &Path) -> ConfigResult<toml::Table> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ReadError(format!("{}: {e}", path.display())))?;

    content
        .parse::<toml::Table>()
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))
}

/// Deep-merge `overlay` into `base`; scalar keys in `overlay` win.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(format!("{key}={value} does not parse")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.business.min_lead_score_threshold, 65);
        assert!((settings.pricing.default_offer_discount_percent - 30.0).abs() < f64::EPSILON);
        assert!((settings.pricing.wholesale_fee_percent - 6.0).abs() < f64::EPSILON);
        assert_eq!(settings.generator.kind, "mock");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[pricing]
default_offer_discount_percent = 25.0

[runtime]
agent_timeout_secs = 10
"#
        )
        .unwrap();

        let settings = Settings::load_from_file(file.path()).unwrap();
        assert!((settings.pricing.default_offer_discount_percent - 25.0).abs() < f64::EPSILON);
        assert!((settings.pricing.default_repair_cost - 50_000.0).abs() < f64::EPSILON);
        assert_eq!(settings.runtime.agent_timeout_secs, 10);
        assert_eq!(settings.runtime.provider_timeout_secs, 15);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Settings::load_from_file(Path::new("/nonexistent/dealflow.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[pricing\nbroken").unwrap();
        let result = Settings::load_from_file(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_merge_tables_is_deep() {
        let mut base: toml::Table =
            "[pricing]\nwholesale_fee_percent = 5.0\ndefault_repair_cost = 1.0".parse().unwrap();
        let overlay: toml::Table = "[pricing]\nwholesale_fee_percent = 7.0".parse().unwrap();
        merge_tables(&mut base, overlay);

        let settings = Settings::from_table(base, Path::new("test")).unwrap();
        assert!((settings.pricing.wholesale_fee_percent - 7.0).abs() < f64::EPSILON);
        assert!((settings.pricing.default_repair_cost - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("DEALFLOW_MIN_LEAD_SCORE", "70"),
            ("DEALFLOW_OFFER_DISCOUNT_PERCENT", "35.5"),
            ("DEALFLOW_GENERATOR", "openai"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.apply_env_overrides(|k| env.get(k).map(|v| (*v).to_string())).unwrap();

        assert_eq!(settings.business.min_lead_score_threshold, 70);
        assert!((settings.pricing.default_offer_discount_percent - 35.5).abs() < f64::EPSILON);
        assert_eq!(settings.generator.kind, "openai");
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let mut settings = Settings::default();
        let result = settings.apply_env_overrides(|k| {
            (k == "DEALFLOW_MIN_LEAD_SCORE").then(|| "lots".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut settings = Settings::default();
        settings.pricing.default_offer_discount_percent = 60.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.pricing.default_holding_cost = -1.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.business.reengage_score_threshold = 80;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.runtime.generator_timeout_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_round_trip_toml() {
        let settings = Settings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
