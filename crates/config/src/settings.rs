//! Main settings module

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{endpoints, limits, llm, timeouts};
use crate::{ConfigError, FairnessConfig, NegotiationConfig};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation
    #[default]
    Development,
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Pattern extraction
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Fairness scoring bands
    #[serde(default)]
    pub fairness: FairnessConfig,

    /// Negotiation thresholds
    #[serde(default)]
    pub negotiation: NegotiationConfig,

    /// Alternate (LLM) extraction
    #[serde(default)]
    pub llm: LlmSettings,

    /// VIN decoding service
    #[serde(default)]
    pub vehicle_registry: VehicleRegistryConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Pattern extraction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Minimum contract length in characters
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,

    /// APR above this is recorded as a red flag
    #[serde(default = "default_high_apr_red_flag")]
    pub high_apr_red_flag: f64,
}

fn default_min_text_length() -> usize {
    limits::MIN_CONTRACT_TEXT_CHARS
}

fn default_high_apr_red_flag() -> f64 {
    12.0
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_length: default_min_text_length(),
            high_apr_red_flag: default_high_apr_red_flag(),
        }
    }
}

/// OpenAI-compatible chat backend used for alternate extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Disabled by default; the pipeline then runs on patterns alone
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Read from OPENAI_API_KEY when not configured
    #[serde(default = "default_api_key", skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    /// Leading characters of the contract sent in the prompt
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
}

fn default_llm_endpoint() -> String {
    std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| endpoints::OPENAI_DEFAULT.to_string())
}

fn default_llm_model() -> String {
    llm::DEFAULT_MODEL.to_string()
}

fn default_api_key() -> Option<String> {
    std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty())
}

fn default_max_tokens() -> u32 {
    llm::DEFAULT_MAX_TOKENS
}

fn default_llm_timeout() -> u64 {
    timeouts::LLM_SECS
}

fn default_max_input_chars() -> usize {
    limits::MAX_LLM_INPUT_CHARS
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            api_key: default_api_key(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            timeout_secs: default_llm_timeout(),
            max_input_chars: default_max_input_chars(),
        }
    }
}

/// Vehicle registry (VIN decoder) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleRegistryConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_registry_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_registry_timeout")]
    pub timeout_secs: u64,

    /// Attach a heuristic market price to decoded vehicles
    #[serde(default = "default_true")]
    pub estimate_price: bool,
}

fn default_registry_endpoint() -> String {
    endpoints::NHTSA_VPIC_DEFAULT.to_string()
}

fn default_registry_timeout() -> u64 {
    timeouts::VEHICLE_REGISTRY_SECS
}

fn default_true() -> bool {
    true
}

impl Default for VehicleRegistryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_registry_endpoint(),
            timeout_secs: default_registry_timeout(),
            estimate_price: true,
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_extraction()?;
        self.fairness.validate()?;
        self.negotiation.validate()?;
        self.validate_llm()?;
        self.validate_registry()?;
        Ok(())
    }

    fn validate_extraction(&self) -> Result<(), ConfigError> {
        if self.extraction.min_text_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "extraction.min_text_length".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    fn validate_llm(&self) -> Result<(), ConfigError> {
        let llm = &self.llm;
        if !llm.enabled {
            return Ok(());
        }

        if !(0.0..=2.0).contains(&llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", llm.temperature),
            });
        }

        if llm.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.timeout_secs".to_string(),
                message: "Must be at least 1 second".to_string(),
            });
        }

        if llm.api_key.is_none() {
            if self.environment.is_strict() {
                return Err(ConfigError::MissingField("llm.api_key".to_string()));
            }
            tracing::warn!("LLM extraction enabled without an API key; requests will be unauthenticated");
        }

        Ok(())
    }

    fn validate_registry(&self) -> Result<(), ConfigError> {
        let registry = &self.vehicle_registry;
        if registry.enabled && !registry.endpoint.starts_with("http") {
            return Err(ConfigError::InvalidValue {
                field: "vehicle_registry.endpoint".to_string(),
                message: format!("Must be an http(s) URL, got {}", registry.endpoint),
            });
        }
        Ok(())
    }
}

/// Load settings from `config/` and the environment
///
/// Sources, later ones overriding earlier ones:
/// 1. `config/default.{yaml,toml,json}`
/// 2. `config/fairness.yaml`, read as the `fairness` section
/// 3. `config/{env}.{yaml,toml,json}`
/// 4. `AUTOLEXIS__SECTION__KEY` environment variables
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Same as [`load_settings`] with an explicit config directory
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    let default_path = dir.join("default");
    builder = builder.add_source(File::with_name(&default_path.to_string_lossy()).required(false));

    let fairness_path = dir.join(FAIRNESS_FILE);
    if fairness_path.is_file() {
        let section = fairness_section(&fairness_path)?;
        builder = builder.add_source(File::from_str(&section, FileFormat::Yaml));
        tracing::debug!(path = %fairness_path.display(), "Layered fairness bands");
    }

    if let Some(env_name) = env {
        let env_path = dir.join(env_name);
        builder = builder.add_source(File::with_name(&env_path.to_string_lossy()).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("AUTOLEXIS")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

/// Standalone fairness band file, relative to the config directory
pub const FAIRNESS_FILE: &str = "fairness.yaml";

/// Re-root a top-level fairness file under a `fairness:` key
fn fairness_section(path: &Path) -> Result<String, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;
    let bands: serde_yaml::Value =
        serde_yaml::from_str(&raw).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    if bands.is_null() {
        return Ok(String::new());
    }

    let mut root = serde_yaml::Mapping::new();
    root.insert(serde_yaml::Value::from("fairness"), bands);
    serde_yaml::to_string(&root).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.extraction.min_text_length, 50);
        assert_eq!(settings.llm.model, "gpt-4o-mini");
        assert_eq!(settings.llm.max_input_chars, 6000);
        assert!(!settings.llm.enabled);
        assert!(!settings.vehicle_registry.enabled);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.llm.enabled = true;
        settings.llm.temperature = 3.5;
        assert!(settings.validate().is_err());

        settings.llm.temperature = 0.0;
        settings.llm.api_key = Some("sk-test".to_string());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_production_requires_api_key() {
        let mut settings = Settings::default();
        settings.environment = RuntimeEnvironment::Production;
        settings.llm.enabled = true;
        settings.llm.api_key = None;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::MissingField(_))
        ));
    }

    #[test]
    fn test_registry_endpoint_validation() {
        let mut settings = Settings::default();
        settings.vehicle_registry.enabled = true;
        settings.vehicle_registry.endpoint = "vpic.nhtsa.dot.gov".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_layered_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.yaml"),
            "extraction:\n  min_text_length: 80\nnegotiation:\n  currency_symbol: \"₹\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("staging.yaml"),
            "environment: staging\nextraction:\n  high_apr_red_flag: 10.0\n",
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), Some("staging")).unwrap();
        assert_eq!(settings.environment, RuntimeEnvironment::Staging);
        assert_eq!(settings.extraction.min_text_length, 80);
        assert_eq!(settings.extraction.high_apr_red_flag, 10.0);
        assert_eq!(settings.negotiation.currency_symbol, "₹");
        assert_eq!(settings.fairness.base_score, 100);
    }

    #[test]
    fn test_fairness_file_is_layered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(FAIRNESS_FILE),
            "early_termination:\n  deduction: 25\ndue_at_signing:\n  high:\n    above: 3000.0\n    deduction: 5\n",
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), None).unwrap();
        assert_eq!(settings.fairness.early_termination.deduction, 25);
        assert_eq!(settings.fairness.due_at_signing.high.above, 3000.0);
        assert_eq!(settings.fairness.apr.high.above, 12.0);
    }

    #[test]
    fn test_env_file_overrides_fairness_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FAIRNESS_FILE), "early_termination:\n  deduction: 25\n")
            .unwrap();
        std::fs::write(
            dir.path().join("staging.yaml"),
            "fairness:\n  early_termination:\n    deduction: 30\n",
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), Some("staging")).unwrap();
        assert_eq!(settings.fairness.early_termination.deduction, 30);
    }

    #[test]
    fn test_shipped_fairness_file_matches_defaults() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config");
        let settings = load_settings_from(&dir, None).unwrap();
        assert_eq!(settings.fairness.early_termination.deduction, 15);
        assert_eq!(settings.fairness.apr.very_high.above, 15.0);
    }

    #[test]
    fn test_load_without_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(dir.path(), None).unwrap();
        assert_eq!(settings.extraction.min_text_length, 50);
    }

    #[test]
    fn test_settings_serialize_to_toml() {
        let settings = Settings::default();
        let rendered = toml::to_string(&settings).unwrap();
        assert!(rendered.contains("[extraction]"));
        assert!(!rendered.contains("api_key"));
    }
}
