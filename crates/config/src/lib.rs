//! Configuration management for contract analysis
//!
//! Supports loading configuration from:
//! - YAML/TOML files under `config/`
//! - Environment variables (AUTOLEXIS prefix, `__` separator)
//!
//! Fairness bands can also be loaded on their own from a YAML file via
//! [`FairnessConfig::load`].

pub mod constants;
pub mod fairness;
pub mod negotiation;
pub mod settings;

pub use fairness::{
    AcquisitionFeeRules, AprRules, Band, DocumentationFeeRules, DueAtSigningRules,
    EarlyTerminationRules, FairnessConfig, LatePaymentRules, MileageRules, OverageRules,
    RedFlagRules, TermRules,
};
pub use negotiation::NegotiationConfig;
pub use settings::{
    load_settings, load_settings_from, ExtractionConfig, LlmSettings, ObservabilityConfig,
    RuntimeEnvironment, Settings, VehicleRegistryConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
