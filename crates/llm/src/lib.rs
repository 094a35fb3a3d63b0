//! LLM integration for contract extraction
//!
//! Features:
//! - OpenAI-compatible chat backend (OpenAI, Azure OpenAI, local servers)
//! - SLA extraction prompt with a schema template
//! - `LlmSlaExtractor`, the alternate extractor used by the analysis pipeline

pub mod backend;
pub mod prompt;
pub mod sla_extractor;

pub use backend::{FinishReason, GenerationResult, LlmBackend, OpenAIBackend, OpenAIConfig};
pub use prompt::{Message, Role, SlaPromptBuilder};
pub use sla_extractor::{extract_json, LlmSlaExtractor};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for autolexis_core::Error {
    fn from(err: LlmError) -> Self {
        autolexis_core::Error::unavailable("llm", err.to_string())
    }
}
