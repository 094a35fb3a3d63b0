//! Centralized constants
//!
//! Default values shared between the config structs and the crates that
//! consume them.

/// Input limits for contract text
pub mod limits {
    /// Texts shorter than this (in characters) are rejected
    pub const MIN_CONTRACT_TEXT_CHARS: usize = 50;

    /// Characters of contract text sent to the LLM
    pub const MAX_LLM_INPUT_CHARS: usize = 6000;

    /// Negotiation points carried into the email draft
    pub const MAX_EMAIL_POINTS: usize = 5;
}

/// External service endpoints
pub mod endpoints {
    /// OpenAI-compatible chat completions base URL
    pub const OPENAI_DEFAULT: &str = "https://api.openai.com/v1";

    /// NHTSA vPIC vehicle API
    pub const NHTSA_VPIC_DEFAULT: &str = "https://vpic.nhtsa.dot.gov/api/vehicles";
}

/// Network timeouts (seconds)
pub mod timeouts {
    pub const LLM_SECS: u64 = 30;
    pub const VEHICLE_REGISTRY_SECS: u64 = 10;
}

/// LLM defaults
pub mod llm {
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
    pub const DEFAULT_MAX_TOKENS: u32 = 1024;
}
