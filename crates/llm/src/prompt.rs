//! Prompt construction for SLA extraction

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_segmentation::UnicodeSegmentation;

use autolexis_config::constants::limits;
use autolexis_core::ContractSla;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

pub const SLA_SYSTEM_PROMPT: &str = "You are an AI assistant specialized in analyzing car lease and car loan contracts.\n\
Extract ONLY the requested fields.\n\
Return STRICT JSON only.\n\
Do NOT explain.\n\
Do NOT guess missing values.\n\
Use null if information is not present.";

/// Keys filled in by the analysis pipeline, never asked of the model
const ANNOTATION_KEYS: &[&str] = &[
    "schema_version",
    "negotiation_points",
    "fairness",
    "extraction_method",
];

/// Builds the system + user messages for one contract
#[derive(Debug, Clone)]
pub struct SlaPromptBuilder {
    max_input_chars: usize,
    template: String,
}

impl Default for SlaPromptBuilder {
    fn default() -> Self {
        Self::new(limits::MAX_LLM_INPUT_CHARS)
    }
}

impl SlaPromptBuilder {
    pub fn new(max_input_chars: usize) -> Self {
        Self {
            max_input_chars,
            template: schema_template(),
        }
    }

    /// JSON object the model is asked to fill
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn build(&self, contract_text: &str) -> Vec<Message> {
        let excerpt = truncate_graphemes(contract_text, self.max_input_chars);

        let user = format!(
            "Extract the following SLA details from this car lease or loan contract.\n\n\
             Return JSON with these keys ONLY, in this shape:\n{}\n\n\
             Contract text:\n\"\"\"\n{}\n\"\"\"",
            self.template, excerpt
        );

        vec![Message::system(SLA_SYSTEM_PROMPT), Message::user(user)]
    }
}

/// Empty record with annotation keys removed, pretty-printed
///
/// Rendered fresh per builder so callers never share a mutable template.
fn schema_template() -> String {
    let mut value = match serde_json::to_value(ContractSla::empty()) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Could not render SLA template");
            return "{}".to_string();
        }
    };

    if let Some(map) = value.as_object_mut() {
        for key in ANNOTATION_KEYS {
            map.remove(*key);
        }
        // Ask for the three early-termination forms explicitly
        if let Some(penalties) = map.get_mut("penalties").and_then(|p| p.as_object_mut()) {
            penalties.insert(
                "early_termination".to_string(),
                serde_json::Value::String("amount | \"No penalty\" | null".to_string()),
            );
        }
    }

    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
}

/// First `max` grapheme clusters of `text`
pub fn truncate_graphemes(text: &str, max: usize) -> &str {
    match text.grapheme_indices(true).nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
