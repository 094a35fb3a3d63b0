//! LLM-backed alternate extractor

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use autolexis_config::LlmSettings;
use autolexis_core::{AlternateExtractor, ContractSla, Error, ExtractionMethod, Result};

use crate::backend::{FinishReason, LlmBackend};
use crate::prompt::SlaPromptBuilder;

/// Asks a chat model for the SLA record and salvages its JSON reply
pub struct LlmSlaExtractor {
    backend: Arc<dyn LlmBackend>,
    prompt: SlaPromptBuilder,
}

impl LlmSlaExtractor {
    pub fn new(backend: Arc<dyn LlmBackend>, settings: &LlmSettings) -> Self {
        Self {
            backend,
            prompt: SlaPromptBuilder::new(settings.max_input_chars),
        }
    }

    pub fn with_prompt(backend: Arc<dyn LlmBackend>, prompt: SlaPromptBuilder) -> Self {
        Self { backend, prompt }
    }
}

#[async_trait]
impl AlternateExtractor for LlmSlaExtractor {
    async fn extract(&self, text: &str) -> Result<ContractSla> {
        let messages = self.prompt.build(text);
        let result = self.backend.generate(&messages).await?;

        if result.finish_reason == FinishReason::Length {
            tracing::warn!(
                model = self.backend.model_name(),
                tokens = result.tokens,
                "LLM reply hit the token limit, JSON may be cut off"
            );
        }

        let value = extract_json(&result.text).ok_or_else(|| {
            tracing::debug!(reply = %result.text, "No JSON object in LLM reply");
            Error::unavailable("llm", "reply did not contain a JSON object")
        })?;

        let mut sla = ContractSla::from_value_lenient(value);
        // Annotations belong to the pipeline
        sla.fairness = None;
        sla.negotiation_points.clear();
        sla.extraction_method = Some(ExtractionMethod::Llm);

        tracing::debug!(
            model = self.backend.model_name(),
            total_time_ms = result.total_time_ms,
            "LLM extraction parsed"
        );

        Ok(sla)
    }

    fn name(&self) -> &str {
        "llm"
    }
}

/// Pull a JSON object out of a model reply
///
/// Tried in order: the whole reply, a ```json fence, a bare ``` fence, and
/// the first balanced `{...}` in surrounding prose.
pub fn extract_json(reply: &str) -> Option<Value> {
    let trimmed = reply.trim();

    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    [fenced(trimmed, "```json"), fenced(trimmed, "```")]
        .into_iter()
        .flatten()
        .chain(balanced_object(trimmed))
        .find_map(|candidate| match serde_json::from_str::<Value>(candidate) {
            Ok(value @ Value::Object(_)) => Some(value),
            _ => None,
        })
}

fn fenced<'a>(s: &'a str, opener: &str) -> Option<&'a str> {
    let start = s.find(opener)? + opener.len();
    let end = s[start..].find("```")?;
    Some(s[start..start + end].trim())
}

fn balanced_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&s[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
