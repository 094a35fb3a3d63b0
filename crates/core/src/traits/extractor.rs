//! Alternate extraction interface

use async_trait::async_trait;

use crate::{ContractSla, Result};

/// Best-effort extractor run alongside the pattern extractor
///
/// Implementations:
/// - `LlmSlaExtractor` - chat-completion backend returning JSON
///
/// Failures are reported as `Error::ExternalUnavailable`; the pipeline
/// degrades them to an empty record.
///
/// # Example
///
/// ```ignore
/// let alt: Arc<dyn AlternateExtractor> = Arc::new(LlmSlaExtractor::new(backend, settings));
/// let partial = alt.extract(&contract_text).await.unwrap_or_default();
/// ```
#[async_trait]
pub trait AlternateExtractor: Send + Sync {
    /// Extract a (possibly partial) record from raw contract text
    async fn extract(&self, text: &str) -> Result<ContractSla>;

    /// Name for logging
    fn name(&self) -> &str;
}
