//! Contract analysis pipeline
//!
//! ```text
//! text ─► pattern extraction ─┐
//!      └► alternate (LLM) ────┴► merge ─► VIN lookup ─► fairness ─► negotiation ─► report
//! ```
//!
//! Only an `InputError` from pattern extraction can fail an analysis. The
//! alternate extractor and the vehicle registry are optional, run under a
//! timeout, and degrade to empty results when they fail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use autolexis_config::constants::timeouts;
use autolexis_config::{ExtractionConfig, FairnessConfig, NegotiationConfig, Settings};
use autolexis_core::{
    AlternateExtractor, ContractSla, ExtractionMethod, FairnessResult, InputError,
    NegotiationPoint, VehicleLookup, VinValidation,
};
use autolexis_text_processing::{validate_vin, ContractExtractor};

use crate::fairness::FairnessEngine;
use crate::merge::merge_sla_tracked;
use crate::negotiation::NegotiationAdvisor;

/// One complete, self-consistent analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    /// Reconciled record, annotated with fairness and negotiation points
    pub sla: ContractSla,
    pub fairness: FairnessResult,
    pub negotiation_points: Vec<NegotiationPoint>,
    pub negotiation_email: String,
    /// `None` when the contract states no VIN
    pub vin_validation: Option<VinValidation>,
}

/// Analyzes contract text end to end
///
/// Build once per process and share; it holds no per-contract state.
pub struct ContractAnalyzer {
    extractor: ContractExtractor,
    fairness: FairnessEngine,
    advisor: NegotiationAdvisor,
    alternate: Option<Arc<dyn AlternateExtractor>>,
    vehicle_lookup: Option<Arc<dyn VehicleLookup>>,
    alternate_timeout: Duration,
    lookup_timeout: Duration,
}

impl ContractAnalyzer {
    pub fn builder() -> ContractAnalyzerBuilder {
        ContractAnalyzerBuilder::default()
    }

    /// Pattern extraction only, default thresholds
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn has_alternate(&self) -> bool {
        self.alternate.is_some()
    }

    pub fn has_vehicle_lookup(&self) -> bool {
        self.vehicle_lookup.is_some()
    }

    /// Run the full pipeline on one contract
    pub async fn analyze(
        &self,
        text: &str,
        customer_name: Option<&str>,
    ) -> Result<AnalysisReport, InputError> {
        let analysis_id = Uuid::new_v4();
        let rule = self.extractor.extract(text)?;

        let alt = self.alternate_extraction(text, &analysis_id).await;
        let (mut sla, filled) = merge_sla_tracked(rule, alt);
        if !filled.is_empty() {
            tracing::debug!(%analysis_id, fields = ?filled, "Alternate extraction filled gaps");
            sla.extraction_method = Some(ExtractionMethod::Hybrid);
        }

        // Fields filled by the alternate can raise new flags
        for flag in self.extractor.red_flags(&sla) {
            if !sla.red_flags.contains(&flag) {
                sla.red_flags.push(flag);
            }
        }

        let vin_validation = sla.vin.as_deref().map(validate_vin);
        if let Some(validation) = &vin_validation {
            if validation.valid && sla.vehicle_details.is_empty() {
                if let Some(info) = self.lookup_vehicle(&validation.vin, &analysis_id).await {
                    sla.vehicle_details = info;
                }
            } else if !validation.valid {
                tracing::debug!(
                    %analysis_id,
                    vin = %validation.vin,
                    reason = ?validation.error,
                    "VIN failed validation, skipping lookup"
                );
            }
        }

        let fairness = self.fairness.score(&sla);
        let negotiation_points = self.advisor.points(&sla, &fairness);
        let negotiation_email = self.advisor.email(&sla, &negotiation_points, customer_name);

        sla.fairness = Some(fairness.clone());
        sla.negotiation_points = negotiation_points.clone();

        metrics::counter!("autolexis_contracts_analyzed_total").increment(1);
        metrics::histogram!("autolexis_fairness_score").record(f64::from(fairness.score));

        tracing::info!(
            %analysis_id,
            method = ?sla.extraction_method,
            score = fairness.score,
            grade = %fairness.grade,
            points = negotiation_points.len(),
            "Contract analyzed"
        );

        Ok(AnalysisReport {
            analysis_id,
            analyzed_at: Utc::now(),
            sla,
            fairness,
            negotiation_points,
            negotiation_email,
            vin_validation,
        })
    }

    async fn alternate_extraction(&self, text: &str, analysis_id: &Uuid) -> ContractSla {
        let Some(alternate) = &self.alternate else {
            return ContractSla::empty();
        };

        let failure = match tokio::time::timeout(self.alternate_timeout, alternate.extract(text)).await
        {
            Ok(Ok(sla)) => return sla,
            Ok(Err(e)) => e.to_string(),
            Err(_elapsed) => format!("timed out after {:?}", self.alternate_timeout),
        };

        metrics::counter!("autolexis_alternate_extraction_failures_total").increment(1);
        tracing::warn!(
            %analysis_id,
            extractor = alternate.name(),
            error = %failure,
            "Alternate extraction unavailable, continuing with pattern result"
        );
        ContractSla::empty()
    }

    async fn lookup_vehicle(
        &self,
        vin: &str,
        analysis_id: &Uuid,
    ) -> Option<autolexis_core::VehicleInfo> {
        let lookup = self.vehicle_lookup.as_ref()?;

        let failure = match tokio::time::timeout(self.lookup_timeout, lookup.lookup(vin)).await {
            Ok(Ok(info)) => return Some(info),
            Ok(Err(e)) => e.to_string(),
            Err(_elapsed) => format!("timed out after {:?}", self.lookup_timeout),
        };

        metrics::counter!("autolexis_vehicle_lookup_failures_total").increment(1);
        tracing::warn!(
            %analysis_id,
            registry = lookup.name(),
            vin,
            error = %failure,
            "Vehicle lookup failed, leaving details empty"
        );
        None
    }
}

impl Default for ContractAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ContractAnalyzer`]
pub struct ContractAnalyzerBuilder {
    extraction: ExtractionConfig,
    fairness: FairnessConfig,
    negotiation: NegotiationConfig,
    alternate: Option<Arc<dyn AlternateExtractor>>,
    vehicle_lookup: Option<Arc<dyn VehicleLookup>>,
    alternate_timeout: Duration,
    lookup_timeout: Duration,
}

impl Default for ContractAnalyzerBuilder {
    fn default() -> Self {
        Self {
            extraction: ExtractionConfig::default(),
            fairness: FairnessConfig::default(),
            negotiation: NegotiationConfig::default(),
            alternate: None,
            vehicle_lookup: None,
            alternate_timeout: Duration::from_secs(timeouts::LLM_SECS),
            lookup_timeout: Duration::from_secs(timeouts::VEHICLE_REGISTRY_SECS),
        }
    }
}

impl ContractAnalyzerBuilder {
    /// Thresholds and timeouts from loaded settings
    ///
    /// Collaborators are not created here; pass them in separately.
    pub fn settings(mut self, settings: &Settings) -> Self {
        self.extraction = settings.extraction.clone();
        self.fairness = settings.fairness.clone();
        self.negotiation = settings.negotiation.clone();
        self.alternate_timeout = Duration::from_secs(settings.llm.timeout_secs);
        self.lookup_timeout = Duration::from_secs(settings.vehicle_registry.timeout_secs);
        self
    }

    pub fn extraction(mut self, config: ExtractionConfig) -> Self {
        self.extraction = config;
        self
    }

    pub fn fairness(mut self, config: FairnessConfig) -> Self {
        self.fairness = config;
        self
    }

    pub fn negotiation(mut self, config: NegotiationConfig) -> Self {
        self.negotiation = config;
        self
    }

    pub fn alternate(mut self, extractor: Arc<dyn AlternateExtractor>) -> Self {
        self.alternate = Some(extractor);
        self
    }

    pub fn vehicle_lookup(mut self, lookup: Arc<dyn VehicleLookup>) -> Self {
        self.vehicle_lookup = Some(lookup);
        self
    }

    pub fn alternate_timeout(mut self, timeout: Duration) -> Self {
        self.alternate_timeout = timeout;
        self
    }

    pub fn lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn build(self) -> ContractAnalyzer {
        ContractAnalyzer {
            extractor: ContractExtractor::with_config(self.extraction),
            fairness: FairnessEngine::new(self.fairness),
            advisor: NegotiationAdvisor::new(self.negotiation),
            alternate: self.alternate,
            vehicle_lookup: self.vehicle_lookup,
            alternate_timeout: self.alternate_timeout,
            lookup_timeout: self.lookup_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = "Car loan agreement with ABC Finance. APR: 6.5%. \
        Monthly payment $512 for 60 months. Down payment $3,000. \
        Documentation fee $199. VIN 1HGCM82633A004352.";

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_analyzer_is_shareable() {
        assert_send_sync::<ContractAnalyzer>();
    }

    #[tokio::test]
    async fn test_pattern_only_analysis() {
        let analyzer = ContractAnalyzer::new();
        assert!(!analyzer.has_alternate());
        assert!(!analyzer.has_vehicle_lookup());

        let report = analyzer.analyze(CONTRACT, None).await.unwrap();
        assert_eq!(report.sla.extraction_method, Some(ExtractionMethod::Regex));
        assert_eq!(report.sla.apr_percent, Some(6.5));
        assert_eq!(report.sla.fairness.as_ref(), Some(&report.fairness));
        assert_eq!(report.sla.negotiation_points, report.negotiation_points);
        assert!(report.vin_validation.as_ref().is_some_and(|v| v.valid));
        assert!(report.sla.vehicle_details.is_empty());
        assert!(report.negotiation_email.contains("[Vehicle Name]"));
    }

    #[tokio::test]
    async fn test_short_text_is_rejected() {
        let err = ContractAnalyzer::new().analyze("Lease, 36 months", None).await.unwrap_err();
        assert!(matches!(err, InputError::TooShort { .. }));
    }

    #[tokio::test]
    async fn test_settings_thresholds_apply() {
        let mut settings = Settings::default();
        settings.extraction.min_text_length = 500;
        let analyzer = ContractAnalyzer::builder().settings(&settings).build();
        assert!(analyzer.analyze(CONTRACT, None).await.is_err());
    }

    #[test]
    fn test_report_serializes() {
        let report = AnalysisReport {
            analysis_id: Uuid::nil(),
            analyzed_at: Utc::now(),
            sla: ContractSla::empty(),
            fairness: crate::score_fairness(&ContractSla::empty()),
            negotiation_points: Vec::new(),
            negotiation_email: String::new(),
            vin_validation: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["analysis_id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["fairness"]["score"], 100);
        assert!(json["vin_validation"].is_null());
    }
}
