//! Integration tests for the analysis pipeline (extract -> merge -> lookup -> score -> advise)
//!
//! Collaborators are in-process stubs; nothing here touches the network.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use autolexis_analysis::ContractAnalyzer;
use autolexis_core::{
    AlternateExtractor, ContractSla, Error, ExtractionMethod, Fees, InputError, LookupError,
    Result, Severity, VehicleInfo, VehicleLookup,
};
use autolexis_tools::StubVehicleRegistry;

const LEASE: &str = "VEHICLE LEASE AGREEMENT for 36 months. Monthly payment of $459. \
    Documentation fee $695. Mileage allowance: 12000. VIN 1HGCM82633A004352.";

/// Returns a fixed partial record
struct PartialExtractor(ContractSla);

#[async_trait]
impl AlternateExtractor for PartialExtractor {
    async fn extract(&self, _text: &str) -> Result<ContractSla> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "partial"
    }
}

struct FailingExtractor;

#[async_trait]
impl AlternateExtractor for FailingExtractor {
    async fn extract(&self, _text: &str) -> Result<ContractSla> {
        Err(Error::unavailable("llm", "connection refused"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

struct SlowExtractor;

#[async_trait]
impl AlternateExtractor for SlowExtractor {
    async fn extract(&self, _text: &str) -> Result<ContractSla> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(ContractSla {
            apr_percent: Some(1.0),
            ..ContractSla::default()
        })
    }

    fn name(&self) -> &str {
        "slow"
    }
}

struct FailingRegistry;

#[async_trait]
impl VehicleLookup for FailingRegistry {
    async fn lookup(&self, _vin: &str) -> std::result::Result<VehicleInfo, LookupError> {
        Err(LookupError::Status(503))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

fn llm_partial() -> ContractSla {
    ContractSla {
        apr_percent: Some(13.5),
        monthly_payment: Some(999.0),
        fees: Fees {
            acquisition_fee: Some(895.0),
            ..Default::default()
        },
        extraction_method: Some(ExtractionMethod::Llm),
        ..ContractSla::default()
    }
}

#[tokio::test]
async fn test_hybrid_analysis_fills_gaps() {
    let analyzer = ContractAnalyzer::builder()
        .alternate(Arc::new(PartialExtractor(llm_partial())))
        .vehicle_lookup(Arc::new(StubVehicleRegistry::new()))
        .build();

    let report = analyzer.analyze(LEASE, Some("Jordan")).await.unwrap();
    let sla = &report.sla;

    // Pattern values win, alternate fills the rest
    assert_eq!(sla.monthly_payment, Some(459.0));
    assert_eq!(sla.apr_percent, Some(13.5));
    assert_eq!(sla.fees.acquisition_fee, Some(895.0));
    assert_eq!(sla.fees.documentation_fee, Some(695.0));
    assert_eq!(sla.extraction_method, Some(ExtractionMethod::Hybrid));

    // APR came from the alternate, the flag is still raised
    assert_eq!(sla.red_flags, vec!["High interest rate".to_string()]);

    assert_eq!(sla.vehicle_details.make.as_deref(), Some("HONDA"));
    assert_eq!(sla.vehicle_details.year, Some(2003));

    assert!(report
        .fairness
        .reasons
        .contains(&"High interest rate (13.5%)".to_string()));
    assert!(report
        .fairness
        .reasons
        .contains(&"High documentation fee ($695)".to_string()));
    assert!(report.fairness.score < 70);

    assert!(report
        .negotiation_points
        .iter()
        .any(|p| p.severity == Severity::High && p.message.contains("13.5%")));
    assert!(report.negotiation_email.contains("2003 HONDA Accord"));
    assert!(report.negotiation_email.contains("Jordan"));
}

#[tokio::test]
async fn test_failing_alternate_degrades_to_patterns() {
    let analyzer = ContractAnalyzer::builder()
        .alternate(Arc::new(FailingExtractor))
        .build();

    let report = analyzer.analyze(LEASE, None).await.unwrap();
    assert_eq!(report.sla.extraction_method, Some(ExtractionMethod::Regex));
    assert_eq!(report.sla.apr_percent, None);
    assert_eq!(report.sla.monthly_payment, Some(459.0));
    assert!(report.sla.red_flags.is_empty());
}

#[tokio::test]
async fn test_slow_alternate_times_out() {
    let analyzer = ContractAnalyzer::builder()
        .alternate(Arc::new(SlowExtractor))
        .alternate_timeout(Duration::from_millis(50))
        .build();

    let report = tokio::time::timeout(Duration::from_secs(2), analyzer.analyze(LEASE, None))
        .await
        .expect("analysis should not wait for the slow extractor")
        .unwrap();
    assert_eq!(report.sla.apr_percent, None);
    assert_eq!(report.sla.extraction_method, Some(ExtractionMethod::Regex));
}

#[tokio::test]
async fn test_alternate_with_nothing_new_keeps_regex_method() {
    let analyzer = ContractAnalyzer::builder()
        .alternate(Arc::new(PartialExtractor(ContractSla {
            monthly_payment: Some(500.0),
            extraction_method: Some(ExtractionMethod::Llm),
            ..ContractSla::default()
        })))
        .build();

    let report = analyzer.analyze(LEASE, None).await.unwrap();
    assert_eq!(report.sla.monthly_payment, Some(459.0));
    assert_eq!(report.sla.extraction_method, Some(ExtractionMethod::Regex));
}

#[tokio::test]
async fn test_failing_registry_leaves_details_empty() {
    let analyzer = ContractAnalyzer::builder()
        .vehicle_lookup(Arc::new(FailingRegistry))
        .build();

    let report = analyzer.analyze(LEASE, None).await.unwrap();
    assert!(report.sla.vehicle_details.is_empty());
    assert!(report.negotiation_email.contains("[Vehicle Name]"));
    assert!(report.vin_validation.unwrap().valid);
}

#[tokio::test]
async fn test_unknown_vin_is_not_fatal() {
    let analyzer = ContractAnalyzer::builder()
        .vehicle_lookup(Arc::new(StubVehicleRegistry::empty()))
        .build();

    let report = analyzer.analyze(LEASE, None).await.unwrap();
    assert!(report.sla.vehicle_details.is_empty());
}

#[tokio::test]
async fn test_invalid_vin_skips_lookup() {
    // Model year changed, check digit no longer matches
    let text = LEASE.replace("1HGCM82633A004352", "1HGCM8263XA004352");
    let analyzer = ContractAnalyzer::builder()
        .vehicle_lookup(Arc::new(StubVehicleRegistry::new().with_vehicle(
            "1HGCM8263XA004352",
            VehicleInfo {
                make: Some("SHOULD NOT APPEAR".to_string()),
                ..Default::default()
            },
        )))
        .build();

    let report = analyzer.analyze(&text, None).await.unwrap();
    let validation = report.vin_validation.unwrap();
    assert!(!validation.valid);
    assert!(validation.error.is_some());
    assert!(report.sla.vehicle_details.is_empty());
}

#[tokio::test]
async fn test_no_vin_means_no_validation() {
    let text = LEASE.replace(" VIN 1HGCM82633A004352.", " Vehicle to be assigned.");
    let report = ContractAnalyzer::new().analyze(&text, None).await.unwrap();
    assert!(report.vin_validation.is_none());
    assert!(report.sla.vin.is_none());
}

#[tokio::test]
async fn test_input_errors_are_fatal() {
    let analyzer = ContractAnalyzer::builder()
        .alternate(Arc::new(PartialExtractor(llm_partial())))
        .build();

    assert_eq!(analyzer.analyze("", None).await.unwrap_err(), InputError::Empty);
    assert!(matches!(
        analyzer.analyze("Lease for 36 months", None).await,
        Err(InputError::TooShort { length: 19, minimum: 50 })
    ));
}

#[tokio::test]
async fn test_concurrent_analyses_share_one_analyzer() {
    let analyzer = Arc::new(
        ContractAnalyzer::builder()
            .alternate(Arc::new(PartialExtractor(llm_partial())))
            .vehicle_lookup(Arc::new(StubVehicleRegistry::new()))
            .build(),
    );

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let analyzer = Arc::clone(&analyzer);
            tokio::spawn(async move { analyzer.analyze(LEASE, None).await })
        })
        .collect();

    let mut ids = std::collections::HashSet::new();
    for handle in handles {
        let report = handle.await.unwrap().unwrap();
        assert_eq!(report.sla.apr_percent, Some(13.5));
        ids.insert(report.analysis_id);
    }
    assert_eq!(ids.len(), 8);
}
