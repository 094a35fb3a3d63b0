//! Vehicle registry integrations
//!
//! Both implementations satisfy `VehicleLookup`; the analysis pipeline holds
//! whichever one was configured behind an `Arc<dyn VehicleLookup>`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use autolexis_config::VehicleRegistryConfig;
use autolexis_core::{LookupError, VehicleInfo, VehicleLookup};

use crate::market_price::attach_market_price;

// ============================================================================
// NHTSA vPIC
// ============================================================================

/// VIN decoder backed by the NHTSA vPIC `DecodeVin` endpoint
pub struct NhtsaVehicleRegistry {
    client: Client,
    endpoint: String,
    estimate_price: bool,
}

impl NhtsaVehicleRegistry {
    pub fn new(config: &VehicleRegistryConfig) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LookupError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            estimate_price: config.estimate_price,
        })
    }

    fn decode_url(&self, vin: &str) -> String {
        format!("{}/DecodeVin/{}?format=json", self.endpoint, vin)
    }
}

#[async_trait]
impl VehicleLookup for NhtsaVehicleRegistry {
    async fn lookup(&self, vin: &str) -> Result<VehicleInfo, LookupError> {
        let response = self
            .client
            .get(self.decode_url(vin))
            .send()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body: DecodeVinResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Malformed(e.to_string()))?;

        let mut info = vehicle_from_results(&body.results);
        if info.make.is_none() && info.model.is_none() && info.year.is_none() {
            return Err(LookupError::NotFound(vin.to_string()));
        }

        if self.estimate_price {
            attach_market_price(&mut info);
        }

        tracing::debug!(
            vin,
            make = info.make.as_deref().unwrap_or(""),
            model = info.model.as_deref().unwrap_or(""),
            "Decoded VIN"
        );

        Ok(info)
    }

    fn name(&self) -> &str {
        "nhtsa-vpic"
    }
}

#[derive(Debug, Deserialize)]
struct DecodeVinResponse {
    #[serde(rename = "Results", default)]
    results: Vec<DecodeVinItem>,
}

#[derive(Debug, Deserialize)]
struct DecodeVinItem {
    #[serde(rename = "Variable")]
    variable: String,
    #[serde(rename = "Value")]
    value: Option<String>,
}

/// Map vPIC `Variable`/`Value` rows onto vehicle details
///
/// Blank values are ignored.
fn vehicle_from_results(results: &[DecodeVinItem]) -> VehicleInfo {
    let values: HashMap<&str, &str> = results
        .iter()
        .filter_map(|item| {
            let value = item.value.as_deref()?.trim();
            (!value.is_empty()).then_some((item.variable.as_str(), value))
        })
        .collect();

    let text = |key: &str| values.get(key).map(|v| v.to_string());

    VehicleInfo {
        make: text("Make"),
        model: text("Model"),
        year: values.get("Model Year").and_then(|y| y.parse().ok()),
        body_class: text("Body Class"),
        engine: text("Engine Model"),
        estimated_market_price: None,
    }
}

// ============================================================================
// Stub
// ============================================================================

/// Stub registry for development/testing
///
/// Returns canned vehicles without touching the network.
pub struct StubVehicleRegistry {
    vehicles: HashMap<String, VehicleInfo>,
}

impl StubVehicleRegistry {
    pub fn new() -> Self {
        let mut vehicles = HashMap::new();
        vehicles.insert(
            "1HGCM82633A004352".to_string(),
            VehicleInfo {
                make: Some("HONDA".to_string()),
                model: Some("Accord".to_string()),
                year: Some(2003),
                body_class: Some("Coupe".to_string()),
                engine: Some("J30A4".to_string()),
                estimated_market_price: None,
            },
        );
        Self { vehicles }
    }

    /// Empty registry; every lookup fails with `NotFound`
    pub fn empty() -> Self {
        Self {
            vehicles: HashMap::new(),
        }
    }

    pub fn with_vehicle(mut self, vin: impl Into<String>, info: VehicleInfo) -> Self {
        self.vehicles.insert(vin.into(), info);
        self
    }
}

impl Default for StubVehicleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VehicleLookup for StubVehicleRegistry {
    async fn lookup(&self, vin: &str) -> Result<VehicleInfo, LookupError> {
        tracing::info!(vin, "Stub registry: lookup");
        self.vehicles
            .get(vin)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(vin.to_string()))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Count": 5,
        "Message": "Results returned successfully",
        "Results": [
            {"Value": "HONDA", "ValueId": "474", "Variable": "Make", "VariableId": 26},
            {"Value": "Accord", "ValueId": "1861", "Variable": "Model", "VariableId": 28},
            {"Value": "2003", "ValueId": "", "Variable": "Model Year", "VariableId": 29},
            {"Value": "Coupe", "ValueId": "3", "Variable": "Body Class", "VariableId": 5},
            {"Value": "", "ValueId": "", "Variable": "Engine Model", "VariableId": 18},
            {"Value": null, "ValueId": null, "Variable": "Trim", "VariableId": 38}
        ]
    }"#;

    #[test]
    fn test_vehicle_from_results() {
        let body: DecodeVinResponse = serde_json::from_str(SAMPLE).unwrap();
        let info = vehicle_from_results(&body.results);
        assert_eq!(info.make.as_deref(), Some("HONDA"));
        assert_eq!(info.model.as_deref(), Some("Accord"));
        assert_eq!(info.year, Some(2003));
        assert_eq!(info.body_class.as_deref(), Some("Coupe"));
        assert!(info.engine.is_none());
        assert_eq!(info.display_name().as_deref(), Some("2003 HONDA Accord"));
    }

    #[test]
    fn test_empty_results() {
        let body: DecodeVinResponse = serde_json::from_str(r#"{"Results": []}"#).unwrap();
        assert!(vehicle_from_results(&body.results).is_empty());
    }

    #[test]
    fn test_decode_url() {
        let mut config = VehicleRegistryConfig::default();
        config.endpoint = "https://vpic.example.test/api/vehicles/".to_string();
        let registry = NhtsaVehicleRegistry::new(&config).unwrap();
        assert_eq!(
            registry.decode_url("1HGCM82633A004352"),
            "https://vpic.example.test/api/vehicles/DecodeVin/1HGCM82633A004352?format=json"
        );
    }

    #[tokio::test]
    async fn test_unreachable_registry_is_request_error() {
        let mut config = VehicleRegistryConfig::default();
        config.endpoint = "http://127.0.0.1:9".to_string();
        config.timeout_secs = 1;
        let registry = NhtsaVehicleRegistry::new(&config).unwrap();

        let err = registry.lookup("1HGCM82633A004352").await.unwrap_err();
        assert!(matches!(err, LookupError::Request(_)));
    }

    #[tokio::test]
    async fn test_stub_registry() {
        let registry = StubVehicleRegistry::new();
        let info = registry.lookup("1HGCM82633A004352").await.unwrap();
        assert_eq!(info.model.as_deref(), Some("Accord"));

        let err = registry.lookup("11111111111111111").await.unwrap_err();
        assert_eq!(err, LookupError::NotFound("11111111111111111".to_string()));

        let registry = StubVehicleRegistry::empty().with_vehicle(
            "11111111111111111",
            VehicleInfo {
                make: Some("KIA".to_string()),
                ..Default::default()
            },
        );
        assert!(registry.lookup("11111111111111111").await.is_ok());
    }
}
