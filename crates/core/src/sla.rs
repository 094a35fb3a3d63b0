//! Contract SLA record
//!
//! "SLA" here is the structured record of extracted contract terms. The
//! schema is fixed and versioned: every field is always present when
//! serialized, with `null` for anything that was not found.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::coerce;
use crate::fairness::FairnessResult;
use crate::negotiation::NegotiationPoint;
use crate::vehicle::VehicleInfo;

/// Current schema version written into every record
pub const SLA_SCHEMA_VERSION: u32 = 1;

fn schema_version() -> u32 {
    SLA_SCHEMA_VERSION
}

/// `"1"`, `1.0` and `1` all read as version 1; anything else is the current version
fn lenient_schema_version<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce::whole_from_value(&value).unwrap_or_else(|| {
        if !value.is_null() {
            tracing::debug!(value = %value, "Unreadable schema_version, using current");
        }
        SLA_SCHEMA_VERSION
    }))
}

/// Lease or loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContractType {
    #[serde(rename = "Vehicle Lease")]
    Lease,
    #[serde(rename = "Car Loan")]
    Loan,
}

impl ContractType {
    pub fn label(&self) -> &'static str {
        match self {
            ContractType::Lease => "Vehicle Lease",
            ContractType::Loan => "Car Loan",
        }
    }

    /// Loose classification of a free-form label
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.to_lowercase();
        if lower.contains("lease") {
            Some(ContractType::Lease)
        } else if lower.contains("loan")
            || lower.contains("financ")
            || lower.split(|c: char| !c.is_alphanumeric()).any(|w| w == "emi")
        {
            Some(ContractType::Loan)
        } else {
            None
        }
    }
}

impl<'de> Deserialize<'de> for ContractType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        ContractType::from_label(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown contract type: {label}")))
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which extractor produced the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    Regex,
    Llm,
    Hybrid,
}

/// Early-termination clause
///
/// Distinct states that must never collapse into one another: the clause
/// was not found, the contract explicitly waives the penalty, or a penalty
/// was stated. A stated penalty is either an amount or free text such as
/// "two monthly payments".
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EarlyTermination {
    #[default]
    Unspecified,
    NoPenalty,
    Amount(f64),
    Stated(String),
}

impl EarlyTermination {
    pub const UNSPECIFIED_LABEL: &'static str = "Not specified";
    pub const NO_PENALTY_LABEL: &'static str = "No penalty";

    /// A penalty was stated, as an amount or as text
    pub fn is_present(&self) -> bool {
        matches!(self, EarlyTermination::Amount(_) | EarlyTermination::Stated(_))
    }

    pub fn amount(&self) -> Option<f64> {
        match self {
            EarlyTermination::Amount(v) => Some(*v),
            _ => None,
        }
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => EarlyTermination::Unspecified,
            Value::String(s) => {
                let lower = s.trim().to_lowercase();
                if lower.is_empty()
                    || lower == "null"
                    || lower == "n/a"
                    || lower == Self::UNSPECIFIED_LABEL.to_lowercase()
                {
                    EarlyTermination::Unspecified
                } else if lower == "none"
                    || lower == Self::NO_PENALTY_LABEL.to_lowercase()
                    || lower.contains("without penalty")
                {
                    EarlyTermination::NoPenalty
                } else if let Some(amount) = coerce::parse_number(&lower) {
                    EarlyTermination::Amount(amount)
                } else {
                    EarlyTermination::Stated(s.trim().to_string())
                }
            }
            other => coerce::number_from_value(other)
                .map(EarlyTermination::Amount)
                .unwrap_or(EarlyTermination::Unspecified),
        }
    }
}

impl fmt::Display for EarlyTermination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EarlyTermination::Unspecified => f.write_str(Self::UNSPECIFIED_LABEL),
            EarlyTermination::NoPenalty => f.write_str(Self::NO_PENALTY_LABEL),
            EarlyTermination::Amount(v) => write!(f, "{v}"),
            EarlyTermination::Stated(text) => f.write_str(text),
        }
    }
}

impl Serialize for EarlyTermination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EarlyTermination::Amount(v) => serializer.serialize_f64(*v),
            EarlyTermination::Unspecified => serializer.serialize_str(Self::UNSPECIFIED_LABEL),
            EarlyTermination::NoPenalty => serializer.serialize_str(Self::NO_PENALTY_LABEL),
            EarlyTermination::Stated(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for EarlyTermination {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(EarlyTermination::from_value(&value))
    }
}

/// Up-front and one-time fees
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fees {
    #[serde(default, deserialize_with = "coerce::number")]
    pub documentation_fee: Option<f64>,
    #[serde(default, deserialize_with = "coerce::number")]
    pub acquisition_fee: Option<f64>,
    #[serde(default, deserialize_with = "coerce::number")]
    pub registration_fee: Option<f64>,
    #[serde(default, deserialize_with = "coerce::number")]
    pub other_fees: Option<f64>,
}

/// Penalty clauses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Penalties {
    #[serde(default, deserialize_with = "coerce::number")]
    pub late_payment: Option<f64>,
    #[serde(default)]
    pub early_termination: EarlyTermination,
    #[serde(default, deserialize_with = "coerce::number")]
    pub over_mileage: Option<f64>,
}

/// Structured terms of one contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractSla {
    #[serde(default = "schema_version", deserialize_with = "lenient_schema_version")]
    pub schema_version: u32,

    #[serde(default, deserialize_with = "coerce::lenient")]
    pub contract_type: Option<ContractType>,

    // Financial terms
    #[serde(default, deserialize_with = "coerce::number")]
    pub apr_percent: Option<f64>,
    #[serde(default, deserialize_with = "coerce::number")]
    pub monthly_payment: Option<f64>,
    #[serde(default, deserialize_with = "coerce::whole")]
    pub term_months: Option<u32>,
    #[serde(default, deserialize_with = "coerce::number")]
    pub down_payment: Option<f64>,
    #[serde(default, deserialize_with = "coerce::number")]
    pub finance_amount: Option<f64>,
    #[serde(default, deserialize_with = "coerce::number")]
    pub total_due_at_signing: Option<f64>,

    // Lease terms
    #[serde(default, deserialize_with = "coerce::number")]
    pub residual_value: Option<f64>,
    #[serde(default, deserialize_with = "coerce::whole")]
    pub mileage_allowance: Option<u32>,
    #[serde(default, deserialize_with = "coerce::number")]
    pub overage_charge_per_mile: Option<f64>,

    #[serde(default, deserialize_with = "coerce::lenient")]
    pub fees: Fees,
    #[serde(default, deserialize_with = "coerce::lenient")]
    pub penalties: Penalties,

    // Vehicle
    #[serde(default, deserialize_with = "coerce::text")]
    pub vin: Option<String>,
    #[serde(default, deserialize_with = "coerce::lenient")]
    pub vehicle_details: VehicleInfo,

    // Analysis annotations
    #[serde(default, deserialize_with = "coerce::strings")]
    pub red_flags: Vec<String>,
    #[serde(default, deserialize_with = "coerce::lenient")]
    pub negotiation_points: Vec<NegotiationPoint>,
    #[serde(default, deserialize_with = "coerce::lenient")]
    pub fairness: Option<FairnessResult>,

    #[serde(default, deserialize_with = "coerce::lenient")]
    pub extraction_method: Option<ExtractionMethod>,
}

impl Default for ContractSla {
    fn default() -> Self {
        Self {
            schema_version: SLA_SCHEMA_VERSION,
            contract_type: None,
            apr_percent: None,
            monthly_payment: None,
            term_months: None,
            down_payment: None,
            finance_amount: None,
            total_due_at_signing: None,
            residual_value: None,
            mileage_allowance: None,
            overage_charge_per_mile: None,
            fees: Fees::default(),
            penalties: Penalties::default(),
            vin: None,
            vehicle_details: VehicleInfo::default(),
            red_flags: Vec::new(),
            negotiation_points: Vec::new(),
            fairness: None,
            extraction_method: None,
        }
    }
}

/// Top-level keys of the serialized record
pub const SLA_FIELDS: &[&str] = &[
    "schema_version",
    "contract_type",
    "apr_percent",
    "monthly_payment",
    "term_months",
    "down_payment",
    "finance_amount",
    "total_due_at_signing",
    "residual_value",
    "mileage_allowance",
    "overage_charge_per_mile",
    "fees",
    "penalties",
    "vin",
    "vehicle_details",
    "red_flags",
    "negotiation_points",
    "fairness",
    "extraction_method",
];

impl ContractSla {
    /// Empty record with every field unset
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a record from loosely shaped JSON
    ///
    /// Unknown keys are dropped, malformed values become `None`. A value that
    /// is not a JSON object yields an empty record.
    pub fn from_value_lenient(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            tracing::warn!("SLA payload is not a JSON object, using empty record");
            return Self::empty();
        };

        let unknown: Vec<String> = map
            .keys()
            .filter(|k| !SLA_FIELDS.contains(&k.as_str()))
            .cloned()
            .collect();
        for key in &unknown {
            map.remove(key);
        }
        if !unknown.is_empty() {
            tracing::warn!(keys = ?unknown, "Dropped keys outside the SLA schema");
        }

        match serde_json::from_value(Value::Object(map)) {
            Ok(sla) => sla,
            Err(e) => {
                tracing::warn!(error = %e, "SLA payload could not be parsed, using empty record");
                Self::empty()
            }
        }
    }

    pub fn is_lease(&self) -> bool {
        self.contract_type == Some(ContractType::Lease)
    }

    /// "{year} {make} {model}" with missing parts skipped
    pub fn vehicle_name(&self) -> Option<String> {
        self.vehicle_details.display_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_record_serializes_every_key() {
        let value = serde_json::to_value(ContractSla::empty()).unwrap();
        let obj = value.as_object().unwrap();
        for key in SLA_FIELDS {
            assert!(obj.contains_key(*key), "missing key {key}");
        }
        assert_eq!(obj.len(), SLA_FIELDS.len());
        assert!(obj["apr_percent"].is_null());
        assert_eq!(obj["penalties"]["early_termination"], json!("Not specified"));
        assert!(obj["fees"]["documentation_fee"].is_null());
    }

    #[test]
    fn test_early_termination_states_stay_distinct() {
        let parse = |v: Value| -> EarlyTermination { serde_json::from_value(v).unwrap() };

        assert_eq!(parse(json!(null)), EarlyTermination::Unspecified);
        assert_eq!(parse(json!("Not specified")), EarlyTermination::Unspecified);
        assert_eq!(parse(json!("No penalty")), EarlyTermination::NoPenalty);
        assert_eq!(parse(json!("₹25000")), EarlyTermination::Amount(25000.0));
        assert_eq!(parse(json!(500)), EarlyTermination::Amount(500.0));

        assert!(parse(json!("₹25000")).is_present());
        assert!(!parse(json!("No penalty")).is_present());
        assert!(!parse(json!("Not specified")).is_present());
    }

    #[test]
    fn test_penalty_text_is_a_stated_penalty() {
        let sla = ContractSla::from_value_lenient(json!({
            "penalties": {"early_termination": "Two monthly payments"}
        }));
        assert_eq!(
            sla.penalties.early_termination,
            EarlyTermination::Stated("Two monthly payments".to_string())
        );
        assert!(sla.penalties.early_termination.is_present());
        assert_eq!(sla.penalties.early_termination.amount(), None);

        let v = serde_json::to_value(&sla.penalties).unwrap();
        assert_eq!(v["early_termination"], json!("Two monthly payments"));
    }

    #[test]
    fn test_loose_schema_version_keeps_other_fields() {
        let sla = ContractSla::from_value_lenient(json!({"schema_version": "1", "apr_percent": 9.5}));
        assert_eq!(sla.schema_version, 1);
        assert_eq!(sla.apr_percent, Some(9.5));

        let sla = ContractSla::from_value_lenient(json!({"schema_version": "v2", "monthly_payment": 410}));
        assert_eq!(sla.schema_version, SLA_SCHEMA_VERSION);
        assert_eq!(sla.monthly_payment, Some(410.0));
    }

    #[test]
    fn test_early_termination_round_trip_labels() {
        let v = serde_json::to_value(EarlyTermination::NoPenalty).unwrap();
        assert_eq!(v, json!("No penalty"));
        let back: EarlyTermination = serde_json::from_value(v).unwrap();
        assert_eq!(back, EarlyTermination::NoPenalty);
        assert_eq!(EarlyTermination::Amount(1500.0).to_string(), "1500");
    }

    #[test]
    fn test_lenient_parse_of_llm_payload() {
        let sla = ContractSla::from_value_lenient(json!({
            "contract_type": "lease agreement",
            "apr_percent": "6.5%",
            "term_months": "36 months",
            "mileage_allowance": "12,000 miles",
            "overage_charge_per_mile": "$0.25/mile",
            "fees": {"documentation_fee": "$450", "acquisition_fee": "garbage"},
            "penalties": {"early_termination": "No penalty"},
            "vehicle_details": {"make": "Toyota", "year": "2023"},
            "red_flags": "Balloon payment",
            "made_up_key": 42
        }));

        assert_eq!(sla.contract_type, Some(ContractType::Lease));
        assert_eq!(sla.apr_percent, Some(6.5));
        assert_eq!(sla.term_months, Some(36));
        assert_eq!(sla.mileage_allowance, Some(12000));
        assert_eq!(sla.overage_charge_per_mile, Some(0.25));
        assert_eq!(sla.fees.documentation_fee, Some(450.0));
        assert_eq!(sla.fees.acquisition_fee, None);
        assert_eq!(sla.penalties.early_termination, EarlyTermination::NoPenalty);
        assert_eq!(sla.vehicle_details.make.as_deref(), Some("Toyota"));
        assert_eq!(sla.vehicle_details.year, Some(2023));
        assert_eq!(sla.red_flags, vec!["Balloon payment".to_string()]);
        assert_eq!(sla.schema_version, SLA_SCHEMA_VERSION);
    }

    #[test]
    fn test_lenient_parse_non_object() {
        assert_eq!(ContractSla::from_value_lenient(json!([1, 2])), ContractSla::empty());
    }

    #[test]
    fn test_contract_type_labels() {
        assert_eq!(ContractType::from_label("Vehicle Lease"), Some(ContractType::Lease));
        assert_eq!(ContractType::from_label("Car Loan"), Some(ContractType::Loan));
        assert_eq!(ContractType::from_label("financing"), Some(ContractType::Loan));
        assert_eq!(ContractType::from_label("rental"), None);
        assert_eq!(
            serde_json::to_value(ContractType::Loan).unwrap(),
            json!("Car Loan")
        );
    }
}
