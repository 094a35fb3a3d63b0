//! Fairness scoring thresholds
//!
//! Every deduction in the fairness model is a band: a value strictly above
//! `above` costs `deduction` points. Bands within one factor are checked from
//! the harshest to the mildest and the first hit wins.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// "Strictly above `above` costs `deduction` points"
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub above: f64,
    pub deduction: i32,
}

impl Band {
    pub const fn new(above: f64, deduction: i32) -> Self {
        Self { above, deduction }
    }

    pub fn hit(&self, value: f64) -> bool {
        value > self.above
    }
}

/// Fairness model configuration loaded from fairness.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessConfig {
    #[serde(default = "default_base_score")]
    pub base_score: i32,
    #[serde(default)]
    pub apr: AprRules,
    #[serde(default)]
    pub early_termination: EarlyTerminationRules,
    #[serde(default)]
    pub late_payment: LatePaymentRules,
    #[serde(default)]
    pub documentation_fee: DocumentationFeeRules,
    #[serde(default)]
    pub acquisition_fee: AcquisitionFeeRules,
    #[serde(default)]
    pub mileage: MileageRules,
    #[serde(default)]
    pub overage: OverageRules,
    #[serde(default)]
    pub red_flags: RedFlagRules,
    #[serde(default)]
    pub term: TermRules,
    #[serde(default)]
    pub due_at_signing: DueAtSigningRules,
}

fn default_base_score() -> i32 {
    100
}

impl Default for FairnessConfig {
    fn default() -> Self {
        Self {
            base_score: default_base_score(),
            apr: AprRules::default(),
            early_termination: EarlyTerminationRules::default(),
            late_payment: LatePaymentRules::default(),
            documentation_fee: DocumentationFeeRules::default(),
            acquisition_fee: AcquisitionFeeRules::default(),
            mileage: MileageRules::default(),
            overage: OverageRules::default(),
            red_flags: RedFlagRules::default(),
            term: TermRules::default(),
            due_at_signing: DueAtSigningRules::default(),
        }
    }
}

/// APR bands; rates below `excellent_below` are noted as a positive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AprRules {
    pub very_high: Band,
    pub high: Band,
    pub above_average: Band,
    pub excellent_below: f64,
    /// Points added for an excellent rate. Zero keeps the note informational.
    pub excellent_bonus: i32,
}

impl Default for AprRules {
    fn default() -> Self {
        Self {
            very_high: Band::new(15.0, 25),
            high: Band::new(12.0, 20),
            above_average: Band::new(8.0, 10),
            excellent_below: 5.0,
            excellent_bonus: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarlyTerminationRules {
    pub deduction: i32,
}

impl Default for EarlyTerminationRules {
    fn default() -> Self {
        Self { deduction: 15 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatePaymentRules {
    pub high: Band,
    pub moderate: Band,
}

impl Default for LatePaymentRules {
    fn default() -> Self {
        Self {
            high: Band::new(50.0, 10),
            moderate: Band::new(25.0, 5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentationFeeRules {
    pub excessive: Band,
    pub high: Band,
    pub above_average: Band,
}

impl Default for DocumentationFeeRules {
    fn default() -> Self {
        Self {
            excessive: Band::new(1000.0, 15),
            high: Band::new(500.0, 10),
            above_average: Band::new(300.0, 5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionFeeRules {
    pub high: Band,
}

impl Default for AcquisitionFeeRules {
    fn default() -> Self {
        Self {
            high: Band::new(1000.0, 10),
        }
    }
}

/// Annual mileage allowance; lower is worse, so these are "below" limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MileageRules {
    pub very_low_below: u32,
    pub very_low_deduction: i32,
    pub low_below: u32,
    pub low_deduction: i32,
    pub generous_at_least: u32,
}

impl Default for MileageRules {
    fn default() -> Self {
        Self {
            very_low_below: 10_000,
            very_low_deduction: 15,
            low_below: 12_000,
            low_deduction: 10,
            generous_at_least: 15_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverageRules {
    pub high: Band,
    pub above_average: Band,
    pub low_at_most: f64,
}

impl Default for OverageRules {
    fn default() -> Self {
        Self {
            high: Band::new(0.25, 10),
            above_average: Band::new(0.20, 5),
            low_at_most: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedFlagRules {
    pub per_flag: i32,
    pub max_deduction: i32,
    /// Points added when no red flag is present. Zero keeps the note informational.
    pub clean_bonus: i32,
}

impl Default for RedFlagRules {
    fn default() -> Self {
        Self {
            per_flag: 5,
            max_deduction: 20,
            clean_bonus: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermRules {
    pub very_long: Band,
    pub long: Band,
}

impl Default for TermRules {
    fn default() -> Self {
        Self {
            very_long: Band::new(72.0, 10),
            long: Band::new(60.0, 5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DueAtSigningRules {
    pub high: Band,
}

impl Default for DueAtSigningRules {
    fn default() -> Self {
        Self {
            high: Band::new(5000.0, 5),
        }
    }
}

impl FairnessConfig {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|_| ConfigError::FileNotFound(path.as_ref().display().to_string()))?;

        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Bands within a factor must get milder as the threshold drops
    pub fn validate(&self) -> Result<(), ConfigError> {
        ordered("fairness.apr", &[self.apr.very_high, self.apr.high, self.apr.above_average])?;
        ordered(
            "fairness.late_payment",
            &[self.late_payment.high, self.late_payment.moderate],
        )?;
        ordered(
            "fairness.documentation_fee",
            &[
                self.documentation_fee.excessive,
                self.documentation_fee.high,
                self.documentation_fee.above_average,
            ],
        )?;
        ordered("fairness.overage", &[self.overage.high, self.overage.above_average])?;
        ordered("fairness.term", &[self.term.very_long, self.term.long])?;

        if self.mileage.very_low_below > self.mileage.low_below {
            return Err(ConfigError::InvalidValue {
                field: "fairness.mileage.very_low_below".to_string(),
                message: format!(
                    "Must not exceed low_below ({}), got {}",
                    self.mileage.low_below, self.mileage.very_low_below
                ),
            });
        }

        if self.red_flags.per_flag < 0 || self.red_flags.max_deduction < 0 {
            return Err(ConfigError::InvalidValue {
                field: "fairness.red_flags".to_string(),
                message: "Deductions must be non-negative".to_string(),
            });
        }

        Ok(())
    }
}

fn ordered(field: &str, bands: &[Band]) -> Result<(), ConfigError> {
    for pair in bands.windows(2) {
        if pair[0].above < pair[1].above {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                message: format!(
                    "Band thresholds must be descending, got {} before {}",
                    pair[0].above, pair[1].above
                ),
            });
        }
    }
    Ok(())
}
