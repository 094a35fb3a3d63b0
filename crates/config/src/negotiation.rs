//! Negotiation generator thresholds

use serde::{Deserialize, Serialize};

use crate::constants::limits;
use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiationConfig {
    /// APR above this is a high-priority point
    pub apr_high: f64,
    /// APR above this is a medium-priority point
    pub apr_medium: f64,
    /// Documentation fee above this is a high-priority point
    pub documentation_fee_high: f64,
    /// Lease allowance below this (miles/year) triggers a warning
    pub mileage_low_below: u32,
    /// Per-mile overage charge above this triggers a point
    pub overage_high: f64,
    /// Overall score below this leads with a "walk away" point
    pub walk_away_below: u8,
    /// Overall score below this asks the dealer to justify terms
    pub below_average_below: u8,
    /// Overall score at or above this is called fair overall
    pub fair_at_least: u8,
    /// Points carried into the email draft
    pub max_email_points: usize,
    /// Symbol used when quoting amounts
    pub currency_symbol: String,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            apr_high: 12.0,
            apr_medium: 8.0,
            documentation_fee_high: 500.0,
            mileage_low_below: 12_000,
            overage_high: 0.20,
            walk_away_below: 50,
            below_average_below: 70,
            fair_at_least: 90,
            max_email_points: limits::MAX_EMAIL_POINTS,
            currency_symbol: "$".to_string(),
        }
    }
}

impl NegotiationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.apr_medium > self.apr_high {
            return Err(ConfigError::InvalidValue {
                field: "negotiation.apr_medium".to_string(),
                message: format!("Must not exceed apr_high ({})", self.apr_high),
            });
        }
        if !(self.walk_away_below <= self.below_average_below
            && self.below_average_below <= self.fair_at_least
            && self.fair_at_least <= 100)
        {
            return Err(ConfigError::InvalidValue {
                field: "negotiation.walk_away_below".to_string(),
                message: "Score thresholds must be ascending and within 0-100".to_string(),
            });
        }
        if self.max_email_points == 0 {
            return Err(ConfigError::InvalidValue {
                field: "negotiation.max_email_points".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
