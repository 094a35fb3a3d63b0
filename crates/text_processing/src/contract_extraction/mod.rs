//! Rule-based contract field extraction
//!
//! Turns raw contract text into a [`ContractSla`] using ordered regex
//! cascades. For every field the first pattern that matches wins; later
//! patterns are fallbacks and results are never combined. A matched value
//! that fails to cast (e.g. a term too large for `u32`) leaves the field
//! empty and does not fall through to the next pattern.
//!
//! ## Static Regex Patterns
//!
//! Patterns are compiled once using `once_cell::sync::Lazy` (see
//! [`patterns`]).

pub mod dates;
pub(crate) mod patterns;

use autolexis_config::ExtractionConfig;
use autolexis_core::{
    ContractSla, ContractType, EarlyTermination, ExtractionMethod, Fees, InputError, Penalties,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

use crate::vin::find_vin;

pub use dates::term_from_date_range;

/// Red flag recorded when an early-termination penalty is stated
pub const RED_FLAG_EARLY_TERMINATION: &str = "Early termination penalty present";
/// Red flag recorded when the APR exceeds the configured threshold
pub const RED_FLAG_HIGH_APR: &str = "High interest rate";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Remove thousands separators, collapse whitespace and trim
pub fn normalize(text: &str) -> String {
    let without_commas = text.replace(',', "");
    WHITESPACE.replace_all(&without_commas, " ").trim().to_string()
}

fn first_capture<'t>(cascade: &[Regex], text: &'t str) -> Option<&'t str> {
    cascade
        .iter()
        .find_map(|pattern| pattern.captures(text).and_then(|c| c.get(1)))
        .map(|m| m.as_str())
}

fn cast<T: FromStr>(field: &'static str, raw: Option<&str>) -> Option<T> {
    let raw = raw?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::debug!(field, raw, "Matched value could not be cast, leaving field empty");
            None
        }
    }
}

fn cast_amount(field: &'static str, raw: Option<&str>) -> Option<f64> {
    cast::<f64>(field, raw).filter(|v| v.is_finite())
}

/// Pattern-based contract extractor
#[derive(Debug, Clone)]
pub struct ContractExtractor {
    config: ExtractionConfig,
}

impl ContractExtractor {
    /// Extractor with default limits (50 characters, 12% APR red flag)
    pub fn new() -> Self {
        Self::with_config(ExtractionConfig::default())
    }

    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract every schema field from contract text
    ///
    /// Fails only when the text is empty or shorter than the configured
    /// minimum; otherwise every field is present, set or `None`.
    pub fn extract(&self, text: &str) -> Result<ContractSla, InputError> {
        let length = text.chars().count();
        if length == 0 {
            return Err(InputError::Empty);
        }
        if length < self.config.min_text_length {
            return Err(InputError::TooShort {
                length,
                minimum: self.config.min_text_length,
            });
        }

        let text = normalize(text);

        let apr_percent = self.extract_apr(&text);
        let penalties = Penalties {
            late_payment: self.extract_late_payment(&text),
            early_termination: self.extract_early_termination(&text),
            over_mileage: cast_amount("over_mileage", first_capture(&patterns::OVER_MILEAGE, &text)),
        };

        let mut sla = ContractSla {
            contract_type: self.extract_contract_type(&text),
            apr_percent,
            monthly_payment: self.extract_monthly_payment(&text),
            term_months: self.extract_term_months(&text),
            down_payment: cast_amount("down_payment", first_capture(&patterns::DOWN_PAYMENT, &text)),
            finance_amount: cast_amount(
                "finance_amount",
                first_capture(&patterns::FINANCE_AMOUNT, &text),
            ),
            total_due_at_signing: cast_amount(
                "total_due_at_signing",
                first_capture(&patterns::DUE_AT_SIGNING, &text),
            ),
            residual_value: cast_amount(
                "residual_value",
                first_capture(&patterns::RESIDUAL_VALUE, &text),
            ),
            mileage_allowance: self.extract_mileage_allowance(&text),
            overage_charge_per_mile: self.extract_overage_charge(&text),
            fees: self.extract_fees(&text),
            penalties,
            vin: find_vin(&text).map(str::to_string),
            extraction_method: Some(ExtractionMethod::Regex),
            ..ContractSla::default()
        };
        sla.red_flags = self.red_flags(&sla);

        tracing::debug!(
            contract_type = ?sla.contract_type,
            apr = ?sla.apr_percent,
            term_months = ?sla.term_months,
            vin_found = sla.vin.is_some(),
            red_flags = sla.red_flags.len(),
            "Pattern extraction complete"
        );

        Ok(sla)
    }

    /// "lease" anywhere wins over loan keywords
    pub fn extract_contract_type(&self, text: &str) -> Option<ContractType> {
        if patterns::LEASE.is_match(text) {
            Some(ContractType::Lease)
        } else if patterns::LOAN.is_match(text) {
            Some(ContractType::Loan)
        } else {
            None
        }
    }

    pub fn extract_apr(&self, text: &str) -> Option<f64> {
        cast_amount("apr_percent", first_capture(&patterns::APR, text))
    }

    pub fn extract_monthly_payment(&self, text: &str) -> Option<f64> {
        cast_amount("monthly_payment", first_capture(&patterns::MONTHLY_PAYMENT, text))
    }

    /// Explicit "N months", then "tenure N", then a beginning/ending date pair
    pub fn extract_term_months(&self, text: &str) -> Option<u32> {
        match first_capture(&patterns::TERM_MONTHS, text) {
            Some(raw) => cast("term_months", Some(raw)),
            None => term_from_date_range(text),
        }
    }

    pub fn extract_mileage_allowance(&self, text: &str) -> Option<u32> {
        cast("mileage_allowance", first_capture(&patterns::MILEAGE_ALLOWANCE, text))
    }

    pub fn extract_overage_charge(&self, text: &str) -> Option<f64> {
        cast_amount(
            "overage_charge_per_mile",
            first_capture(&patterns::OVERAGE_PER_MILE, text),
        )
    }

    pub fn extract_fees(&self, text: &str) -> Fees {
        Fees {
            documentation_fee: cast_amount(
                "documentation_fee",
                first_capture(&patterns::DOCUMENTATION_FEE, text),
            ),
            acquisition_fee: cast_amount(
                "acquisition_fee",
                first_capture(&patterns::ACQUISITION_FEE, text),
            ),
            registration_fee: cast_amount(
                "registration_fee",
                first_capture(&patterns::REGISTRATION_FEE, text),
            ),
            other_fees: cast_amount("other_fees", first_capture(&patterns::OTHER_FEES, text)),
        }
    }

    pub fn extract_late_payment(&self, text: &str) -> Option<f64> {
        cast_amount("late_payment", first_capture(&patterns::LATE_PAYMENT, text))
    }

    /// "without penalty" anywhere, else a stated amount, else unspecified
    pub fn extract_early_termination(&self, text: &str) -> EarlyTermination {
        if patterns::NO_TERMINATION_PENALTY.is_match(text) {
            return EarlyTermination::NoPenalty;
        }
        cast_amount(
            "early_termination",
            first_capture(&patterns::EARLY_TERMINATION, text),
        )
        .map(EarlyTermination::Amount)
        .unwrap_or(EarlyTermination::Unspecified)
    }

    /// Deterministic red flags, early termination first
    pub fn red_flags(&self, sla: &ContractSla) -> Vec<String> {
        let mut flags = Vec::new();

        if sla.penalties.early_termination.is_present() {
            flags.push(RED_FLAG_EARLY_TERMINATION.to_string());
        }

        if sla
            .apr_percent
            .is_some_and(|apr| apr > self.config.high_apr_red_flag)
        {
            flags.push(RED_FLAG_HIGH_APR.to_string());
        }

        flags
    }
}

impl Default for ContractExtractor {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_EXTRACTOR: Lazy<ContractExtractor> = Lazy::new(ContractExtractor::new);

/// Extract fields with default limits
pub fn extract_fields(text: &str) -> Result<ContractSla, InputError> {
    DEFAULT_EXTRACTOR.extract(text)
}
