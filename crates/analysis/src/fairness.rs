//! Fairness scoring
//!
//! Starts from the configured base score (100) and applies each rule
//! independently. A field that is missing or zero skips its rule. The final
//! score is clamped to 0..=100 before grading.

use once_cell::sync::Lazy;

use autolexis_config::{Band, FairnessConfig};
use autolexis_core::{ContractSla, FairnessResult, Grade};

use crate::format_amount;

/// Scores contracts against a set of fairness bands
#[derive(Debug, Clone, Default)]
pub struct FairnessEngine {
    config: FairnessConfig,
}

static DEFAULT_ENGINE: Lazy<FairnessEngine> = Lazy::new(FairnessEngine::default);

/// Score with the default bands
pub fn score_fairness(sla: &ContractSla) -> FairnessResult {
    DEFAULT_ENGINE.score(sla)
}

/// Running score plus the notes that explain it
struct Tally {
    score: i32,
    reasons: Vec<String>,
    positives: Vec<String>,
}

impl Tally {
    fn deduct(&mut self, points: i32, reason: String) {
        self.score -= points;
        self.reasons.push(reason);
    }

    /// Favorable note; `bonus` is zero unless configured otherwise
    fn credit(&mut self, bonus: i32, note: String) {
        self.score += bonus;
        self.positives.push(note);
    }

    fn band(&mut self, band: &Band, value: f64, reason: impl FnOnce() -> String) -> bool {
        if band.hit(value) {
            self.deduct(band.deduction, reason());
            true
        } else {
            false
        }
    }
}

/// Zero reads as "not stated"
fn stated(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

impl FairnessEngine {
    pub fn new(config: FairnessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FairnessConfig {
        &self.config
    }

    pub fn score(&self, sla: &ContractSla) -> FairnessResult {
        let mut tally = Tally {
            score: self.config.base_score,
            reasons: Vec::new(),
            positives: Vec::new(),
        };

        self.apr(sla, &mut tally);
        self.early_termination(sla, &mut tally);
        self.late_payment(sla, &mut tally);
        self.documentation_fee(sla, &mut tally);
        self.acquisition_fee(sla, &mut tally);
        self.mileage(sla, &mut tally);
        self.overage(sla, &mut tally);
        self.red_flags(sla, &mut tally);
        self.term(sla, &mut tally);
        self.due_at_signing(sla, &mut tally);

        let score = tally.score.clamp(0, 100) as u8;
        let grade = Grade::from_score(score);

        tracing::debug!(
            score,
            grade = %grade,
            deductions = tally.reasons.len(),
            positives = tally.positives.len(),
            "Fairness scored"
        );

        FairnessResult {
            score,
            grade,
            summary: grade.summary().to_string(),
            reasons: tally.reasons,
            positives: tally.positives,
        }
    }

    fn apr(&self, sla: &ContractSla, tally: &mut Tally) {
        let Some(apr) = stated(sla.apr_percent) else {
            return;
        };
        let rules = &self.config.apr;
        let shown = format_amount(apr);

        let hit = tally.band(&rules.very_high, apr, || format!("Very high interest rate ({shown}%)"))
            || tally.band(&rules.high, apr, || format!("High interest rate ({shown}%)"))
            || tally.band(&rules.above_average, apr, || {
                format!("Above average interest rate ({shown}%)")
            });

        if !hit && apr < rules.excellent_below {
            tally.credit(rules.excellent_bonus, format!("Excellent interest rate ({shown}%)"));
        }
    }

    fn early_termination(&self, sla: &ContractSla, tally: &mut Tally) {
        if sla.penalties.early_termination.is_present() {
            tally.deduct(
                self.config.early_termination.deduction,
                "Early termination penalty present".to_string(),
            );
        }
    }

    fn late_payment(&self, sla: &ContractSla, tally: &mut Tally) {
        let Some(fee) = stated(sla.penalties.late_payment) else {
            return;
        };
        let rules = &self.config.late_payment;
        let high = tally.band(&rules.high, fee, || {
            format!("High late payment penalty (${})", format_amount(fee))
        });
        if !high {
            tally.band(&rules.moderate, fee, || "Moderate late payment penalty".to_string());
        }
    }

    fn documentation_fee(&self, sla: &ContractSla, tally: &mut Tally) {
        let Some(fee) = stated(sla.fees.documentation_fee) else {
            return;
        };
        let rules = &self.config.documentation_fee;
        let shown = format_amount(fee);
        let hit = tally.band(&rules.excessive, fee, || {
            format!("Excessive documentation fee (${shown})")
        }) || tally.band(&rules.high, fee, || format!("High documentation fee (${shown})"));
        if !hit {
            tally.band(&rules.above_average, fee, || {
                "Above average documentation fee".to_string()
            });
        }
    }

    fn acquisition_fee(&self, sla: &ContractSla, tally: &mut Tally) {
        if let Some(fee) = stated(sla.fees.acquisition_fee) {
            tally.band(&self.config.acquisition_fee.high, fee, || {
                format!("High acquisition fee (${})", format_amount(fee))
            });
        }
    }

    fn mileage(&self, sla: &ContractSla, tally: &mut Tally) {
        let Some(miles) = sla.mileage_allowance.filter(|m| *m > 0) else {
            return;
        };
        let rules = &self.config.mileage;

        if miles < rules.very_low_below {
            tally.deduct(
                rules.very_low_deduction,
                format!("Very low mileage allowance ({miles} miles/year)"),
            );
        } else if miles < rules.low_below {
            tally.deduct(
                rules.low_deduction,
                format!("Low mileage allowance ({miles} miles/year)"),
            );
        } else if miles >= rules.generous_at_least {
            tally.credit(0, format!("Good mileage allowance ({miles} miles/year)"));
        }
    }

    fn overage(&self, sla: &ContractSla, tally: &mut Tally) {
        let Some(charge) = stated(sla.overage_charge_per_mile) else {
            return;
        };
        let rules = &self.config.overage;
        let shown = format_amount(charge);

        let hit = tally.band(&rules.high, charge, || format!("High overage charge (${shown}/mile)"))
            || tally.band(&rules.above_average, charge, || {
                "Above average overage charge".to_string()
            });

        if !hit && charge <= rules.low_at_most {
            tally.credit(0, format!("Low overage charge (${shown}/mile)"));
        }
    }

    fn red_flags(&self, sla: &ContractSla, tally: &mut Tally) {
        let rules = &self.config.red_flags;
        let count = sla.red_flags.len();

        if count == 0 {
            tally.credit(rules.clean_bonus, "No red flags detected".to_string());
            return;
        }

        let per_flag = i32::try_from(count)
            .unwrap_or(i32::MAX)
            .saturating_mul(rules.per_flag);
        tally.deduct(
            per_flag.min(rules.max_deduction),
            format!("{count} red flag(s) detected"),
        );
    }

    fn term(&self, sla: &ContractSla, tally: &mut Tally) {
        let Some(months) = sla.term_months.filter(|t| *t > 0) else {
            return;
        };
        let rules = &self.config.term;
        let value = f64::from(months);
        let very_long =
            tally.band(&rules.very_long, value, || format!("Very long term ({months} months)"));
        if !very_long {
            tally.band(&rules.long, value, || format!("Long term ({months} months)"));
        }
    }

    fn due_at_signing(&self, sla: &ContractSla, tally: &mut Tally) {
        if let Some(due) = stated(sla.total_due_at_signing) {
            tally.band(&self.config.due_at_signing.high, due, || {
                format!("High amount due at signing (${})", format_amount(due))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autolexis_core::{EarlyTermination, Fees, Penalties};
    use serde_json::json;

    fn sla(value: serde_json::Value) -> ContractSla {
        ContractSla::from_value_lenient(value)
    }

    #[test]
    fn test_costly_contract() {
        let result = score_fairness(&sla(json!({
            "apr_percent": 18,
            "penalties": {"early_termination": "₹25000"},
            "fees": {"documentation_fee": 1500}
        })));

        assert!(result.score <= 45, "score was {}", result.score);
        assert!(matches!(result.grade, Grade::D | Grade::F));
        assert_eq!(
            result.reasons,
            vec![
                "Very high interest rate (18%)",
                "Early termination penalty present",
                "Excessive documentation fee ($1500)",
            ]
        );
    }

    #[test]
    fn test_clean_contract() {
        let result = score_fairness(&sla(json!({
            "apr_percent": 4.5,
            "penalties": {},
            "fees": {}
        })));

        assert!(result.score >= 95);
        assert_eq!(result.grade, Grade::A);
        assert_eq!(
            result.positives,
            vec!["Excellent interest rate (4.5%)", "No red flags detected"]
        );
        assert!(result.reasons.is_empty());
        assert_eq!(result.summary, "Excellent contract terms");
    }

    #[test]
    fn test_bonus_notes_do_not_change_score() {
        let result = score_fairness(&ContractSla {
            apr_percent: Some(3.0),
            mileage_allowance: Some(15000),
            overage_charge_per_mile: Some(0.15),
            ..ContractSla::default()
        });
        assert_eq!(result.score, 100);
        assert_eq!(result.positives.len(), 4);
    }

    #[test]
    fn test_configured_bonus_applies() {
        let mut config = FairnessConfig::default();
        config.apr.excellent_bonus = 5;
        let engine = FairnessEngine::new(config);

        let result = engine.score(&ContractSla {
            apr_percent: Some(3.0),
            term_months: Some(72),
            ..ContractSla::default()
        });
        // 100 - 5 (long term) + 5 (bonus)
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_score_is_capped_at_100() {
        let mut config = FairnessConfig::default();
        config.apr.excellent_bonus = 40;
        config.red_flags.clean_bonus = 25;
        let engine = FairnessEngine::new(config);

        let result = engine.score(&ContractSla {
            apr_percent: Some(2.9),
            ..ContractSla::default()
        });
        assert_eq!(result.score, 100);
        assert_eq!(result.grade, Grade::A);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_penalty_text_counts_as_present() {
        let result = score_fairness(&sla(json!({
            "penalties": {"early_termination": "Two monthly payments"}
        })));
        assert_eq!(result.score, 85);
        assert_eq!(result.reasons, vec!["Early termination penalty present"]);
    }

    #[test]
    fn test_band_boundaries_are_strict() {
        let score = |apr: f64| score_fairness(&ContractSla {
            apr_percent: Some(apr),
            ..ContractSla::default()
        });

        assert_eq!(score(15.0).reasons, vec!["High interest rate (15%)"]);
        assert_eq!(score(12.0).reasons, vec!["Above average interest rate (12%)"]);
        assert!(score(8.0).reasons.is_empty());
        assert!(score(5.0).positives.iter().all(|p| !p.contains("interest")));
    }

    #[test]
    fn test_lease_terms() {
        let result = score_fairness(&ContractSla {
            mileage_allowance: Some(9000),
            overage_charge_per_mile: Some(0.30),
            fees: Fees {
                acquisition_fee: Some(1095.0),
                ..Default::default()
            },
            total_due_at_signing: Some(6200.0),
            ..ContractSla::default()
        });

        assert_eq!(
            result.reasons,
            vec![
                "High acquisition fee ($1095)",
                "Very low mileage allowance (9000 miles/year)",
                "High overage charge ($0.3/mile)",
                "High amount due at signing ($6200)",
            ]
        );
        // 100 - 10 - 15 - 10 - 5
        assert_eq!(result.score, 60);
        assert_eq!(result.grade, Grade::D);
    }

    #[test]
    fn test_late_payment_and_term() {
        let result = score_fairness(&ContractSla {
            term_months: Some(66),
            penalties: Penalties {
                late_payment: Some(35.0),
                ..Default::default()
            },
            ..ContractSla::default()
        });
        assert_eq!(
            result.reasons,
            vec!["Moderate late payment penalty", "Long term (66 months)"]
        );
        assert_eq!(result.score, 90);
    }

    #[test]
    fn test_red_flag_deduction_is_capped() {
        let result = score_fairness(&ContractSla {
            red_flags: (0..7).map(|i| format!("flag {i}")).collect(),
            ..ContractSla::default()
        });
        assert_eq!(result.score, 80);
        assert_eq!(result.reasons, vec!["7 red flag(s) detected"]);
        assert!(result.positives.is_empty());
    }

    #[test]
    fn test_score_is_clamped() {
        let result = score_fairness(&ContractSla {
            apr_percent: Some(29.9),
            term_months: Some(84),
            mileage_allowance: Some(7500),
            overage_charge_per_mile: Some(0.35),
            total_due_at_signing: Some(9000.0),
            fees: Fees {
                documentation_fee: Some(1200.0),
                acquisition_fee: Some(1500.0),
                ..Default::default()
            },
            penalties: Penalties {
                late_payment: Some(75.0),
                early_termination: EarlyTermination::Amount(3000.0),
                ..Default::default()
            },
            red_flags: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            ..ContractSla::default()
        });
        assert_eq!(result.score, 0);
        assert_eq!(result.grade, Grade::F);
    }

    #[test]
    fn test_sentinels_do_not_deduct() {
        for state in [EarlyTermination::Unspecified, EarlyTermination::NoPenalty] {
            let result = score_fairness(&ContractSla {
                penalties: Penalties {
                    early_termination: state,
                    ..Default::default()
                },
                ..ContractSla::default()
            });
            assert_eq!(result.score, 100);
        }
    }

    #[test]
    fn test_empty_record() {
        let result = score_fairness(&ContractSla::empty());
        assert_eq!(result.score, 100);
        assert_eq!(result.positives, vec!["No red flags detected"]);
    }
}
