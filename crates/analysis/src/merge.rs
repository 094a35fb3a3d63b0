//! Reconciliation of pattern and alternate extraction results
//!
//! The pattern result is authoritative. An alternate value is copied only
//! into a gap: `None`, a blank string, an empty list, or an unspecified
//! early-termination penalty. Nested groups (fees, penalties, vehicle
//! details) are reconciled field by field.

use autolexis_core::{ContractSla, EarlyTermination, Fees, Penalties, VehicleInfo};

/// Merge `alt` into the gaps of `rule`
///
/// Idempotent: `merge_sla(x, x) == x` and `merge_sla(x, empty) == x`.
pub fn merge_sla(rule: ContractSla, alt: ContractSla) -> ContractSla {
    merge_sla_tracked(rule, alt).0
}

/// Like [`merge_sla`], also naming every field the alternate filled
///
/// Annotation-only fields (`extraction_method`) are merged but never
/// reported.
pub fn merge_sla_tracked(rule: ContractSla, alt: ContractSla) -> (ContractSla, Vec<&'static str>) {
    let mut merged = rule;
    let mut filled = Vec::new();
    let mut m = Merger {
        filled: &mut filled,
    };

    m.option("contract_type", &mut merged.contract_type, alt.contract_type);
    m.option("apr_percent", &mut merged.apr_percent, alt.apr_percent);
    m.option("monthly_payment", &mut merged.monthly_payment, alt.monthly_payment);
    m.option("term_months", &mut merged.term_months, alt.term_months);
    m.option("down_payment", &mut merged.down_payment, alt.down_payment);
    m.option("finance_amount", &mut merged.finance_amount, alt.finance_amount);
    m.option(
        "total_due_at_signing",
        &mut merged.total_due_at_signing,
        alt.total_due_at_signing,
    );
    m.option("residual_value", &mut merged.residual_value, alt.residual_value);
    m.option(
        "mileage_allowance",
        &mut merged.mileage_allowance,
        alt.mileage_allowance,
    );
    m.option(
        "overage_charge_per_mile",
        &mut merged.overage_charge_per_mile,
        alt.overage_charge_per_mile,
    );

    m.fees(&mut merged.fees, alt.fees);
    m.penalties(&mut merged.penalties, alt.penalties);

    m.text("vin", &mut merged.vin, alt.vin);
    m.vehicle(&mut merged.vehicle_details, alt.vehicle_details);

    m.list("red_flags", &mut merged.red_flags, alt.red_flags);
    m.list(
        "negotiation_points",
        &mut merged.negotiation_points,
        alt.negotiation_points,
    );
    m.option("fairness", &mut merged.fairness, alt.fairness);

    if merged.extraction_method.is_none() {
        merged.extraction_method = alt.extraction_method;
    }

    (merged, filled)
}

struct Merger<'a> {
    filled: &'a mut Vec<&'static str>,
}

impl Merger<'_> {
    fn option<T>(&mut self, field: &'static str, rule: &mut Option<T>, alt: Option<T>) {
        if rule.is_none() && alt.is_some() {
            *rule = alt;
            self.filled.push(field);
        }
    }

    fn text(&mut self, field: &'static str, rule: &mut Option<String>, alt: Option<String>) {
        let rule_blank = rule.as_deref().map_or(true, |s| s.trim().is_empty());
        let alt_blank = alt.as_deref().map_or(true, |s| s.trim().is_empty());
        if rule_blank && !alt_blank {
            *rule = alt;
            self.filled.push(field);
        }
    }

    fn list<T>(&mut self, field: &'static str, rule: &mut Vec<T>, alt: Vec<T>) {
        if rule.is_empty() && !alt.is_empty() {
            *rule = alt;
            self.filled.push(field);
        }
    }

    fn fees(&mut self, rule: &mut Fees, alt: Fees) {
        self.option("fees.documentation_fee", &mut rule.documentation_fee, alt.documentation_fee);
        self.option("fees.acquisition_fee", &mut rule.acquisition_fee, alt.acquisition_fee);
        self.option("fees.registration_fee", &mut rule.registration_fee, alt.registration_fee);
        self.option("fees.other_fees", &mut rule.other_fees, alt.other_fees);
    }

    fn penalties(&mut self, rule: &mut Penalties, alt: Penalties) {
        self.option("penalties.late_payment", &mut rule.late_payment, alt.late_payment);
        if rule.early_termination == EarlyTermination::Unspecified
            && alt.early_termination != EarlyTermination::Unspecified
        {
            rule.early_termination = alt.early_termination;
            self.filled.push("penalties.early_termination");
        }
        self.option("penalties.over_mileage", &mut rule.over_mileage, alt.over_mileage);
    }

    fn vehicle(&mut self, rule: &mut VehicleInfo, alt: VehicleInfo) {
        self.text("vehicle_details.make", &mut rule.make, alt.make);
        self.text("vehicle_details.model", &mut rule.model, alt.model);
        self.option("vehicle_details.year", &mut rule.year, alt.year);
        self.text("vehicle_details.body_class", &mut rule.body_class, alt.body_class);
        self.text("vehicle_details.engine", &mut rule.engine, alt.engine);
        self.option(
            "vehicle_details.estimated_market_price",
            &mut rule.estimated_market_price,
            alt.estimated_market_price,
        );
    }
}
