//! Negotiation guidance
//!
//! Turns the reconciled record and its fairness result into ordered,
//! severity-tagged talking points, and formats the top points into an email
//! the buyer can send to the dealer.

use once_cell::sync::Lazy;
use serde::Serialize;

use autolexis_config::NegotiationConfig;
use autolexis_core::{ContractSla, FairnessResult, NegotiationPoint, Severity};

use crate::format_amount;

const RED_FLAG_PREFIX: &str = "RED FLAG: ";
const DEFAULT_CUSTOMER: &str = "[Your Name]";
const VEHICLE_PLACEHOLDER: &str = "[Vehicle Name]";

/// Builds negotiation points and email drafts
#[derive(Debug, Clone, Default)]
pub struct NegotiationAdvisor {
    config: NegotiationConfig,
}

static DEFAULT_ADVISOR: Lazy<NegotiationAdvisor> = Lazy::new(NegotiationAdvisor::default);

/// Points with the default thresholds
pub fn generate_negotiation_points(
    sla: &ContractSla,
    fairness: &FairnessResult,
) -> Vec<NegotiationPoint> {
    DEFAULT_ADVISOR.points(sla, fairness)
}

/// Email draft with the default settings
pub fn generate_negotiation_email(
    sla: &ContractSla,
    points: &[NegotiationPoint],
    customer_name: Option<&str>,
) -> String {
    DEFAULT_ADVISOR.email(sla, points, customer_name)
}

impl NegotiationAdvisor {
    pub fn new(config: NegotiationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NegotiationConfig {
        &self.config
    }

    /// Ordered talking points
    ///
    /// A score below the walk-away threshold puts exactly one critical point
    /// first. When nothing else applies a single "appears fair" point is
    /// returned, so the list is never empty.
    ///
    /// Field points are high or medium, with two exceptions: a documentation
    /// fee at or under the high threshold is a low-severity waiver request,
    /// and the down-payment note is a tip. Both are suggestions rather than
    /// problems with the contract, so they render with the 🟢 and 💡 markers.
    pub fn points(&self, sla: &ContractSla, fairness: &FairnessResult) -> Vec<NegotiationPoint> {
        let cfg = &self.config;
        let cur = cfg.currency_symbol.as_str();
        let mut points = Vec::new();

        if let Some(apr) = sla.apr_percent.filter(|v| *v > 0.0) {
            let shown = format_amount(apr);
            if apr > cfg.apr_high {
                points.push(NegotiationPoint::new(
                    Severity::High,
                    format!(
                        "Your APR of {shown}% is above average. Current market rates are around 5-8%. \
                         Ask for a rate reduction or get pre-approved from a bank/credit union for leverage."
                    ),
                ));
            } else if apr > cfg.apr_medium {
                points.push(NegotiationPoint::new(
                    Severity::Medium,
                    format!(
                        "Your APR of {shown}% is slightly high. \
                         Consider negotiating for a lower rate or shorter term."
                    ),
                ));
            }
        }

        if let Some(fee) = sla.fees.documentation_fee.filter(|v| *v > 0.0) {
            if fee > cfg.documentation_fee_high {
                points.push(NegotiationPoint::new(
                    Severity::High,
                    format!(
                        "Documentation fee of {cur}{} is excessive. \
                         Request reduction or complete waiver - this is often negotiable.",
                        format_amount(fee)
                    ),
                ));
            } else {
                points.push(NegotiationPoint::new(
                    Severity::Low,
                    "Consider asking to waive or reduce the documentation fee.",
                ));
            }
        }

        if sla.fees.acquisition_fee.is_some_and(|v| v > 0.0) {
            points.push(NegotiationPoint::new(
                Severity::Medium,
                "Acquisition fees are sometimes negotiable. \
                 Ask if this can be reduced or rolled into the capitalized cost.",
            ));
        }

        if sla.penalties.early_termination.is_present() {
            points.push(NegotiationPoint::new(
                Severity::High,
                "Early termination penalty exists. \
                 Negotiate for a shorter penalty period or lower fees. \
                 Ask about early payoff without penalty after a certain time.",
            ));
        }

        if sla.penalties.late_payment.is_some_and(|v| v > 0.0) {
            points.push(NegotiationPoint::new(
                Severity::Medium,
                "Negotiate for a grace period before late fees apply \
                 (typically 10-15 days is reasonable).",
            ));
        }

        if let Some(miles) = sla
            .mileage_allowance
            .filter(|m| *m > 0 && *m < cfg.mileage_low_below)
        {
            points.push(NegotiationPoint::new(
                Severity::Medium,
                format!(
                    "{miles} miles/year is below average. Most drivers need 12,000-15,000 miles. \
                     Negotiate higher mileage or lower overage charges."
                ),
            ));
        }

        if let Some(charge) = sla.overage_charge_per_mile.filter(|c| *c > cfg.overage_high) {
            points.push(NegotiationPoint::new(
                Severity::Medium,
                format!(
                    "Overage charge of {cur}{}/mile is high. \
                     Industry average is {cur}0.15-0.20. Negotiate this down.",
                    format_amount(charge)
                ),
            ));
        }

        if sla.down_payment.is_some_and(|v| v > 0.0) {
            points.push(NegotiationPoint::new(
                Severity::Tip,
                "For leases, consider a lower down payment. \
                 If the car is totaled, you lose your down payment.",
            ));
        }

        for flag in &sla.red_flags {
            let message = format!("{RED_FLAG_PREFIX}{flag}");
            if !points.iter().any(|p| p.message == message) {
                points.push(NegotiationPoint::new(Severity::Medium, message));
            }
        }

        let field_points = points.len();

        if fairness.score < cfg.walk_away_below {
            points.insert(
                0,
                NegotiationPoint::new(
                    Severity::Critical,
                    "This contract has a low fairness score. \
                     Consider walking away or demanding significant improvements.",
                ),
            );
        } else if fairness.score < cfg.below_average_below {
            points.push(NegotiationPoint::new(
                Severity::Medium,
                "Overall contract fairness is below average. \
                 Ask the dealer to justify pricing and improve terms.",
            ));
        } else if fairness.score >= cfg.fair_at_least && field_points > 0 {
            points.push(NegotiationPoint::new(
                Severity::Low,
                "Contract appears fair overall. You may still ask for minor concessions on fees.",
            ));
        }

        if points.is_empty() {
            points.push(NegotiationPoint::new(
                Severity::Low,
                "This contract appears fair. You may still ask for small concessions like \
                 waiving fees or adding perks (free maintenance, accessories, etc.).",
            ));
        }

        tracing::debug!(
            points = points.len(),
            score = fairness.score,
            "Negotiation points generated"
        );

        points
    }

    /// Email draft listing the top points without severity markers
    pub fn email(
        &self,
        sla: &ContractSla,
        points: &[NegotiationPoint],
        customer_name: Option<&str>,
    ) -> String {
        let vehicle = sla
            .vehicle_name()
            .unwrap_or_else(|| VEHICLE_PLACEHOLDER.to_string());
        let customer = customer_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_CUSTOMER);

        let mut email = format!(
            "Subject: Request for Terms Review - {vehicle}\n\n\
             Dear [Dealer/Finance Manager],\n\n\
             Thank you for providing the contract details for the {vehicle}. \
             After careful review, I would like to discuss some terms before proceeding.\n\n\
             REQUESTED ADJUSTMENTS:\n"
        );

        for (i, point) in points.iter().take(self.config.max_email_points).enumerate() {
            let message = point
                .message
                .strip_prefix(RED_FLAG_PREFIX)
                .unwrap_or(&point.message);
            email.push_str(&format!("\n{}. {}", i + 1, message));
        }

        email.push_str(&format!(
            "\n\nI am a serious buyer and am ready to finalize the deal once we can agree on \
             improved terms. I have been researching market rates and comparable offers, and \
             believe these adjustments are reasonable.\n\n\
             Please let me know your thoughts at your earliest convenience.\n\n\
             Best regards,\n\
             {customer}\n\
             [Phone Number]\n\
             [Email]\n"
        ));

        email
    }
}

/// Topic of a dealer question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Pricing,
    Financing,
    LoanTerms,
    Lease,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DealerQuestion {
    pub category: QuestionCategory,
    pub question: &'static str,
}

const fn q(category: QuestionCategory, question: &'static str) -> DealerQuestion {
    DealerQuestion { category, question }
}

static DEALER_QUESTIONS: [DealerQuestion; 21] = [
    q(QuestionCategory::Pricing, "What is the out-the-door price including ALL fees and taxes?"),
    q(QuestionCategory::Pricing, "Are there any dealer add-ons or accessories I can remove?"),
    q(QuestionCategory::Pricing, "Is there room for negotiation on the vehicle price?"),
    q(QuestionCategory::Pricing, "Are there any manufacturer incentives or rebates available?"),
    q(QuestionCategory::Financing, "What APR am I approved for? What determines this rate?"),
    q(QuestionCategory::Financing, "Can you match a rate from my bank or credit union?"),
    q(QuestionCategory::Financing, "Are there any special financing promotions available?"),
    q(QuestionCategory::Financing, "What is the total cost of the loan over its lifetime?"),
    q(QuestionCategory::LoanTerms, "Is there a prepayment penalty?"),
    q(QuestionCategory::LoanTerms, "Can I make extra payments toward the principal?"),
    q(QuestionCategory::LoanTerms, "What happens if I want to refinance later?"),
    q(QuestionCategory::LoanTerms, "What are the consequences of a late payment?"),
    q(QuestionCategory::Lease, "What is the money factor (lease interest rate)?"),
    q(QuestionCategory::Lease, "What is the residual value at lease end?"),
    q(QuestionCategory::Lease, "Can I negotiate the mileage allowance?"),
    q(QuestionCategory::Lease, "What are the wear-and-tear guidelines?"),
    q(QuestionCategory::Lease, "What is the process for returning the vehicle?"),
    q(QuestionCategory::General, "What warranties are included?"),
    q(QuestionCategory::General, "Is GAP insurance included or recommended?"),
    q(QuestionCategory::General, "What are my options at the end of the term?"),
    q(QuestionCategory::General, "Can I see an itemized breakdown of all charges?"),
];

/// Static checklist of questions worth asking any dealer
pub fn dealer_questions() -> &'static [DealerQuestion] {
    &DEALER_QUESTIONS
}
