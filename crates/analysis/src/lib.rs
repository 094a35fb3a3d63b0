//! Contract analysis
//!
//! Everything downstream of field extraction:
//! - **Reconciliation**: fill gaps in the pattern result from an alternate extractor
//! - **Fairness Scoring**: weighted deductions from 100, clamped, graded A-F
//! - **Negotiation**: prioritized talking points and an email draft
//! - **Comparison**: rank several contracts by fairness
//! - **Pipeline**: `ContractAnalyzer` ties the steps together with the
//!   optional LLM and vehicle-registry collaborators

pub mod comparison;
pub mod fairness;
pub mod merge;
pub mod negotiation;
pub mod pipeline;

pub use comparison::{compare_contracts, ComparisonReport, RankedContract};
pub use fairness::{score_fairness, FairnessEngine};
pub use merge::{merge_sla, merge_sla_tracked};
pub use negotiation::{
    dealer_questions, generate_negotiation_email, generate_negotiation_points,
    DealerQuestion, NegotiationAdvisor, QuestionCategory,
};
pub use pipeline::{AnalysisReport, ContractAnalyzer, ContractAnalyzerBuilder};

/// Render an amount without trailing zeros ("1500", "0.3", "6.95")
pub(crate) fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        let rendered = format!("{:.2}", value);
        rendered.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
