//! Static extraction patterns
//!
//! Each field owns an ordered cascade. Patterns run against normalized text
//! (thousands separators removed, whitespace collapsed), so numbers never
//! contain commas. Capture group 1 is always the value.

use once_cell::sync::Lazy;
use regex::Regex;

/// Optional currency prefix
const CUR: &str = r"(?:(?:rs\.?|inr|usd|₹|\$)\s*)?";

/// Connector between a label and its value ("of", "is", ":", "-", "=")
const SEP: &str = r"\s*(?:of|is|:|-|=)?\s*";

/// Integer or decimal amount
const NUM: &str = r"(\d+(?:\.\d+)?)";

/// Amount that may omit the leading zero (".25")
const SMALL_NUM: &str = r"(\d*\.\d+|\d+)";

fn build(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
        .collect()
}

pub(crate) static LEASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)lease").unwrap());

pub(crate) static LOAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)loan|financ|\bemi\b").unwrap());

pub(crate) static APR: Lazy<Vec<Regex>> = Lazy::new(|| {
    build(&[
        format!(r"\bAPR\b{SEP}{NUM}\s*%"),
        format!(r"annual\s+percentage\s+rate.{{0,40}}?{NUM}\s*%"),
        format!(r"interest\s*rate.{{0,60}}?{NUM}\s*%"),
        format!(r"rate\s+of\s+interest.{{0,60}}?{NUM}\s*%"),
        format!(r"interest\s*@\s*{NUM}\s*%"),
    ])
});

pub(crate) static MONTHLY_PAYMENT: Lazy<Vec<Regex>> = Lazy::new(|| {
    build(&[
        format!(r"monthly\s+(?:lease\s+)?payments?(?:\s+amount)?{SEP}{CUR}{NUM}"),
        format!(r"\bEMI\b(?:\s+amount)?{SEP}{CUR}{NUM}"),
        format!(r"monthly\s+install?ments?{SEP}{CUR}{NUM}"),
        format!(r"{CUR}{NUM}\s*(?:per|/|a|each)\s*month\b"),
    ])
});

pub(crate) static TERM_MONTHS: Lazy<Vec<Regex>> = Lazy::new(|| {
    build(&[
        r"\b(\d+)\s*(?:months\b|-month\b)".to_string(),
        format!(r"tenure{SEP}(\d+)"),
    ])
});

pub(crate) static DATE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)beginning\s+(?:on\s+|in\s+|from\s+)?([a-z]+\.?\s+\d{4}).*?ending\s+(?:on\s+|in\s+)?([a-z]+\.?\s+\d{4})",
    )
    .unwrap()
});

pub(crate) static DOWN_PAYMENT: Lazy<Vec<Regex>> = Lazy::new(|| {
    build(&[
        format!(r"down\s*payment{SEP}{CUR}{NUM}"),
        format!(r"initial\s+payment{SEP}{CUR}{NUM}"),
        format!(r"capitalized\s+cost\s+reduction{SEP}{CUR}{NUM}"),
        format!(r"\badvance(?:\s+payment)?{SEP}{CUR}{NUM}"),
    ])
});

pub(crate) static FINANCE_AMOUNT: Lazy<Vec<Regex>> = Lazy::new(|| {
    build(&[
        format!(r"loan\s+amount{SEP}{CUR}{NUM}"),
        format!(r"amount\s+financed{SEP}{CUR}{NUM}"),
        format!(r"financed\s+amount{SEP}{CUR}{NUM}"),
        format!(r"principal(?:\s+amount)?{SEP}{CUR}{NUM}"),
    ])
});

pub(crate) static DUE_AT_SIGNING: Lazy<Vec<Regex>> = Lazy::new(|| {
    build(&[
        format!(r"(?:total\s+)?(?:amount\s+)?due\s+at\s+(?:lease\s+)?signing{SEP}{CUR}{NUM}"),
        format!(r"due\s+at\s+(?:delivery|inception){SEP}{CUR}{NUM}"),
    ])
});

pub(crate) static RESIDUAL_VALUE: Lazy<Vec<Regex>> = Lazy::new(|| {
    build(&[
        format!(r"residual\s+value{SEP}{CUR}{NUM}"),
        format!(r"\bresidual{SEP}{CUR}{NUM}"),
    ])
});

pub(crate) static MILEAGE_ALLOWANCE: Lazy<Vec<Regex>> = Lazy::new(|| {
    build(&[
        r"(\d+)\s*miles\s*(?:per|/|a|each)\s*year".to_string(),
        format!(r"(?:annual\s+)?mileage\s+(?:allowance|limit){SEP}(\d+)"),
        format!(r"annual\s+mileage{SEP}(\d+)"),
    ])
});

pub(crate) static OVERAGE_PER_MILE: Lazy<Vec<Regex>> = Lazy::new(|| {
    build(&[
        format!(r"(?:excess|over(?:age)?)\s*(?:mileage|miles?).{{0,60}}?{CUR}{SMALL_NUM}\s*(?:per|/|a|each)\s*mile\b"),
        format!(r"{CUR}{SMALL_NUM}\s*(?:per|/)\s*(?:excess\s+)?mile\b"),
    ])
});

pub(crate) static DOCUMENTATION_FEE: Lazy<Vec<Regex>> = Lazy::new(|| {
    build(&[format!(r"(?:documentation|doc)\s*fees?{SEP}{CUR}{NUM}")])
});

pub(crate) static ACQUISITION_FEE: Lazy<Vec<Regex>> = Lazy::new(|| {
    build(&[format!(r"acquisition\s*fees?{SEP}{CUR}{NUM}")])
});

pub(crate) static REGISTRATION_FEE: Lazy<Vec<Regex>> = Lazy::new(|| {
    build(&[format!(r"registration\s*fees?{SEP}{CUR}{NUM}")])
});

pub(crate) static OTHER_FEES: Lazy<Vec<Regex>> = Lazy::new(|| {
    build(&[format!(r"processing\s*fees?{SEP}{CUR}{NUM}")])
});

pub(crate) static LATE_PAYMENT: Lazy<Vec<Regex>> = Lazy::new(|| {
    build(&[
        format!(r"late\s*(?:payment\s*)?(?:fee|charge|penalty){SEP}{CUR}{NUM}"),
        format!(r"late\s*(?:payment|fee|charge).{{0,60}}?(?:rs\.?|inr|usd|₹|\$)\s*{NUM}"),
        format!(r"late\s*payment.{{0,40}}?{NUM}"),
    ])
});

pub(crate) static NO_TERMINATION_PENALTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)without\s+(?:any\s+)?penalty").unwrap());

pub(crate) static EARLY_TERMINATION: Lazy<Vec<Regex>> = Lazy::new(|| {
    build(&[
        format!(r"early\s*termination\s*(?:fee|charge|penalty){SEP}{CUR}{NUM}"),
        format!(r"early\s*termination.{{0,80}}?(?:rs\.?|inr|usd|₹|\$)\s*{NUM}"),
        format!(r"(?:termination|cancellation)\s*(?:fee|charge|penalty){SEP}{CUR}{NUM}"),
    ])
});

pub(crate) static OVER_MILEAGE: Lazy<Vec<Regex>> = Lazy::new(|| {
    build(&[format!(r"over\s*mileage.{{0,60}}?{CUR}{SMALL_NUM}")])
});

/// 17 characters from the VIN alphabet (no I, O, Q)
pub(crate) static VIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-HJ-NPR-Z0-9]{17}\b").unwrap());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        let cascades: [&Lazy<Vec<Regex>>; 16] = [
            &APR,
            &MONTHLY_PAYMENT,
            &TERM_MONTHS,
            &DOWN_PAYMENT,
            &FINANCE_AMOUNT,
            &DUE_AT_SIGNING,
            &RESIDUAL_VALUE,
            &MILEAGE_ALLOWANCE,
            &OVERAGE_PER_MILE,
            &DOCUMENTATION_FEE,
            &ACQUISITION_FEE,
            &REGISTRATION_FEE,
            &OTHER_FEES,
            &LATE_PAYMENT,
            &EARLY_TERMINATION,
            &OVER_MILEAGE,
        ];
        for cascade in cascades {
            assert!(!cascade.is_empty());
        }
        assert!(VIN.is_match("1HGCM82633A004352"));
        assert!(DATE_RANGE.is_match("beginning on January 2024 and ending on January 2027"));
    }

    #[test]
    fn test_loan_keywords() {
        assert!(LOAN.is_match("Auto Loan Agreement"));
        assert!(LOAN.is_match("Retail installment financing"));
        assert!(LOAN.is_match("Your EMI is due"));
        assert!(!LOAN.is_match("The premium package"));
    }
}
