//! Fairness assessment types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter grade for a fairness score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Grade for a clamped 0-100 score
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Grade::A => "Excellent contract terms",
            Grade::B => "Good contract with minor concerns",
            Grade::C => "Average contract - room for negotiation",
            Grade::D => "Below average - significant negotiation needed",
            Grade::F => "Poor terms - consider walking away",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(s)
    }
}

/// Outcome of fairness scoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FairnessResult {
    /// Always within 0..=100
    pub score: u8,
    pub grade: Grade,
    pub summary: String,
    /// Deductions, in rule order
    pub reasons: Vec<String>,
    /// Favorable notes, in rule order
    pub positives: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_score(100), Grade::A);
        assert_eq!(Grade::from_score(90), Grade::A);
        assert_eq!(Grade::from_score(89), Grade::B);
        assert_eq!(Grade::from_score(80), Grade::B);
        assert_eq!(Grade::from_score(79), Grade::C);
        assert_eq!(Grade::from_score(70), Grade::C);
        assert_eq!(Grade::from_score(69), Grade::D);
        assert_eq!(Grade::from_score(60), Grade::D);
        assert_eq!(Grade::from_score(59), Grade::F);
        assert_eq!(Grade::from_score(0), Grade::F);
    }

    #[test]
    fn test_grade_summary() {
        assert_eq!(Grade::F.summary(), "Poor terms - consider walking away");
        assert_eq!(Grade::C.to_string(), "C");
    }
}
