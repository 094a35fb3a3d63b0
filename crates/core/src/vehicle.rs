//! Vehicle identity types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::coerce;

/// Estimated market price band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: u32,
    pub high: u32,
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${} - ${}", group_thousands(self.low), group_thousands(self.high))
    }
}

fn group_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Decoded vehicle details
///
/// Empty (all `None`) when the registry could not be reached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleInfo {
    #[serde(default, deserialize_with = "coerce::text")]
    pub make: Option<String>,
    #[serde(default, deserialize_with = "coerce::text")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "coerce::year")]
    pub year: Option<u16>,
    #[serde(default, deserialize_with = "coerce::text")]
    pub body_class: Option<String>,
    #[serde(default, deserialize_with = "coerce::text")]
    pub engine: Option<String>,
    #[serde(default, deserialize_with = "coerce::lenient")]
    pub estimated_market_price: Option<PriceRange>,
}

impl VehicleInfo {
    pub fn is_empty(&self) -> bool {
        self == &VehicleInfo::default()
    }

    /// "{year} {make} {model}", skipping unknown parts
    pub fn display_name(&self) -> Option<String> {
        let year = self.year.map(|y| y.to_string());
        let parts: Vec<&str> = [year.as_deref(), self.make.as_deref(), self.model.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Why a VIN was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VinError {
    WrongLength { length: usize },
    ForbiddenLetter { letter: char, position: usize },
    InvalidCharacter { character: char, position: usize },
    CheckDigitMismatch { expected: char, found: char },
}

impl fmt::Display for VinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VinError::WrongLength { length } => {
                write!(f, "VIN must be exactly 17 characters, got {length}")
            }
            VinError::ForbiddenLetter { letter, position } => {
                write!(f, "VIN cannot contain the letter '{letter}' (position {position})")
            }
            VinError::InvalidCharacter { character, position } => {
                write!(f, "Invalid VIN character '{character}' (position {position})")
            }
            VinError::CheckDigitMismatch { expected, found } => {
                write!(f, "Check digit mismatch: expected '{expected}', found '{found}'")
            }
        }
    }
}

impl std::error::Error for VinError {}

/// Checksum verdict for one VIN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VinValidation {
    pub valid: bool,
    pub vin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<VinError>,
}

impl VinValidation {
    pub fn valid(vin: impl Into<String>) -> Self {
        Self {
            valid: true,
            vin: vin.into(),
            error: None,
        }
    }

    pub fn invalid(vin: impl Into<String>, error: VinError) -> Self {
        Self {
            valid: false,
            vin: vin.into(),
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let info = VehicleInfo {
            make: Some("Honda".into()),
            model: Some("Accord".into()),
            year: Some(2003),
            ..Default::default()
        };
        assert_eq!(info.display_name().as_deref(), Some("2003 Honda Accord"));

        let partial = VehicleInfo {
            make: Some("Honda".into()),
            ..Default::default()
        };
        assert_eq!(partial.display_name().as_deref(), Some("Honda"));
        assert_eq!(VehicleInfo::default().display_name(), None);
    }

    #[test]
    fn test_price_range_display() {
        let range = PriceRange { low: 19000, high: 24000 };
        assert_eq!(range.to_string(), "$19,000 - $24,000");
        assert_eq!(group_thousands(5000), "5,000");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_vin_error_messages() {
        let err = VinError::WrongLength { length: 16 };
        assert_eq!(err.to_string(), "VIN must be exactly 17 characters, got 16");
        let v = VinValidation::invalid("ABC", err);
        assert!(!v.valid);
        assert_eq!(v.error, Some(err));
    }
}
