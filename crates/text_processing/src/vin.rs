//! VIN discovery and check-digit validation
//!
//! Check digit per ISO 3779 / 49 CFR 565: letters are transliterated to
//! digits, each position is weighted, and the weighted sum mod 11 must equal
//! the character in position 9 (`X` stands for 10). Validation never
//! corrects its input: lowercase letters are invalid, not uppercased.

use autolexis_core::{VinError, VinValidation};

use crate::contract_extraction::{normalize, patterns};

pub const VIN_LENGTH: usize = 17;

/// 0-indexed position of the check digit
pub const CHECK_DIGIT_INDEX: usize = 8;

const WEIGHTS: [u32; VIN_LENGTH] = [8, 7, 6, 5, 4, 3, 2, 10, 0, 9, 8, 7, 6, 5, 4, 3, 2];

/// Transliteration value of a VIN character
///
/// `None` for I, O, Q and anything outside `[A-Z0-9]`.
pub fn transliterate(c: char) -> Option<u32> {
    match c {
        '0'..='9' => c.to_digit(10),
        'A'..='H' => Some(c as u32 - 'A' as u32 + 1),
        'J'..='N' => Some(c as u32 - 'J' as u32 + 1),
        'P' => Some(7),
        'R' => Some(9),
        'S'..='Z' => Some(c as u32 - 'S' as u32 + 2),
        _ => None,
    }
}

/// Expected check digit for a 17-character VIN
///
/// Returns `None` if the input has the wrong length or an invalid character.
pub fn check_digit(vin: &str) -> Option<char> {
    let chars: Vec<char> = vin.chars().collect();
    if chars.len() != VIN_LENGTH {
        return None;
    }

    let mut sum = 0u32;
    for (c, weight) in chars.iter().zip(WEIGHTS) {
        sum += transliterate(*c)? * weight;
    }

    match sum % 11 {
        10 => Some('X'),
        r => char::from_digit(r, 10),
    }
}

/// Validate a VIN's character set and check digit
pub fn validate_vin(vin: &str) -> VinValidation {
    let chars: Vec<char> = vin.chars().collect();

    if chars.len() != VIN_LENGTH {
        return VinValidation::invalid(vin, VinError::WrongLength { length: chars.len() });
    }

    for (i, c) in chars.iter().enumerate() {
        if matches!(c.to_ascii_uppercase(), 'I' | 'O' | 'Q') {
            return VinValidation::invalid(
                vin,
                VinError::ForbiddenLetter {
                    letter: *c,
                    position: i + 1,
                },
            );
        }
        if transliterate(*c).is_none() {
            return VinValidation::invalid(
                vin,
                VinError::InvalidCharacter {
                    character: *c,
                    position: i + 1,
                },
            );
        }
    }

    let Some(expected) = check_digit(vin) else {
        // Unreachable after the character checks above
        return VinValidation::invalid(vin, VinError::WrongLength { length: chars.len() });
    };

    let found = chars[CHECK_DIGIT_INDEX];
    if found != expected {
        return VinValidation::invalid(vin, VinError::CheckDigitMismatch { expected, found });
    }

    VinValidation::valid(vin)
}

/// First VIN-shaped token in the text
///
/// Expects normalized text; the match is case-sensitive.
pub fn find_vin(text: &str) -> Option<&str> {
    patterns::VIN.find(text).map(|m| m.as_str())
}

/// Normalize raw text, then look for a VIN
pub fn find_vin_in_raw(text: &str) -> Option<String> {
    find_vin(&normalize(text)).map(str::to_string)
}
