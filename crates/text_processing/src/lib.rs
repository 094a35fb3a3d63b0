//! Text processing for contract analysis
//!
//! This crate turns raw contract text into structured fields:
//! - **Pattern Extraction**: ordered regex cascades per field, with type coercion
//! - **Date-Range Inference**: term length from "beginning ... ending ..." phrasing
//! - **VIN**: discovery of a VIN-shaped token and check-digit validation
//!
//! Everything here is pure; no I/O.
//!
//! # Example
//!
//! ```ignore
//! use autolexis_text_processing::{extract_fields, validate_vin};
//!
//! let sla = extract_fields(&contract_text)?;
//! if let Some(vin) = &sla.vin {
//!     println!("VIN valid: {}", validate_vin(vin).valid);
//! }
//! ```

pub mod contract_extraction;
pub mod vin;

pub use contract_extraction::{
    extract_fields, normalize, term_from_date_range, ContractExtractor,
    RED_FLAG_EARLY_TERMINATION, RED_FLAG_HIGH_APR,
};
pub use vin::{check_digit, find_vin, find_vin_in_raw, transliterate, validate_vin};
