//! Core types for car lease and loan contract analysis
//!
//! This crate provides the types shared by every other crate:
//! - The versioned SLA record of extracted contract terms
//! - Fairness and negotiation result types
//! - VIN validation and vehicle detail types
//! - Collaborator traits (alternate extractor, vehicle registry)
//! - Error types

pub mod coerce;
pub mod error;
pub mod fairness;
pub mod negotiation;
pub mod sla;
pub mod traits;
pub mod vehicle;

pub use error::{Error, InputError, Result};
pub use fairness::{FairnessResult, Grade};
pub use negotiation::{NegotiationPoint, Severity};
pub use sla::{
    ContractSla, ContractType, EarlyTermination, ExtractionMethod, Fees, Penalties, SLA_FIELDS,
    SLA_SCHEMA_VERSION,
};
pub use vehicle::{PriceRange, VehicleInfo, VinError, VinValidation};

pub use traits::{AlternateExtractor, LookupError, VehicleLookup};
