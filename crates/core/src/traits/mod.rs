//! Collaborator traits
//!
//! The analysis core calls out to two optional collaborators, both injected
//! at construction time:
//!
//! ```text
//!   - AlternateExtractor: text -> partial SLA record (e.g. LLM)
//!   - VehicleLookup: VIN -> make/model/year
//! ```

mod extractor;
mod vehicle_lookup;

pub use extractor::AlternateExtractor;
pub use vehicle_lookup::{LookupError, VehicleLookup};
