//! External vehicle data for contract analysis
//!
//! - `NhtsaVehicleRegistry`: VIN decoding against the NHTSA vPIC API
//! - `StubVehicleRegistry`: canned vehicles for tests and offline runs
//! - Heuristic market price band by make and model year

pub mod integrations;
pub mod market_price;

pub use integrations::{NhtsaVehicleRegistry, StubVehicleRegistry};
pub use market_price::{attach_market_price, estimate_market_price};
