//! Vehicle registry interface

use async_trait::async_trait;
use thiserror::Error;

use crate::VehicleInfo;

/// Registry lookup failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Registry request failed: {0}")]
    Request(String),

    #[error("Registry returned status {0}")]
    Status(u16),

    #[error("Malformed registry response: {0}")]
    Malformed(String),

    #[error("No vehicle found for VIN {0}")]
    NotFound(String),
}

/// Decodes a VIN into make, model and year
///
/// A failing lookup must never abort extraction; callers fall back to
/// `VehicleInfo::default()`.
#[async_trait]
pub trait VehicleLookup: Send + Sync {
    async fn lookup(&self, vin: &str) -> std::result::Result<VehicleInfo, LookupError>;

    /// Name for logging
    fn name(&self) -> &str;
}
