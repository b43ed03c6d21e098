use crate::common_types::RegistrationNumber;
use crate::AppResult;
use serde::{Deserialize, Serialize};

mod mapper;
pub use mapper::*;

mod http_registry;
pub use http_registry::*;

/// Vehicle details as reported by the registry. Values keep the registry's own
/// text, units included ("148 BHP" stays "148 BHP").
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VehicleData {
    #[serde(rename = "registrationNumber")]
    pub registration_number: String,
    pub year: String,
    pub make: String,
    pub model: String,
    pub bodystyle: String,
    pub color: String,
    pub engine: String,
    pub cylinders: String,
    pub gears: String,
    pub fuel_type: String,
    pub date_first_registered: String,
    pub mot_due_status: String,
    pub mot_due_ends: String,
    pub tax_due_status: String,
    pub tax_due_ends: String,
    pub power_bhp: String,
    pub power_kw: String,
    pub max_speed_mph: String,
    pub fuel_economy_combined: String,
    pub fuel_economy_extra_urban: String,
    pub fuel_economy_urban: String,
    pub co2_emission: String,
    pub ved_co2_band: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryLookup {
    Found(VehicleData),
    NotFound,
}

pub trait VehicleRegistry {
    /// `registration_number` is already normalized. Implementations do not retry.
    async fn lookup(&self, registration_number: &RegistrationNumber)
        -> AppResult<RegistryLookup>;
}
