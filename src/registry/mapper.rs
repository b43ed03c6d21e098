use crate::errors::MappingError;
use crate::registry::VehicleData;
use serde_json::Value;

/// Projects a registry payload into [`VehicleData`]. Every field is required;
/// a missing one means the registry changed its schema.
pub fn map_vehicle_data(raw: &Value) -> Result<VehicleData, MappingError> {
    let field = |name: &str, path: &str| scalar_at(raw, name, path);
    Ok(VehicleData {
        registration_number: field("registrationNumber", "/registrationNumber")?,
        year: field("year", "/vehicle/year")?,
        make: field("make", "/vehicle/make")?,
        model: field("model", "/vehicle/model")?,
        bodystyle: field("bodystyle", "/vehicle/bodyStyle")?,
        color: field("color", "/vehicle/colour")?,
        engine: field("engine", "/vehicle/engine/description")?,
        cylinders: field("cylinders", "/vehicle/engine/cylinders")?,
        gears: field("gears", "/vehicle/engine/gears")?,
        fuel_type: field("fuel_type", "/vehicle/fuelType")?,
        date_first_registered: field("date_first_registered", "/vehicle/dateFirstRegistered")?,
        mot_due_status: field("mot_due_status", "/status/mot/status")?,
        mot_due_ends: field("mot_due_ends", "/status/mot/dueDate")?,
        tax_due_status: field("tax_due_status", "/status/tax/status")?,
        tax_due_ends: field("tax_due_ends", "/status/tax/dueDate")?,
        power_bhp: field("power_bhp", "/performance/power/bhp")?,
        power_kw: field("power_kw", "/performance/power/kw")?,
        max_speed_mph: field("max_speed_mph", "/performance/maxSpeed/mph")?,
        fuel_economy_combined: field("fuel_economy_combined", "/fuelEconomy/combined")?,
        fuel_economy_extra_urban: field("fuel_economy_extra_urban", "/fuelEconomy/extraUrban")?,
        fuel_economy_urban: field("fuel_economy_urban", "/fuelEconomy/urban")?,
        co2_emission: field("co2_emission", "/emissions/co2")?,
        ved_co2_band: field("ved_co2_band", "/emissions/vedCo2Band")?,
    })
}

// Numbers and booleans keep their JSON text, nothing is parsed or rounded.
fn scalar_at(raw: &Value, field: &str, path: &str) -> Result<String, MappingError> {
    match raw.pointer(path) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(Value::Number(value)) => Ok(value.to_string()),
        Some(Value::Bool(value)) => Ok(value.to_string()),
        _ => Err(MappingError {
            field: field.to_string(),
            path: path.to_string(),
        }),
    }
}
