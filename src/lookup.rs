use crate::common_types::{RegistrationNumber, RegistryApiKey};
use crate::errors::AppError;
use crate::ocr::TextAnnotation;
use crate::plates::{dedupe, extract};
use crate::registry::{
    HttpVehicleRegistry, HttpVehicleRegistryOptions, RegistryLookup, VehicleData,
    VehicleRegistry,
};
use crate::AppResult;
use rvstruct::ValueStruct;
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub registry_url: Option<Url>,
    pub registry_api_key: Option<RegistryApiKey>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LookupStatus {
    NoTextDetected,
    NoValidPlateFound,
    VehicleFound,
    VehicleNotFound,
    RegistryLookupFailed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateLookupResponse {
    pub status: LookupStatus,
    pub has_text: bool,
    pub text: Vec<TextAnnotation>,
    pub full_text: String,
    pub all_text: String,
    pub license_plates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_data: Option<VehicleData>,
    pub message: String,
}

/// Turns one OCR result into a response: extracts plates, looks up the best
/// one and reports the outcome. Holds no per-request state.
pub struct PlateLookup<R> {
    registry: R,
}

impl PlateLookup<HttpVehicleRegistry> {
    pub fn from_config(config: &LookupConfig) -> AppResult<Self> {
        let options = HttpVehicleRegistryOptions::try_from(config)?;
        Ok(Self::new(HttpVehicleRegistry::new(options)?))
    }
}

impl<R: VehicleRegistry> PlateLookup<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    pub async fn process(&self, annotations: Vec<TextAnnotation>) -> PlateLookupResponse {
        if annotations
            .iter()
            .all(|annotation| annotation.text.trim().is_empty())
        {
            return PlateLookupResponse {
                status: LookupStatus::NoTextDetected,
                has_text: false,
                text: annotations,
                full_text: String::new(),
                all_text: String::new(),
                license_plates: Vec::new(),
                vehicle_data: None,
                message: "No text detected in image".to_string(),
            };
        }

        let license_plates = dedupe(extract(&annotations));
        let all_text = annotations
            .iter()
            .skip(1)
            .map(|annotation| annotation.text.as_str())
            .collect::<Vec<_>>()
            .join(" | ");

        let Some(best_plate) = license_plates.first() else {
            info!("No license plate found in OCR text");
            return PlateLookupResponse {
                status: LookupStatus::NoValidPlateFound,
                has_text: true,
                full_text: general_text(&annotations),
                text: annotations,
                all_text,
                license_plates,
                vehicle_data: None,
                message: "No license plate detected".to_string(),
            };
        };

        info!(
            candidates = license_plates.len(),
            plate = best_plate.as_str(),
            "Looking up best license plate candidate"
        );
        let registration_number = RegistrationNumber::from_plate(best_plate);
        let (status, vehicle_data, message) = match self.registry.lookup(&registration_number).await
        {
            Ok(RegistryLookup::Found(vehicle_data)) => {
                let message = format!(
                    "Found {} {} for license plate {}",
                    vehicle_data.make,
                    vehicle_data.model,
                    registration_number.value()
                );
                (LookupStatus::VehicleFound, Some(vehicle_data), message)
            }
            Ok(RegistryLookup::NotFound) => (
                LookupStatus::VehicleNotFound,
                None,
                vehicle_not_found_message(&registration_number),
            ),
            Err(AppError::VehicleMappingError(err)) => {
                warn!(
                    plate = registration_number.value().as_str(),
                    "Registry payload did not match the expected schema: {err}"
                );
                (
                    LookupStatus::VehicleNotFound,
                    None,
                    vehicle_not_found_message(&registration_number),
                )
            }
            Err(err) => {
                if err.is_registry_failure() {
                    warn!(
                        plate = registration_number.value().as_str(),
                        "Vehicle registry lookup failed, the caller may retry: {err}"
                    );
                } else {
                    error!(
                        plate = registration_number.value().as_str(),
                        "Vehicle registry lookup failed: {err}"
                    );
                }
                (
                    LookupStatus::RegistryLookupFailed,
                    None,
                    format!(
                        "License plate {} detected, but the vehicle lookup failed: {err}",
                        registration_number.value()
                    ),
                )
            }
        };

        PlateLookupResponse {
            status,
            has_text: true,
            full_text: license_plates.join(", "),
            text: annotations,
            all_text,
            license_plates,
            vehicle_data,
            message,
        }
    }
}

fn vehicle_not_found_message(registration_number: &RegistrationNumber) -> String {
    format!(
        "License plate {} detected, but no vehicle data was found",
        registration_number.value()
    )
}

/// The full image text with line breaks and runs of spaces collapsed.
fn general_text(annotations: &[TextAnnotation]) -> String {
    annotations
        .first()
        .map(|annotation| {
            annotation
                .text
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}
