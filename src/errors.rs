use indicatif::style::TemplateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Input/output error")]
    InputOutputError(#[from] std::io::Error),
    #[error("JSON error:\n{0}")]
    JsonError(#[from] serde_json::Error),
    #[error("HTTP client error:\n{0}")]
    HttpClientError(#[from] reqwest::Error),
    #[error("Missing credential: {name} is required")]
    MissingCredential { name: String },
    #[error("Lookup config error: {message}")]
    LookupConfigError { message: String },
    #[error("Vehicle registry timed out looking up {registration_number}")]
    RegistryTimeout { registration_number: String },
    #[error("Vehicle registry lookup failed: {message}")]
    RegistryLookupFailed { message: String },
    #[error("Unexpected vehicle registry payload: {0}")]
    VehicleMappingError(#[from] MappingError),
    #[error("Template error: {0}")]
    TemplateError(#[from] TemplateError),
    #[error("System error: {message}")]
    SystemError { message: String },
}

impl AppError {
    /// Failures that may go away on their own (timeouts, 5xx, broken bodies),
    /// as opposed to a registry schema mismatch.
    pub fn is_registry_failure(&self) -> bool {
        matches!(
            self,
            AppError::RegistryTimeout { .. }
                | AppError::RegistryLookupFailed { .. }
                | AppError::HttpClientError(_)
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("missing or non-scalar '{field}' at '{path}'")]
pub struct MappingError {
    pub field: String,
    pub path: String,
}
