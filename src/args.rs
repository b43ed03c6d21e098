use crate::common_types::RegistryApiKey;
use crate::errors::AppError;
use crate::lookup::LookupConfig;
use crate::registry::HttpVehicleRegistryOptions;
use clap::*;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    #[command(about = "Extract license plate candidates from OCR annotations")]
    Extract {
        #[arg(
            help = "OCR result as JSON: an annotation array or a Cloud Vision textAnnotations response"
        )]
        input: PathBuf,
    },
    #[command(about = "Extract the best license plate and look up the vehicle in the registry")]
    Lookup {
        #[arg(
            help = "OCR result as JSON: an annotation array or a Cloud Vision textAnnotations response"
        )]
        input: PathBuf,

        #[arg(long, help = "Pretty-print the JSON response", default_value = "false")]
        pretty: bool,

        #[command(flatten)]
        registry_args: RegistryArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RegistryArgs {
    #[arg(
        long,
        env = "VEHICLE_REGISTRY_URL",
        help = "Vehicle registry lookup endpoint such as https://registry.example.com/v1/vehicles"
    )]
    pub registry_url: Option<Url>,

    #[arg(
        long,
        env = "VEHICLE_REGISTRY_API_KEY",
        hide_env_values = true,
        help = "API key sent to the vehicle registry"
    )]
    pub registry_api_key: Option<String>,

    #[arg(
        long,
        env = "VEHICLE_REGISTRY_TIMEOUT_MS",
        help = "Vehicle registry request timeout in milliseconds",
        default_value = "10000"
    )]
    pub registry_timeout_ms: u64,
}

impl TryInto<LookupConfig> for RegistryArgs {
    type Error = AppError;

    fn try_into(self) -> Result<LookupConfig, Self::Error> {
        if self.registry_timeout_ms == 0 {
            return Err(AppError::LookupConfigError {
                message: "Registry timeout should be more than zero".to_string(),
            });
        }
        let registry_api_key = match self.registry_api_key {
            Some(api_key) if !api_key.trim().is_empty() => Some(RegistryApiKey::from(api_key)),
            _ => {
                return Err(AppError::MissingCredential {
                    name: HttpVehicleRegistryOptions::API_KEY_ENV.to_string(),
                })
            }
        };
        Ok(LookupConfig {
            registry_url: self.registry_url,
            registry_api_key,
            timeout: Duration::from_millis(self.registry_timeout_ms),
        })
    }
}
