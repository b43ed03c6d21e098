use crate::common_types::{RegistrationNumber, RegistryApiKey};
use crate::errors::AppError;
use crate::lookup::LookupConfig;
use crate::registry::{map_vehicle_data, RegistryLookup, VehicleRegistry};
use crate::AppResult;
use reqwest::StatusCode;
use rvstruct::ValueStruct;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpVehicleRegistryOptions {
    pub url: Url,
    pub api_key: RegistryApiKey,
    pub timeout: Duration,
}

impl HttpVehicleRegistryOptions {
    pub const API_KEY_ENV: &'static str = "VEHICLE_REGISTRY_API_KEY";
}

impl TryFrom<&LookupConfig> for HttpVehicleRegistryOptions {
    type Error = AppError;

    fn try_from(config: &LookupConfig) -> Result<Self, Self::Error> {
        let api_key = config
            .registry_api_key
            .clone()
            .ok_or_else(|| AppError::MissingCredential {
                name: Self::API_KEY_ENV.to_string(),
            })?;
        let url = config
            .registry_url
            .clone()
            .ok_or_else(|| AppError::LookupConfigError {
                message: "Vehicle registry URL is not configured".to_string(),
            })?;
        Ok(Self {
            url,
            api_key,
            timeout: config.timeout,
        })
    }
}

#[derive(Clone)]
pub struct HttpVehicleRegistry {
    client: reqwest::Client,
    options: HttpVehicleRegistryOptions,
}

impl HttpVehicleRegistry {
    const API_KEY_HEADER: &'static str = "x-api-key";
    const REGISTRATION_NUMBER_PARAM: &'static str = "registrationNumber";

    pub fn new(options: HttpVehicleRegistryOptions) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()?;
        Ok(Self::with_client(client, options))
    }

    pub fn with_client(client: reqwest::Client, options: HttpVehicleRegistryOptions) -> Self {
        Self { client, options }
    }

    fn lookup_url(&self, registration_number: &RegistrationNumber) -> Url {
        let mut url = self.options.url.clone();
        url.query_pairs_mut().append_pair(
            Self::REGISTRATION_NUMBER_PARAM,
            registration_number.value(),
        );
        url
    }

    fn request_error(registration_number: &RegistrationNumber, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            AppError::RegistryTimeout {
                registration_number: registration_number.value().clone(),
            }
        } else {
            AppError::RegistryLookupFailed {
                message: format!("{err}"),
            }
        }
    }
}

impl VehicleRegistry for HttpVehicleRegistry {
    async fn lookup(&self, registration_number: &RegistrationNumber) -> AppResult<RegistryLookup> {
        let response = self
            .client
            .get(self.lookup_url(registration_number))
            .header(Self::API_KEY_HEADER, self.options.api_key.value())
            .send()
            .await
            .map_err(|err| Self::request_error(registration_number, err))?;

        let response_status = response.status();
        debug!(
            registration_number = registration_number.value().as_str(),
            status = response_status.as_u16(),
            "Vehicle registry responded"
        );
        if response_status == StatusCode::NOT_FOUND || response_status == StatusCode::NO_CONTENT {
            return Ok(RegistryLookup::NotFound);
        }
        if !response_status.is_success()
            || response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<mime::Mime>().ok())
                .map(|mime_type| mime_type.essence_str() == mime::APPLICATION_JSON.as_ref())
                != Some(true)
        {
            let response_text = response.text().await.unwrap_or_default();
            return Err(AppError::RegistryLookupFailed {
                message: format!(
                    "Failed to look up vehicle: {response_text}. HTTP status: {response_status}."
                ),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| Self::request_error(registration_number, err))?;
        let payload: Value =
            serde_json::from_slice(&body).map_err(|err| AppError::RegistryLookupFailed {
                message: format!("Registry returned a malformed body: {err}"),
            })?;
        match payload {
            Value::Null => Ok(RegistryLookup::NotFound),
            Value::Object(ref fields) if fields.is_empty() => Ok(RegistryLookup::NotFound),
            payload => Ok(RegistryLookup::Found(map_vehicle_data(&payload)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    const VEHICLE_FIXTURE: &str = include_str!("../../test-fixtures/registry/vehicle.json");

    /// Serves one canned HTTP response and hands back the raw request head.
    async fn serve_once(
        status_line: &'static str,
        content_type: &'static str,
        body: &'static str,
    ) -> Result<(Url, oneshot::Receiver<String>), Box<dyn std::error::Error + Send + Sync>> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = Url::parse(&format!("http://{}/v1/vehicles", listener.local_addr()?))?;
        let (request_tx, request_rx) = oneshot::channel();
        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = vec![0u8; 8192];
            let mut request = Vec::new();
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = request_tx.send(String::from_utf8_lossy(&request).to_string());
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        Ok((url, request_rx))
    }

    fn registry(url: Url, timeout: Duration) -> Result<HttpVehicleRegistry, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()?;
        Ok(HttpVehicleRegistry::with_client(
            client,
            HttpVehicleRegistryOptions {
                url,
                api_key: RegistryApiKey::from("test-key".to_string()),
                timeout,
            },
        ))
    }

    #[tokio::test]
    async fn found_vehicle_is_mapped() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (url, request_rx) =
            serve_once("200 OK", "application/json; charset=utf-8", VEHICLE_FIXTURE).await?;
        let registry = registry(url, Duration::from_secs(5))?;

        let lookup = registry
            .lookup(&RegistrationNumber::from_plate("yf65 cvk"))
            .await?;
        match lookup {
            RegistryLookup::Found(vehicle_data) => {
                assert_eq!(vehicle_data.make, "FORD");
                assert_eq!(vehicle_data.power_bhp, "148 BHP");
            }
            RegistryLookup::NotFound => panic!("Expected a vehicle"),
        }

        let request = request_rx.await?.to_lowercase();
        assert!(request.starts_with("get /v1/vehicles?registrationnumber=yf65cvk "));
        assert!(request.contains("x-api-key: test-key"));
        Ok(())
    }

    #[tokio::test]
    async fn not_found_status_is_absence() -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    {
        let (url, _) = serve_once("404 Not Found", "application/json", "{}").await?;
        let registry = registry(url, Duration::from_secs(5))?;
        let lookup = registry
            .lookup(&RegistrationNumber::from_plate("AB12CDE"))
            .await?;
        assert_eq!(lookup, RegistryLookup::NotFound);
        Ok(())
    }

    #[tokio::test]
    async fn empty_result_is_absence() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (url, _) = serve_once("200 OK", "application/json", "null").await?;
        let registry = registry(url, Duration::from_secs(5))?;
        let lookup = registry
            .lookup(&RegistrationNumber::from_plate("AB12CDE"))
            .await?;
        assert_eq!(lookup, RegistryLookup::NotFound);
        Ok(())
    }

    #[tokio::test]
    async fn server_error_is_lookup_failure() -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    {
        let (url, _) = serve_once("503 Service Unavailable", "text/plain", "down").await?;
        let registry = registry(url, Duration::from_secs(5))?;
        let result = registry
            .lookup(&RegistrationNumber::from_plate("AB12CDE"))
            .await;
        assert!(matches!(result, Err(AppError::RegistryLookupFailed { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_is_lookup_failure(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (url, _) = serve_once("200 OK", "application/json", "{\"vehicle\":").await?;
        let registry = registry(url, Duration::from_secs(5))?;
        let result = registry
            .lookup(&RegistrationNumber::from_plate("AB12CDE"))
            .await;
        assert!(matches!(result, Err(AppError::RegistryLookupFailed { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn unexpected_schema_is_mapping_error(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (url, _) = serve_once(
            "200 OK",
            "application/json",
            r#"{"registrationNumber": "AB12CDE", "vehicle": {"make": "FORD"}}"#,
        )
        .await?;
        let registry = registry(url, Duration::from_secs(5))?;
        let result = registry
            .lookup(&RegistrationNumber::from_plate("AB12CDE"))
            .await;
        assert!(matches!(result, Err(AppError::VehicleMappingError(_))));
        Ok(())
    }

    #[tokio::test]
    async fn silent_registry_times_out() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = Url::parse(&format!("http://{}/v1/vehicles", listener.local_addr()?))?;
        tokio::spawn(async move {
            if let Ok((socket, _)) = listener.accept().await {
                tokio::time::sleep(Duration::from_secs(10)).await;
                drop(socket);
            }
        });
        let registry = registry(url, Duration::from_millis(200))?;
        let result = registry
            .lookup(&RegistrationNumber::from_plate("AB12CDE"))
            .await;
        match result {
            Err(err @ AppError::RegistryTimeout { .. }) => assert!(err.is_registry_failure()),
            other => panic!("Expected a timeout, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn no_content_is_absence() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (url, _) = serve_once("204 No Content", "", "").await?;
        let registry = registry(url, Duration::from_secs(5))?;
        let lookup = registry
            .lookup(&RegistrationNumber::from_plate("AB12CDE"))
            .await?;
        assert_eq!(lookup, RegistryLookup::NotFound);
        Ok(())
    }

    #[tokio::test]
    async fn empty_object_is_absence() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (url, _) = serve_once("200 OK", "application/json", "{}").await?;
        let registry = registry(url, Duration::from_secs(5))?;
        let lookup = registry
            .lookup(&RegistrationNumber::from_plate("AB12CDE"))
            .await?;
        assert_eq!(lookup, RegistryLookup::NotFound);
        Ok(())
    }

    #[tokio::test]
    async fn non_json_body_is_lookup_failure(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (url, _) = serve_once("200 OK", "text/html", "<html/>").await?;
        let registry = registry(url, Duration::from_secs(5))?;
        let result = registry
            .lookup(&RegistrationNumber::from_plate("AB12CDE"))
            .await;
        assert!(matches!(result, Err(AppError::RegistryLookupFailed { .. })));
        Ok(())
    }

    #[test]
    fn options_require_api_key_and_url() {
        let config = LookupConfig {
            registry_url: Url::parse("https://registry.example.com/v1/vehicles").ok(),
            registry_api_key: None,
            timeout: Duration::from_secs(1),
        };
        match HttpVehicleRegistryOptions::try_from(&config) {
            Err(AppError::MissingCredential { name }) => {
                assert_eq!(name, "VEHICLE_REGISTRY_API_KEY")
            }
            other => panic!("Expected a missing credential, got {other:?}"),
        }

        let config = LookupConfig {
            registry_url: None,
            registry_api_key: Some(RegistryApiKey::from("key".to_string())),
            timeout: Duration::from_secs(1),
        };
        assert!(matches!(
            HttpVehicleRegistryOptions::try_from(&config),
            Err(AppError::LookupConfigError { .. })
        ));
    }
}
