//! HTTP implementation of the clinical-data API
//!
//! Talks FHIR R4 REST (`application/fhir+json`) to a resource server such as
//! HAPI FHIR, with basic or bearer authentication and retry with exponential
//! backoff on transient failures.

use super::api::ClinicalDataApi;
use crate::config::FhirConfig;
use crate::domain::ids::is_resource_id;
use crate::domain::{Bundle, FhirError, Resource, ResourceKind, Result, SearchError};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::time::Duration;

const FHIR_JSON: &str = "application/fhir+json";

/// FHIR server client over HTTP
///
/// # Example
///
/// ```no_run
/// use journal_search::adapters::fhir::{ClinicalDataApi, HttpFhirClient};
/// use journal_search::config::FhirConfig;
///
/// # async fn example() -> journal_search::domain::Result<()> {
/// let client = HttpFhirClient::new(FhirConfig::default())?;
/// let bundle = client.search_patients_by_name("Anna").await?;
/// # Ok(())
/// # }
/// ```
pub struct HttpFhirClient {
    /// Base URL without trailing slash
    base_url: String,

    /// HTTP client for making requests
    client: Client,

    /// FHIR configuration
    config: FhirConfig,
}

impl HttpFhirClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: FhirConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10));

        if !config.tls_verify {
            tracing::warn!(base_url = %base_url, "TLS certificate verification is disabled");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            SearchError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            base_url,
            client,
            config,
        })
    }

    /// Build authorization header value
    fn auth_header_value(&self) -> Option<String> {
        match self.config.auth_type.as_str() {
            "bearer" => self
                .config
                .token
                .as_ref()
                .map(|token| format!("Bearer {}", token.expose_secret())),
            "basic" => match (&self.config.username, &self.config.password) {
                (Some(username), Some(password)) => {
                    let credentials = format!("{username}:{}", password.expose_secret());
                    let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
                    Some(format!("Basic {encoded}"))
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// Retry a request with exponential backoff
    ///
    /// Only errors classified as retryable are repeated.
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_retries = self.config.retry.max_retries.max(1);
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    if attempt >= max_retries || !e.is_retryable() {
                        return Err(e);
                    }

                    let delay_ms = (self.config.retry.initial_delay_ms as f64
                        * self
                            .config
                            .retry
                            .backoff_multiplier
                            .powi(attempt as i32 - 1)) as u64;
                    let delay_ms = delay_ms.min(self.config.retry.max_delay_ms);

                    crate::log_retry_attempt!(attempt, max_retries, e.to_string());
                    tracing::debug!(delay_ms = delay_ms, "Backing off before retry");

                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }

    /// GET `{base}/{path}` and decode the JSON body
    ///
    /// An empty or `null` body decodes to `None`; so does 404 when
    /// `missing_is_none` is set.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        missing_is_none: bool,
    ) -> Result<Option<T>> {
        let url = format!("{}/{}", self.base_url, path);

        tracing::debug!(url = %url, params = params.len(), "FHIR request");

        self.retry_request(|| async {
            let mut request = self
                .client
                .get(&url)
                .header("Accept", FHIR_JSON)
                .query(params);

            if let Some(auth) = self.auth_header_value() {
                request = request.header("Authorization", auth);
            }

            let resp = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    SearchError::Fhir(FhirError::Timeout(e.to_string()))
                } else {
                    SearchError::Fhir(FhirError::ConnectionFailed(e.to_string()))
                }
            })?;

            let status = resp.status();
            match status {
                s if s.is_success() => {
                    let body = resp.text().await.map_err(|e| {
                        SearchError::Fhir(FhirError::InvalidResponse(e.to_string()))
                    })?;
                    decode_body(&body)
                }
                StatusCode::NOT_FOUND if missing_is_none => Ok(None),
                StatusCode::NOT_FOUND => Err(SearchError::Fhir(FhirError::NotFound(url.clone()))),
                s if s.is_server_error() => {
                    let message = resp.text().await.unwrap_or_default();
                    Err(SearchError::Fhir(FhirError::ServerError {
                        status: s.as_u16(),
                        message,
                    }))
                }
                s => {
                    let message = resp.text().await.unwrap_or_default();
                    Err(SearchError::Fhir(FhirError::ClientError {
                        status: s.as_u16(),
                        message,
                    }))
                }
            }
        })
        .await
    }

    async fn search(&self, kind: ResourceKind, params: &[(&str, &str)]) -> Result<Option<Bundle>> {
        self.get_json(kind.as_str(), params, false).await
    }

    /// Reads `{kind}/{id}`; an id that is not a FHIR logical id names no
    /// resource and is answered without a request
    async fn read(&self, kind: ResourceKind, id: &str) -> Result<Option<Resource>> {
        let id = id.trim();
        if !is_resource_id(id) {
            tracing::debug!(kind = %kind, "Not a resource id, skipping read");
            return Ok(None);
        }
        let path = format!("{kind}/{id}");
        self.get_json(&path, &[], true).await
    }

    /// Checks that the server answers its capability statement
    ///
    /// # Errors
    ///
    /// Returns an error if the server is not reachable or not responding.
    pub async fn health_check(&self) -> Result<()> {
        match self
            .get_json::<serde_json::Value>("metadata", &[], false)
            .await
        {
            Ok(_) => {
                tracing::info!(base_url = %self.base_url, "FHIR server health check passed");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    base_url = %self.base_url,
                    error = %e,
                    "FHIR server health check failed"
                );
                Err(e)
            }
        }
    }
}

/// Decodes a response body, treating empty and `null` bodies as absent
fn decode_body<T: DeserializeOwned>(body: &str) -> Result<Option<T>> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| SearchError::Fhir(FhirError::InvalidResponse(e.to_string())))
}

#[async_trait]
impl ClinicalDataApi for HttpFhirClient {
    async fn search_patients_by_name(&self, name: &str) -> Result<Option<Bundle>> {
        self.search(ResourceKind::Patient, &[("name", name)]).await
    }

    async fn search_conditions_by_text(&self, text: &str) -> Result<Option<Bundle>> {
        self.search(ResourceKind::Condition, &[("code:text", text)])
            .await
    }

    async fn get_patient(&self, id: &str) -> Result<Option<Resource>> {
        self.read(ResourceKind::Patient, id).await
    }

    async fn get_practitioner(&self, id: &str) -> Result<Option<Resource>> {
        self.read(ResourceKind::Practitioner, id).await
    }

    async fn search_practitioner_by_identifier(&self, token: &str) -> Result<Option<Bundle>> {
        self.search(ResourceKind::Practitioner, &[("identifier", token)])
            .await
    }

    async fn search_encounters_by_practitioner(
        &self,
        practitioner: &str,
    ) -> Result<Option<Bundle>> {
        self.search(ResourceKind::Encounter, &[("participant", practitioner)])
            .await
    }

    async fn search_encounters_by_practitioner_and_date(
        &self,
        practitioner_id: &str,
        date: &str,
    ) -> Result<Option<Bundle>> {
        self.search(
            ResourceKind::Encounter,
            &[("participant", practitioner_id), ("date", date)],
        )
        .await
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    #[test]
    fn test_client_trims_trailing_slash() {
        let config = FhirConfig {
            base_url: "http://localhost:8080/fhir/".to_string(),
            ..Default::default()
        };
        let client = HttpFhirClient::new(config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/fhir");
    }

    #[test]
    fn test_no_auth_header_by_default() {
        let client = HttpFhirClient::new(FhirConfig::default()).unwrap();
        assert_eq!(client.auth_header_value(), None);
    }

    #[test]
    fn test_basic_auth_header() {
        let config = FhirConfig {
            auth_type: "basic".to_string(),
            username: Some("user".to_string()),
            password: Some(secret_string("pass".to_string())),
            ..Default::default()
        };
        let client = HttpFhirClient::new(config).unwrap();
        assert_eq!(
            client.auth_header_value().as_deref(),
            Some("Basic dXNlcjpwYXNz")
        );
    }

    #[test]
    fn test_bearer_auth_header() {
        let config = FhirConfig {
            auth_type: "bearer".to_string(),
            token: Some(secret_string("abc".to_string())),
            ..Default::default()
        };
        let client = HttpFhirClient::new(config).unwrap();
        assert_eq!(client.auth_header_value().as_deref(), Some("Bearer abc"));
    }

    #[test]
    fn test_decode_body_absent() {
        assert_eq!(decode_body::<Bundle>("").unwrap(), None);
        assert_eq!(decode_body::<Bundle>("  null \n").unwrap(), None);
    }

    #[test]
    fn test_decode_body_invalid() {
        let err = decode_body::<Bundle>("<html>").unwrap_err();
        assert!(matches!(
            err,
            SearchError::Fhir(FhirError::InvalidResponse(_))
        ));
    }
}
