//! HTTP client for the aggregator's own API, used by the dashboard and the
//! `indices` command.

use crate::ClientError;
use lastsync_shared::tls_client::{TlsClientConfig, create_tls_client};
use lastsync_shared::{AggregationResult, ApiErrorBody, HealthResponse};
use reqwest::StatusCode;
use std::time::Duration;

pub const INDICES_PATH: &str = "/indices";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone)]
pub struct LastSyncClient {
    base_url: String,
    http: reqwest::Client,
}

impl LastSyncClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, Duration::from_secs(60))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Config("server url is required".to_string()));
        }

        let http = create_tls_client(TlsClientConfig::default().with_timeout(timeout))
            .map_err(ClientError::Config)?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get_json(HEALTH_PATH, &[]).await
    }

    /// Fetches the aggregated index list. System indices are only present
    /// when `include_system` is set.
    pub async fn list_indices(&self, include_system: bool) -> Result<AggregationResult, ClientError> {
        let include_system = if include_system { "true" } else { "false" };
        self.get_json(INDICES_PATH, &[("includeSystem", include_system)])
            .await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await
            .map_err(|error| {
                if error.is_connect() {
                    ClientError::Connection(error.to_string())
                } else {
                    ClientError::Http(error)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_error_status(status, body_text));
        }

        Ok(response.json().await?)
    }
}

fn map_error_status(status: StatusCode, body: String) -> ClientError {
    let message = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
        Err(_) => body,
    };

    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}
