//! Gatus API client for fetching endpoint health statuses
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::types::RawEndpointStatus;
use crate::error::UpstreamError;

const STATUSES_PATH: &str = "/api/v1/endpoints/statuses";
const USER_AGENT: &str = concat!("stremio-status/", env!("CARGO_PKG_VERSION"));

/// Anything that can list the raw endpoint statuses of a health monitor.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_statuses(&self) -> Result<Vec<RawEndpointStatus>, UpstreamError>;
}

/// Long-lived, connection-pooled client for one Gatus instance.
pub struct GatusClient {
    client: Client,
    statuses_url: String,
}

impl GatusClient {
    /// # Arguments
    /// * `base_url` - Gatus root URL, with or without a trailing slash
    /// * `timeout` - Per-request timeout; a timed out fetch is a plain failure
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            statuses_url: format!("{}{}", base_url.trim_end_matches('/'), STATUSES_PATH),
        })
    }

    pub fn statuses_url(&self) -> &str {
        &self.statuses_url
    }
}

#[async_trait]
impl StatusSource for GatusClient {
    async fn fetch_statuses(&self) -> Result<Vec<RawEndpointStatus>, UpstreamError> {
        let url = &self.statuses_url;
        tracing::debug!("Fetching statuses from {}", url);

        let request_error = |source| UpstreamError::Request {
            url: url.clone(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                url: url.clone(),
                status,
            });
        }

        let body = response.bytes().await.map_err(request_error)?;
        let statuses: Vec<RawEndpointStatus> =
            serde_json::from_slice(&body).map_err(|source| UpstreamError::Payload {
                url: url.clone(),
                source,
            })?;

        tracing::debug!("Fetched {} endpoint statuses", statuses.len());
        Ok(statuses)
    }
}
