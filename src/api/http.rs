//! reqwest transport for the SmartSea backend

use super::types::{ChatReply, ChatRequest, FishingData, WeatherReport};
use super::{ApiError, ChatBackend, MarineDataSource};
use crate::config::BackendConfig;
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

/// HTTP client for the marine data and chat endpoints
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.api_url)
            .map_err(|e| ApiError::network(format!("Invalid backend URL {}: {e}", config.api_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::network(format!(
                "Backend URL cannot be a base: {}",
                config.api_url
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Base URL with `segments` appended; each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(ApiError::status(
                status.as_u16(),
                format!("HTTP {status}: {body}"),
            ));
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::parse(format!("Failed to parse response: {e} - body: {body}")))
    }
}

#[async_trait]
impl MarineDataSource for HttpBackend {
    async fn fishing_data(&self, location: &str) -> Result<FishingData, ApiError> {
        let response = self
            .client
            .get(self.endpoint(&["get_fishing_data"]))
            .query(&[("location", location)])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn weather(&self, location: &str) -> Result<WeatherReport, ApiError> {
        let response = self
            .client
            .get(self.endpoint(&["weather", location]))
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.endpoint(&["chat"]))
            .json(request)
            .send()
            .await?;
        let reply: ChatReply = Self::decode(response).await?;

        reply
            .response
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ApiError::parse("Chat reply has no response text"))
    }
}
