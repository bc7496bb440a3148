//! SmartSea backend contract
//!
//! Two data endpoints feed the environment aggregator and one chat endpoint
//! feeds the conversation session. The traits here are the seams the runtimes
//! are generic over; [`HttpBackend`] is the production implementation.

mod error;
mod http;
pub mod types;

pub use error::{ApiError, ApiErrorKind};
pub use http::HttpBackend;
pub use types::{ChatRequest, FishingData, HistoryEntry, WeatherReport, WireRole};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Source of fishing-zone and weather data
#[async_trait]
pub trait MarineDataSource: Send + Sync {
    /// Primary query: zones, border flag, basic weather
    async fn fishing_data(&self, location: &str) -> Result<FishingData, ApiError>;

    /// Secondary query: detailed weather, forecast, marine, alerts
    async fn weather(&self, location: &str) -> Result<WeatherReport, ApiError>;
}

/// Stateless chat backend; the full history is replayed on every call
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Returns the assistant's reply text
    async fn chat(&self, request: &ChatRequest) -> Result<String, ApiError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: MarineDataSource + ?Sized> MarineDataSource for Arc<T> {
    async fn fishing_data(&self, location: &str) -> Result<FishingData, ApiError> {
        (**self).fishing_data(location).await
    }

    async fn weather(&self, location: &str) -> Result<WeatherReport, ApiError> {
        (**self).weather(location).await
    }
}

#[async_trait]
impl<T: ChatBackend + ?Sized> ChatBackend for Arc<T> {
    async fn chat(&self, request: &ChatRequest) -> Result<String, ApiError> {
        (**self).chat(request).await
    }
}

// ============================================================================
// Logging wrapper
// ============================================================================

/// Logs every backend call with its duration and outcome
pub struct LoggingBackend<T> {
    inner: T,
}

impl<T> LoggingBackend<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

fn log_outcome<V>(endpoint: &str, started: Instant, result: &Result<V, ApiError>) {
    let duration_ms = started.elapsed().as_millis();
    match result {
        Ok(_) => {
            tracing::info!(endpoint, duration_ms = %duration_ms, "Backend request completed");
        }
        Err(e) => {
            tracing::warn!(
                endpoint,
                duration_ms = %duration_ms,
                kind = e.kind.label(),
                error = %e.message,
                "Backend request failed"
            );
        }
    }
}

#[async_trait]
impl<T: MarineDataSource> MarineDataSource for LoggingBackend<T> {
    async fn fishing_data(&self, location: &str) -> Result<FishingData, ApiError> {
        let started = Instant::now();
        let result = self.inner.fishing_data(location).await;
        log_outcome("get_fishing_data", started, &result);
        result
    }

    async fn weather(&self, location: &str) -> Result<WeatherReport, ApiError> {
        let started = Instant::now();
        let result = self.inner.weather(location).await;
        log_outcome("weather", started, &result);
        result
    }
}

#[async_trait]
impl<T: ChatBackend> ChatBackend for LoggingBackend<T> {
    async fn chat(&self, request: &ChatRequest) -> Result<String, ApiError> {
        let started = Instant::now();
        let result = self.inner.chat(request).await;
        log_outcome("chat", started, &result);
        result
    }
}
