//! Sensor API client for fetching readings
//!
//! Talks to the two endpoints of the sensor server: `latest` (current and
//! previous scalars) and the history list. Payloads are returned as raw
//! JSON; shape detection happens in the shared pipeline.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use shared::{DateRange, PipelineError};

use crate::config::SensorApiConfig;
use crate::error::{AppError, AppResult};

/// Where the poller gets its payloads from
pub trait SensorSource: Send + Sync + 'static {
    /// Raw payload of the `latest` endpoint
    fn fetch_latest(&self) -> impl Future<Output = AppResult<Value>> + Send;

    /// Raw payload of the history endpoint, in whatever shape the server uses
    fn fetch_history(&self) -> impl Future<Output = AppResult<Value>> + Send;
}

/// Sensor API client
#[derive(Clone)]
pub struct SensorApiClient {
    client: Client,
    base_url: String,
    latest_path: String,
    list_path: String,
    history_range: DateRange,
}

impl SensorApiClient {
    /// Create a new SensorApiClient from configuration
    pub fn new(config: &SensorApiConfig, history_range: DateRange) -> AppResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
            latest_path: config.latest_path.clone(),
            list_path: config.list_path.clone(),
            history_range,
        })
    }

    /// Create a new SensorApiClient with default paths (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        let defaults = SensorApiConfig::default();
        Self {
            client: Client::new(),
            base_url,
            latest_path: defaults.latest_path,
            list_path: defaults.list_path,
            history_range: DateRange::default(),
        }
    }

    pub fn latest_url(&self) -> String {
        join_url(&self.base_url, &self.latest_path)
    }

    pub fn list_url(&self) -> String {
        join_url(&self.base_url, &self.list_path)
    }

    /// Fetch the current reading with its predecessor's scalars
    pub async fn get_latest(&self) -> AppResult<Value> {
        self.get_json(&self.latest_url(), &[]).await
    }

    /// Fetch the reading history, filtered by the configured day range
    pub async fn get_history(&self) -> AppResult<Value> {
        let query = self.history_range.query_pairs();
        self.get_json(&self.list_url(), &query).await
    }

    async fn get_json(&self, url: &str, query: &[(&'static str, String)]) -> AppResult<Value> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Sensor API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let payload = response
            .json::<Value>()
            .await
            .map_err(|e| PipelineError::Format(format!("response is not JSON: {}", e)))?;

        Ok(payload)
    }
}

impl SensorSource for SensorApiClient {
    async fn fetch_latest(&self) -> AppResult<Value> {
        self.get_latest().await
    }

    async fn fetch_history(&self) -> AppResult<Value> {
        self.get_history().await
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
