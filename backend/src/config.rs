//! Configuration management for the Météo-Blob dashboard
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with METEO__ prefix

use std::time::Duration;

use chrono::{FixedOffset, Local, NaiveDate, Offset};
use config::{Environment, File};
use serde::Deserialize;
use shared::DateRange;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// HTTP surface serving the published state
    #[validate]
    pub server: ServerConfig,

    /// Upstream sensor API
    #[validate]
    pub sensor_api: SensorApiConfig,

    /// Polling loop
    #[validate]
    pub polling: PollingConfig,

    /// History charts
    #[validate]
    pub chart: ChartConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    #[validate(length(min = 1))]
    pub host: String,
}

#[derive(Debug, Deserialize, Clone, Validate)]
#[validate(schema(function = "validate_history_range"))]
pub struct SensorApiConfig {
    /// Base URL of the sensor API, e.g. `http://192.168.1.20:8000`
    #[validate(url)]
    pub base_url: String,

    /// Path of the endpoint returning the current and previous reading
    pub latest_path: String,

    /// Path of the endpoint returning the reading history
    pub list_path: String,

    /// Per-request timeout; unset means a slow response simply delays the next tick
    pub request_timeout_secs: Option<u64>,

    /// First day of history to request (`start` query parameter)
    pub history_start: Option<NaiveDate>,

    /// Last day of history to request (`end` query parameter)
    pub history_end: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct PollingConfig {
    /// Delay between ticks in milliseconds
    #[validate(range(min = 100, max = 3600000))]
    pub interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct ChartConfig {
    /// Number of trailing readings shown in the history charts
    #[validate(range(min = 1, max = 500))]
    pub window_size: usize,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DisplayConfig {
    /// Offset used for chart labels; the host's local offset when unset
    pub utc_offset_minutes: Option<i32>,
}

fn validate_history_range(api: &SensorApiConfig) -> Result<(), ValidationError> {
    match (api.history_start, api.history_end) {
        (Some(start), Some(end)) if start > end => {
            Err(ValidationError::new("history_start_after_end"))
        }
        _ => Ok(()),
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> AppResult<Self> {
        let environment =
            std::env::var("METEO_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let builder = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("sensor_api.base_url", "http://127.0.0.1:8000")?
            .set_default("sensor_api.latest_path", "/latest/")?
            .set_default("sensor_api.list_path", "/api/")?
            .set_default("polling.interval_ms", 2000)?
            .set_default("chart.window_size", shared::DEFAULT_WINDOW_SIZE as i64)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (METEO__ prefix)
            .add_source(
                Environment::with_prefix("METEO")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn polling_interval(&self) -> Duration {
        Duration::from_millis(self.polling.interval_ms)
    }

    pub fn history_range(&self) -> DateRange {
        DateRange::new(self.sensor_api.history_start, self.sensor_api.history_end)
    }

    /// Offset applied to chart labels
    pub fn display_offset(&self) -> AppResult<FixedOffset> {
        match self.display.utc_offset_minutes {
            Some(minutes) => FixedOffset::east_opt(minutes * 60).ok_or_else(|| {
                AppError::Configuration(format!("invalid display.utc_offset_minutes: {}", minutes))
            }),
            None => Ok(Local::now().offset().fix()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            sensor_api: SensorApiConfig::default(),
            polling: PollingConfig::default(),
            chart: ChartConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for SensorApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            latest_path: "/latest/".to_string(),
            list_path: "/api/".to_string(),
            request_timeout_secs: None,
            history_start: None,
            history_end: None,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { interval_ms: 2000 }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            window_size: shared::DEFAULT_WINDOW_SIZE,
        }
    }
}
