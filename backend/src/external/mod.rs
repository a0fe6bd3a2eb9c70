//! External API integrations

pub mod sensor_api;

pub use sensor_api::{SensorApiClient, SensorSource};
