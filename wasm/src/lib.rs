//! WebAssembly module for the Météo-Blob dashboard
//!
//! Exposes the shared pipeline to the page's rendering layer:
//! - Payload normalization and history charts
//! - Live card (trend arrows, mood)
//! - Humidity gauge and the "no signal" fallback
//! - Particle placement for snow and rain
//!
//! Values cross the boundary as JSON strings.

use rand::{rngs::SmallRng, SeedableRng};
use serde::Serialize;
use shared::{FallbackView, MoodState, ParticleSpec, PipelineError};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    log("meteo-blob wasm module loaded");
}

/// Normalize a list payload (bare array, `data` or `results` envelope)
/// into its array of records
#[wasm_bindgen]
pub fn normalize_history(payload_json: &str) -> Result<String, JsValue> {
    normalize_history_json(payload_json).map_err(to_js_error)
}

/// Build the live card from the `latest` endpoint payload
///
/// `server_offset_minutes` is the sensor server's offset, used for its
/// `dd/mm/yyyy` timestamps.
#[wasm_bindgen]
pub fn build_live_view(latest_json: &str, server_offset_minutes: i32) -> Result<String, JsValue> {
    live_view_json(latest_json, server_offset_minutes).map_err(to_js_error)
}

/// Build both history charts and the gauge from the list payload
///
/// `utc_offset_minutes` is the browser's offset for the `HH:MM` labels,
/// i.e. `-new Date().getTimezoneOffset()`.
#[wasm_bindgen]
pub fn build_history_view(
    payload_json: &str,
    window_size: usize,
    utc_offset_minutes: i32,
) -> Result<String, JsValue> {
    history_view_json(payload_json, window_size, utc_offset_minutes).map_err(to_js_error)
}

/// Mood state for a reading
#[wasm_bindgen]
pub fn classify_mood(temperature: f64, humidity: f64) -> String {
    to_json(&shared::classify(temperature, humidity))
}

/// Humidity gauge for a reading
#[wasm_bindgen]
pub fn humidity_gauge(humidity: f64) -> String {
    to_json(&shared::HumidityGauge::for_humidity(humidity))
}

/// Arrow plus "Prev" caption, e.g. `⬆ Prev: 21.5°C`
#[wasm_bindgen]
pub fn trend_indicator(current: f64, previous: Option<f64>, unit: &str) -> Option<String> {
    shared::trend(current, previous).indicator(unit)
}

/// Live card shown while the latest endpoint cannot be reached
#[wasm_bindgen]
pub fn no_signal_state(reason: &str) -> String {
    to_json(&FallbackView::no_signal(reason))
}

/// Disconnected mood, for pages that render before the first poll
#[wasm_bindgen]
pub fn disconnected_mood() -> String {
    to_json(&MoodState::disconnected())
}

/// Place the particles of a mood's particle spec, capped at `MAX_PARTICLES`
///
/// Pass a seed for a reproducible layout; otherwise the clock seeds it.
#[wasm_bindgen]
pub fn scatter_particles(spec_json: &str, seed: Option<f64>) -> Result<String, JsValue> {
    scatter_particles_json(spec_json, seed)
        .map_err(|e| to_js_error(PipelineError::Format(e.to_string())))
}

fn normalize_history_json(payload_json: &str) -> Result<String, PipelineError> {
    let payload = parse_payload(payload_json)?;
    Ok(to_json(&shared::normalize(&payload)?))
}

fn live_view_json(latest_json: &str, server_offset_minutes: i32) -> Result<String, PipelineError> {
    let payload = parse_payload(latest_json)?;
    let offset = offset_from_minutes(server_offset_minutes)?;
    Ok(to_json(&shared::build_live_view(&payload, offset)?))
}

fn history_view_json(
    payload_json: &str,
    window_size: usize,
    utc_offset_minutes: i32,
) -> Result<String, PipelineError> {
    let payload = parse_payload(payload_json)?;
    let offset = offset_from_minutes(utc_offset_minutes)?;
    Ok(to_json(&shared::build_history_view(&payload, window_size, offset)?))
}

fn offset_from_minutes(minutes: i32) -> Result<chrono::FixedOffset, PipelineError> {
    minutes
        .checked_mul(60)
        .and_then(chrono::FixedOffset::east_opt)
        .ok_or_else(|| PipelineError::Format(format!("invalid UTC offset: {} minutes", minutes)))
}

fn scatter_particles_json(spec_json: &str, seed: Option<f64>) -> serde_json::Result<String> {
    let spec: ParticleSpec = serde_json::from_str(spec_json)?;
    let seed = seed.map(|s| s as u64).unwrap_or_else(seed_from_clock);
    let mut rng = SmallRng::seed_from_u64(seed);
    serde_json::to_string(&spec.scatter(&mut rng))
}

fn parse_payload(json: &str) -> Result<serde_json::Value, PipelineError> {
    serde_json::from_str(json).map_err(|e| PipelineError::Format(format!("invalid JSON: {}", e)))
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

fn to_js_error(err: PipelineError) -> JsValue {
    let message = format!("{}: {}", err.code(), err);
    warn(&message);
    JsValue::from_str(&message)
}

#[cfg(target_arch = "wasm32")]
fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

#[cfg(target_arch = "wasm32")]
fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn log(_message: &str) {}

#[cfg(not(target_arch = "wasm32"))]
fn warn(_message: &str) {}

#[cfg(target_arch = "wasm32")]
fn seed_from_clock() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn seed_from_clock() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}
