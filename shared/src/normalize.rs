//! Locating the list of records in a history payload
//!
//! The upstream list endpoint has shipped three shapes over time:
//! - a bare array `[...]`
//! - a `{ "data": [...] }` envelope
//! - a paginated `{ "results": [...] }` envelope
//!
//! Each shape is one variant of [`HistoryPayload`], tried in that order.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{PipelineError, PipelineResult};
use crate::models::RawRecord;

/// Known server contracts for the history endpoint, in priority order
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum HistoryPayload {
    Bare(Vec<Value>),
    Data { data: Vec<Value> },
    Results { results: Vec<Value> },
}

impl HistoryPayload {
    /// Decode a payload; an envelope key that is not an array does not match
    pub fn decode(payload: &Value) -> PipelineResult<Self> {
        HistoryPayload::deserialize(payload)
            .map_err(|_| PipelineError::Format("no list found".to_string()))
    }

    /// Name of the matched shape, for logs
    pub fn shape(&self) -> &'static str {
        match self {
            HistoryPayload::Bare(_) => "bare",
            HistoryPayload::Data { .. } => "data",
            HistoryPayload::Results { .. } => "results",
        }
    }

    pub fn into_items(self) -> Vec<Value> {
        match self {
            HistoryPayload::Bare(items) => items,
            HistoryPayload::Data { data } => data,
            HistoryPayload::Results { results } => results,
        }
    }

    /// Unwrap the list; every element must be a JSON object
    pub fn into_records(self) -> PipelineResult<Vec<RawRecord>> {
        self.into_items()
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(record) => Ok(record),
                other => Err(PipelineError::Format(format!(
                    "record {} is not an object: {}",
                    index, other
                ))),
            })
            .collect()
    }
}

/// Extract the ordered records from a payload of unknown shape
pub fn normalize(payload: &Value) -> PipelineResult<Vec<RawRecord>> {
    HistoryPayload::decode(payload)?.into_records()
}
