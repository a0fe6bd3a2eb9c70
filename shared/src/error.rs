//! Errors raised while turning an upstream payload into readings

use thiserror::Error;

/// Pipeline error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The payload has no discoverable list of records
    #[error("Format error: {0}")]
    Format(String),

    /// A record lacks every alias of a required field
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// A record carries a field whose value is not a usable number
    #[error("Invalid value for {field}: {value}")]
    InvalidField { field: &'static str, value: String },

    /// The timestamp could not be parsed
    #[error("Unparsable timestamp: {0}")]
    TimeParse(String),
}

impl PipelineError {
    /// Stable machine-readable code, used in logs and API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::Format(_) => "FORMAT_ERROR",
            PipelineError::MissingField(_) => "MISSING_FIELD",
            PipelineError::InvalidField { .. } => "INVALID_FIELD",
            PipelineError::TimeParse(_) => "TIME_PARSE_ERROR",
        }
    }
}

/// Result type alias for the pipeline
pub type PipelineResult<T> = Result<T, PipelineError>;
