//! Error types for the dashboard.
//!
//! Per-ticker problems during a cycle (no data, closed market, a failed or
//! malformed generation) are reported as values by the crates that produce
//! them; these types cover the failures that stop an operation.

use thiserror::Error;

/// Top-level dashboard error.
#[derive(Error, Debug)]
pub enum ChartwiseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Price-data errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Chart endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Chart API error {code}: {description}")]
    Upstream { code: String, description: String },

    #[error("Malformed price data: {0}")]
    Malformed(String),

    #[error("Cannot read {path}: {message}")]
    File { path: String, message: String },

    #[error("Bar {index} is not after the previous bar")]
    Unordered { index: usize },

    #[error("Unknown bar interval: {0}")]
    UnknownInterval(String),
}

/// Indicator construction errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Errors raised by a text/image generation collaborator.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Generation returned no text")]
    EmptyResponse,
}

pub type ChartwiseResult<T> = Result<T, ChartwiseError>;
