use serde_json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, crate::error::Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported quant method: {0}")]
    UnsupportedQuantMethod(String),

    #[error("Unsupported quant format: {0}")]
    UnsupportedQuantFormat(String),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Hub API error: {0}")]
    HubError(#[from] hf_hub::api::sync::ApiError),
}
