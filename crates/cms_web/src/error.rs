//! Our custom error type.

use cms::{ApiError, StorageError};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

pub type WebResult<T> = Result<T, WebError>;

#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct WebError {
    pub message: String,
}

impl WebError {
    /// The server's message for a failed request, or `fallback`.
    pub fn from_api(error: &ApiError, fallback: &str) -> Self {
        Self {
            message: error.user_message(fallback),
        }
    }
}

impl From<eyre::Report> for WebError {
    fn from(value: eyre::Report) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

impl From<ApiError> for WebError {
    fn from(value: ApiError) -> Self {
        Self::from_api(&value, &value.to_string())
    }
}

impl From<StorageError> for WebError {
    fn from(value: StorageError) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}
