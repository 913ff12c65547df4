//! Error types.

use std::collections::BTreeMap;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// How a failure is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Shown inline on the offending form fields.
    Validation,
    /// Handled globally by clearing the session and going to the login page.
    Authorization,
    /// Shown as a transient notification.
    Generic,
}

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized { message: Option<String> },
    #[error("{}", .message.as_deref().unwrap_or("Validation failed"))]
    Validation {
        message: Option<String>,
        fields: BTreeMap<String, Vec<String>>,
    },
    #[error("Request failed: HTTP {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },
    #[error("{message}")]
    Rejected { message: String },
    #[error("Request could not be sent: {0}")]
    Transport(#[from] TransportError),
    #[error("Failed to decode response: {0}")]
    Decode(String),
    #[error("Failed to encode request: {0}")]
    Encode(String),
}

impl ApiError {
    /// Builds the error for a non-success, non-401 response.
    pub fn from_status(status: u16, body: &str) -> Self {
        let error = serde_json::from_str::<cms_api::response::Error>(body).unwrap_or_default();
        let message = error.summary().map(str::to_string);
        if status == 400 && !error.errors.is_empty() {
            Self::Validation {
                message,
                fields: error.errors,
            }
        } else {
            Self::Status { status, message }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            _ => ErrorKind::Generic,
        }
    }

    /// The message the server sent along with the failure, if any.
    pub fn server_message(&self) -> Option<&str> {
        let message = match self {
            Self::Unauthorized { message }
            | Self::Validation { message, .. }
            | Self::Status { message, .. } => message.as_deref(),
            Self::Rejected { message } => Some(message.as_str()),
            Self::Transport(_) | Self::Decode(_) | Self::Encode(_) => None,
        };
        message.filter(|message| !message.trim().is_empty())
    }

    /// The server's message, or `fallback` when it did not send one.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

/// The request never produced a response.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Storage is unavailable: {0}")]
    Unavailable(String),
    #[error("Stored session is corrupt: {0}")]
    Corrupt(String),
    #[error("Failed to write to storage: {0}")]
    Write(String),
}
