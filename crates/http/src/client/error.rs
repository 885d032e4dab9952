//! Client error types

use crate::types::{ApiErrorBody, ApiFieldError};
use thiserror::Error;

/// Errors surfaced by the API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure, no response from the server.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Server responded with a non-success status.
    #[error("server error {status}: {message}")]
    Http {
        status: u16,
        message: String,
        field_errors: Vec<ApiFieldError>,
    },

    /// Response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Parse(String),

    /// Client was misconfigured.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Build an error from a failure status and its raw body, parsing the
    /// structured `{ message, errors: [{field, message}] }` shape when the
    /// server provides it.
    pub fn from_status(status: u16, body: &str) -> Self {
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
        Self::Http {
            status,
            message: parsed
                .message
                .unwrap_or_else(|| "API request failed".to_string()),
            field_errors: parsed.errors,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401, .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for showing to the user. Field errors, when
    /// present, are more specific than the envelope message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http {
                message,
                field_errors,
                ..
            } => {
                if field_errors.is_empty() {
                    message.clone()
                } else {
                    field_errors
                        .iter()
                        .map(|err| err.message.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                }
            }
            Self::Network(_) => "Could not reach the server. Check your connection.".to_string(),
            Self::Parse(_) => "The server sent an unexpected response.".to_string(),
            Self::Configuration(message) => message.clone(),
        }
    }
}
