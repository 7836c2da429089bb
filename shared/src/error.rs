//! Error handling for the member browsing client

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Serializable view of an [`ApiError`], handy for surfacing failures to a UI layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 400/401 carrying field-keyed errors, flattened in body order.
    #[error("Validation failed: {}", errors.join(", "))]
    Validation { errors: Vec<String> },

    /// 400/401 without structured errors.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Not found: {url}")]
    NotFound { url: String },

    #[error("Server error: {body}")]
    Server { body: serde_json::Value },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Invalid form: {fields:?}")]
    InvalidForm { fields: HashMap<String, Vec<String>> },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    pub fn validation(errors: Vec<String>) -> Self {
        Self::Validation { errors }
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(url: impl Into<String>) -> Self {
        Self::NotFound { url: url.into() }
    }

    pub fn server(body: serde_json::Value) -> Self {
        Self::Server { body }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_form(fields: HashMap<String, Vec<String>>) -> Self {
        Self::InvalidForm { fields }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status behind the failure, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } | ApiError::Http { status, .. } => Some(*status),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Server { .. } => Some(500),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::Rejected { .. } => "REJECTED",
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::Server { .. } => "SERVER_ERROR",
            ApiError::Http { .. } => "HTTP_ERROR",
            ApiError::InvalidForm { .. } => "INVALID_FORM",
            ApiError::Configuration { .. } => "CONFIG_ERROR",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
            ApiError::Serialization(_) => "SERIALIZATION_ERROR",
            ApiError::Transport(_) => "HTTP_CLIENT_ERROR",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let details = match self {
            ApiError::Validation { errors } => Some(serde_json::json!(errors)),
            ApiError::Server { body } => Some(body.clone()),
            ApiError::InvalidForm { fields } => Some(serde_json::json!(fields)),
            _ => None,
        };

        ErrorResponse {
            error: self.error_code().to_string(),
            message: self.to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_every_error() {
        let err = ApiError::validation(vec!["too short".into(), "required".into()]);
        assert_eq!(err.to_string(), "Validation failed: too short, required");
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_server_error_keeps_body_in_response() {
        let err = ApiError::server(serde_json::json!({"detail": "boom"}));
        let response = err.to_response();
        assert_eq!(response.error, "SERVER_ERROR");
        assert_eq!(response.details, Some(serde_json::json!({"detail": "boom"})));
        assert_eq!(err.status(), Some(500));
    }
}
