//! # Payment Error Types
//!
//! Typed error handling for the payment initiation service.
//! All payment operations return `Result<T, PaymentError>`.

use serde_json::Value;
use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing credentials, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request body could not be parsed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A required request field is absent
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// HTTP method not supported by the endpoint
    #[error("Method not allowed: {method}")]
    MethodNotAllowed { method: String },

    /// Gateway answered with a non-2xx status
    #[error("Provider error [{provider}] HTTP {status}: {message}")]
    ProviderError {
        provider: String,
        status: u16,
        message: String,
        /// Gateway error payload, when one was returned
        detail: Option<Value>,
    },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Gateway answered 2xx but the body was unusable
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse {
        provider: String,
        message: String,
        detail: Option<Value>,
    },
}

impl PaymentError {
    /// Returns true if the failure originated at the payment gateway
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            PaymentError::ProviderError { .. }
                | PaymentError::NetworkError(_)
                | PaymentError::MalformedResponse { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::MissingField { .. } => 400,
            PaymentError::MethodNotAllowed { .. } => 405,
            PaymentError::ProviderError { .. } => 500,
            PaymentError::NetworkError(_) => 500,
            PaymentError::MalformedResponse { .. } => 500,
        }
    }

    /// Best available detail for the caller: the gateway payload if there is
    /// one, otherwise the error message.
    pub fn detail(&self) -> Value {
        match self {
            PaymentError::ProviderError {
                detail: Some(detail),
                ..
            }
            | PaymentError::MalformedResponse {
                detail: Some(detail),
                ..
            } => detail.clone(),
            PaymentError::ProviderError { message, .. }
            | PaymentError::MalformedResponse { message, .. } => Value::String(message.clone()),
            PaymentError::NetworkError(message)
            | PaymentError::InvalidRequest(message)
            | PaymentError::Configuration(message) => Value::String(message.clone()),
            other => Value::String(other.to_string()),
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
