//! # Gateway Error Types
//!
//! Typed error handling for the CHIP integration.
//! All gateway operations return `Result<T, ChipError>`.

use serde_json::Value;
use thiserror::Error;

/// Failure reported by the CHIP API (non-2xx response or unusable body).
///
/// Carries the HTTP status and the response payload for diagnostics.
/// Never retried.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
    status_code: Option<u16>,
    payload: Option<Value>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status_code: Option<u16>, payload: Option<Value>) -> Self {
        Self {
            message: message.into(),
            status_code,
            payload,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status returned by the gateway, if the failure came from a response
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Response payload returned by the gateway, if any
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Message, payload and status joined into one line for logging.
    pub fn detailed_message(&self) -> String {
        let mut details = self.message.clone();

        if let Some(payload) = &self.payload {
            details.push_str(" | Payload: ");
            details.push_str(&payload.to_string());
        }

        if let Some(status) = self.status_code {
            details.push_str(&format!(" | HTTP status: {}", status));
        }

        details
    }
}

/// Core error type for all gateway operations
#[derive(Debug, Error)]
pub enum ChipError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The CHIP API answered with an error
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Network/HTTP error communicating with the gateway
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Webhook shared secret missing or wrong
    #[error("Webhook verification failed: {0}")]
    WebhookUnauthorized(String),

    /// Webhook body could not be parsed
    #[error("Webhook parse error: {0}")]
    WebhookParse(String),

    /// Application callback handler failed
    #[error("Callback handler error: {0}")]
    Handler(String),
}

impl ChipError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ChipError::Configuration(_) => 500,
            ChipError::InvalidRequest(_) => 400,
            ChipError::Api(_) => 502,
            ChipError::Network(_) => 503,
            ChipError::Serialization(_) => 502,
            ChipError::WebhookUnauthorized(_) => 401,
            ChipError::WebhookParse(_) => 500,
            ChipError::Handler(_) => 500,
        }
    }

    /// The underlying API error, when the gateway rejected the call
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            ChipError::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Best description for logs: API errors include payload and status.
    pub fn detailed_message(&self) -> String {
        match self {
            ChipError::Api(err) => err.detailed_message(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for gateway operations
pub type ChipResult<T> = Result<T, ChipError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detailed_message_full() {
        let err = ApiError::new(
            "CHIP API error",
            Some(422),
            Some(json!({"error": "invalid"})),
        );
        assert_eq!(
            err.detailed_message(),
            r#"CHIP API error | Payload: {"error":"invalid"} | HTTP status: 422"#
        );
    }

    #[test]
    fn test_detailed_message_omits_missing_parts() {
        let err = ApiError::new("no checkout url", None, None);
        assert_eq!(err.detailed_message(), "no checkout url");
        assert_eq!(err.to_string(), "no checkout url");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ChipError::WebhookUnauthorized("bad".into()).status_code(),
            401
        );
        assert_eq!(ChipError::InvalidRequest("x".into()).status_code(), 400);
        assert_eq!(
            ChipError::from(ApiError::new("x", Some(422), None)).status_code(),
            502
        );
        assert_eq!(ChipError::Handler("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_as_api_error() {
        let err = ChipError::from(ApiError::new("x", Some(404), None));
        assert_eq!(err.as_api_error().and_then(|e| e.status_code()), Some(404));
        assert!(ChipError::Network("down".into()).as_api_error().is_none());
    }
}
