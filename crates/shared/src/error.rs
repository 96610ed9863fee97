use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error reported by the list service in a failed response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ServiceError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

impl ServiceError {
    /// Parses `{"odata.error": {...}}` or `{"error": {...}}`. Returns `None`
    /// for bodies that carry no recognizable error message.
    pub fn from_body(body: &str) -> Option<Self> {
        let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
        let message = match envelope.error.message {
            ErrorMessage::Text(text) => text,
            ErrorMessage::Localized { value } => value,
        };
        if message.trim().is_empty() {
            return None;
        }
        Some(Self {
            code: envelope.error.code,
            message,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(rename = "odata.error", alias = "error")]
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    message: ErrorMessage,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    Text(String),
    Localized { value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_odata_error_with_localized_message() {
        let body = r#"{"odata.error":{"code":"-2147024891, System.UnauthorizedAccessException","message":{"lang":"en-US","value":"Access denied."}}}"#;
        let err = ServiceError::from_body(body).expect("error body");
        assert_eq!(err.message, "Access denied.");
        assert_eq!(
            err.code.as_deref(),
            Some("-2147024891, System.UnauthorizedAccessException")
        );
    }

    #[test]
    fn parses_plain_error_message() {
        let err = ServiceError::from_body(r#"{"error":{"message":"List not found"}}"#)
            .expect("error body");
        assert_eq!(err.to_string(), "List not found");
        assert_eq!(err.code, None);
    }

    #[test]
    fn ignores_unrecognized_bodies() {
        assert!(ServiceError::from_body("<html>bad gateway</html>").is_none());
        assert!(ServiceError::from_body(r#"{"error":{"message":"  "}}"#).is_none());
    }
}
