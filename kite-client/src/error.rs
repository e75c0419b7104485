//! Error types for the Buildkite client

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Buildkite client
#[derive(Debug, Error)]
pub enum ClientError {
    /// The client was constructed with an unusable base URL
    #[error("Invalid client configuration: {0}")]
    Configuration(String),

    /// HTTP request failed before a response was read
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered 404
    #[error("Resource not found: {url}")]
    NotFound {
        /// URL that was requested
        url: String,
    },

    /// The API answered with any other non-2xx status
    #[error("API error ({status_line}): {body}")]
    Remote {
        /// HTTP status code
        status: u16,
        /// Status code and reason phrase, e.g. "422 Unprocessable Entity"
        status_line: String,
        /// Raw response body
        body: String,
    },

    /// Request body could not be encoded or response body could not be decoded
    #[error("Failed to encode or decode JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Create a remote error from a status code and response body
    pub fn remote(status: StatusCode, body: impl Into<String>) -> Self {
        let status_line = match status.canonical_reason() {
            Some(reason) => format!("{} {}", status.as_u16(), reason),
            None => status.as_u16().to_string(),
        };

        Self::Remote {
            status: status.as_u16(),
            status_line,
            body: body.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_status_line() {
        let err = ClientError::remote(StatusCode::UNPROCESSABLE_ENTITY, "{}");
        match &err {
            ClientError::Remote {
                status,
                status_line,
                ..
            } => {
                assert_eq!(*status, 422);
                assert_eq!(status_line, "422 Unprocessable Entity");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_is_distinct() {
        let err = ClientError::NotFound {
            url: "https://api.buildkite.com/v2/organizations/acme/pipelines/gone".to_string(),
        };
        assert!(err.is_not_found());
    }

    #[test]
    fn test_server_error() {
        let err = ClientError::remote(StatusCode::BAD_GATEWAY, "");
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "API error (502 Bad Gateway): ");
    }
}
