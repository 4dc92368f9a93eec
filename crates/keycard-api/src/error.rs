//! Keycard API error types

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by [`crate::KeycardClient`]
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("response body missing")]
    MissingBody,

    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to get access token: {0}")]
    Token(#[from] TokenError),
}

impl ApiError {
    /// HTTP status of an API error response
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the API reported the object as gone
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// Errors from acquiring an access token
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("token endpoint returned {status}: {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("invalid token response: {0}")]
    Decode(String),
}

impl TokenError {
    /// Transport failures, rate limiting and server errors are worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            TokenError::Request(e) => !e.is_builder(),
            TokenError::Rejected { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            TokenError::Decode(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let err = ApiError::Status {
            status: StatusCode::NOT_FOUND,
            body: "{}".to_string(),
        };
        assert!(err.is_not_found());

        let err = ApiError::Status {
            status: StatusCode::CONFLICT,
            body: "exists".to_string(),
        };
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("409"));
        assert!(err.to_string().contains("exists"));

        assert!(!ApiError::MissingBody.is_not_found());
    }

    #[test]
    fn test_token_retry_classification() {
        let rejected = |status| TokenError::Rejected {
            status,
            body: String::new(),
        };
        assert!(rejected(StatusCode::TOO_MANY_REQUESTS).is_retryable());
        assert!(rejected(StatusCode::BAD_GATEWAY).is_retryable());
        assert!(!rejected(StatusCode::UNAUTHORIZED).is_retryable());
        assert!(!TokenError::Decode("no access_token".to_string()).is_retryable());
    }
}
