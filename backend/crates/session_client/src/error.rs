//! Client Error Types

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Codes the server uses when a session is absent or no longer valid
const SESSION_CODES: &[&str] = &["NOT_AUTHENTICATED", "INVALID_TOKEN", "USER_GONE"];

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The stored session is missing or no longer accepted
    #[error("Not logged in or session expired")]
    Unauthorized,

    /// The server rejected the request; `message` is safe to show on a form
    #[error("{message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The server could not be reached
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

/// Error body rendered by the server
#[derive(Debug, Deserialize)]
struct Problem {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl ClientError {
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Map a non-success response to an error
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let Ok(problem) = serde_json::from_str::<Problem>(body) else {
            return ClientError::InvalidResponse(format!(
                "Status {}: {}",
                status,
                Self::truncate_body(body)
            ));
        };

        let code = problem.code.unwrap_or_else(|| "UNKNOWN".to_string());
        if status == StatusCode::UNAUTHORIZED && SESSION_CODES.contains(&code.as_str()) {
            return ClientError::Unauthorized;
        }

        ClientError::Api {
            status: status.as_u16(),
            code,
            message: problem
                .detail
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string()),
        }
    }

    /// Whether the failure was a connectivity problem rather than a refusal
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }
}
