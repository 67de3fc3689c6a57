use serde::Deserialize;
use thiserror::Error;

/// Shown when the service fails without a readable `detail`.
pub const GENERIC_FAILURE: &str = "Analysis failed. Please check the files and try again.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("could not reach the analysis service: {0}")]
    Transport(String),
    #[error("analysis service returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Text surfaced to the user in the blocking notice.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Transport(_) | ApiError::Decode(_) => GENERIC_FAILURE.to_string(),
            ApiError::Cancelled => "Request cancelled.".to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Pull the human-readable message out of an error response body.
///
/// `detail` is used verbatim when it is a string. Anything else (missing body,
/// invalid JSON, structured validation detail) falls back to the generic text.
pub fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.detail)
        .and_then(|detail| match detail {
            serde_json::Value::String(text) if !text.trim().is_empty() => Some(text),
            _ => None,
        })
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}
