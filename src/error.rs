use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Failure of a single upstream feed request, or of a whole retry sequence.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("invalid JSON payload: {0}")]
    Decode(String),
    #[error("failed to fetch {url} after {attempts} attempts: {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Innermost error of a retry sequence.
    pub fn last_attempt(&self) -> &FetchError {
        match self {
            FetchError::Exhausted { last, .. } => last.last_attempt(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_message_names_url_and_attempts() {
        let err = FetchError::Exhausted {
            url: "https://example.test/feed.json".to_string(),
            attempts: 3,
            last: Box::new(FetchError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "down".to_string(),
            }),
        };
        let message = err.to_string();
        assert!(message.contains("https://example.test/feed.json"));
        assert!(message.contains("3 attempts"));
        assert!(message.contains("503"));
        assert!(matches!(
            err.last_attempt(),
            FetchError::Status { status, .. } if *status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        ));
    }

    #[test]
    fn app_error_uses_requested_status() {
        let response = AppError::bad_request("Invalid range parameter").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
