use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid transcript provided.")]
    InvalidUtterance,
    #[error("Fact-checking service error (config).")]
    MissingApiKey,
    #[error("Fact-checking failed: {0}")]
    Upstream(String),
    #[error("Fact-checking failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidUtterance => StatusCode::BAD_REQUEST,
            RelayError::MissingApiKey | RelayError::Upstream(_) | RelayError::Request(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
