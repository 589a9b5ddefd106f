use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Everything that can fail while relaying a chat request.
///
/// Unparsable lines inside an otherwise healthy stream are not an error;
/// they are skipped where they are read.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("ollama returned status {status}: {body}")]
    Downstream { status: u16, body: String },

    #[error("failed to reach ollama: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("ollama did not answer within the configured timeout")]
    Timeout,

    #[error("messages must not be empty")]
    EmptyMessages,
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::Timeout
        } else {
            RelayError::Connection(err)
        }
    }
}

impl RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            // Proxy the downstream status to the caller unchanged.
            RelayError::Downstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RelayError::Connection(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            RelayError::EmptyMessages => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        error!("request failed: {}", self);
        let status = self.status_code();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
