use axum::Json;
use axum::response::IntoResponse;
use http::StatusCode;
use parley_core::HttpError;
use thiserror::Error;

/// Result alias for STT operations
pub type Result<T> = std::result::Result<T, SttError>;

/// Errors that can occur while proxying a transcription
#[derive(Debug, Error)]
pub enum SttError {
    /// Client sent unusable audio or parameters
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Transcription service could not be reached
    #[error("connection error: {0}")]
    Connection(String),

    /// Transcription service answered with an error status
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl HttpError for SttError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Connection(_) | Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidRequest(_) => "invalid_request_error",
            Self::Connection(_) | Self::Upstream { .. } => "upstream_error",
            Self::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "an internal error occurred".to_owned(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for SttError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({
            "error": {
                "message": self.client_message(),
                "type": self.error_type(),
            }
        });

        (self.status_code(), Json(body)).into_response()
    }
}
