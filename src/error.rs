use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Recoverable, user-visible failures of the capture/ledger core.
/// Nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("analysis service failure: {0}")]
    ServiceFailure(String),

    #[error("malformed response")]
    MalformedResponse,

    #[error("unsupported action: {0}")]
    UnsupportedAction(&'static str),

    #[error("invalid transition: {0}")]
    InvalidTransition(&'static str),
}

impl CaptureError {
    pub fn status(&self) -> StatusCode {
        match self {
            CaptureError::ServiceFailure(_) | CaptureError::MalformedResponse => {
                StatusCode::BAD_GATEWAY
            }
            CaptureError::UnsupportedAction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CaptureError::InvalidTransition(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for CaptureError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
