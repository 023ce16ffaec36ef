use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Internal failure surfaced by a handler. The underlying fault is logged
/// here; the client only ever sees the generic per-endpoint message.
#[derive(Debug)]
pub struct ApiError {
    message: &'static str,
}

impl ApiError {
    pub fn internal(message: &'static str, err: impl std::fmt::Display) -> Self {
        tracing::error!("{message}: {err}");
        Self { message }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.message });
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}
