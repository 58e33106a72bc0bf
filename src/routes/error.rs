// JSON error responses: {"error": "..."}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Store or source unreachable; the request cannot be served.
    pub fn unavailable(err: anyhow::Error) -> Self {
        tracing::warn!(error = %err, "data source unavailable");
        Self::new(StatusCode::SERVICE_UNAVAILABLE, format!("{:#}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}
