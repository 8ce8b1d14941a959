use crate::utils::error::{ErrorCategory, ExplorerError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

impl ExplorerError {
    pub fn status_code(&self) -> StatusCode {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => StatusCode::BAD_REQUEST,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Network => StatusCode::BAD_GATEWAY,
            ErrorCategory::System => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ExplorerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(category = ?self.category(), "request failed: {}", self);
        } else {
            tracing::warn!(category = ?self.category(), "request rejected: {}", self);
        }

        let body = json!({
            "error": self.user_friendly_message(),
            "category": format!("{:?}", self.category()),
            "suggestion": self.recovery_suggestion(),
        });
        (status, Json(body)).into_response()
    }
}
