use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::error::EnarvaError;

impl IntoResponse for EnarvaError {
    fn into_response(self) -> Response {
        let status = match &self {
            EnarvaError::Unauthorized => StatusCode::UNAUTHORIZED,
            EnarvaError::Forbidden(_) => StatusCode::FORBIDDEN,
            EnarvaError::NotFound { .. } => StatusCode::NOT_FOUND,
            EnarvaError::InvalidState { .. } => StatusCode::CONFLICT,
            EnarvaError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Internal failure detail stays in the logs, not the response.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message,
            }
        }));
        (status, body).into_response()
    }
}
