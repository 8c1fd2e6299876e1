use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use crate::errors::AppError;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateKey(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code. Errors without a specific code fall back to `HTTP_<status>`.
    pub fn error_code(&self) -> String {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR".to_string(),
            AppError::Store(_) | AppError::Internal(_) => "INTERNAL_ERROR".to_string(),
            _ => format!("HTTP_{}", self.status_code().as_u16()),
        }
    }

    /// Client-safe message. Internal failures never expose their text.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::Auth(msg)
            | AppError::NotFound(msg)
            | AppError::DuplicateKey(msg) => msg.clone(),
            AppError::Store(_) | AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

pub fn error_body(code: &str, message: &str) -> serde_json::Value {
    json!({
        "error": {
            "code": code,
            "message": message,
        }
    })
}

// Converts AppError into the uniform JSON error envelope. Runs inside the
// request's trace span, so the log line carries method and path.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = Json(error_body(&self.error_code(), &self.client_message()));

        match self {
            AppError::Auth(_) => (
                status,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                body,
            ).into_response(),
            _ => (status, body).into_response(),
        }
    }
}
