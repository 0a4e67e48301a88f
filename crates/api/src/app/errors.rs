use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use gatewaysim_core::DomainError;

pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::BadRequest(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The one error envelope: `{"error": <reason phrase>, "message": <detail>}`.
pub fn error_body(status: StatusCode, message: impl Into<String>) -> serde_json::Value {
    json!({
        "error": status.canonical_reason().unwrap_or("Error"),
        "message": message.into(),
    })
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, axum::Json(error_body(status, message))).into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let status = status_for(&err);
    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    }
    json_error(status, err.message())
}
