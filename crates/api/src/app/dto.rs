use axum::{
    Json,
    body::Bytes,
    http::StatusCode,
    response::IntoResponse,
};

use gatewaysim_core::{DomainError, DomainResult, Reply, ReplyStatus};

use crate::app::errors;

// -------------------------
// Request mapping
// -------------------------

/// Parse a raw request body. An empty (or all-whitespace) body is `None`.
pub fn parse_json_body(raw: &[u8]) -> DomainResult<Option<serde_json::Value>> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(raw)
        .map(Some)
        .map_err(|e| DomainError::bad_request(format!("Malformed JSON body: {e}")))
}

pub fn parse_bytes(body: &Bytes) -> DomainResult<Option<serde_json::Value>> {
    parse_json_body(body.as_ref())
}

// -------------------------
// Response mapping
// -------------------------

pub fn status_code(status: ReplyStatus) -> StatusCode {
    match status {
        ReplyStatus::Ok => StatusCode::OK,
        ReplyStatus::Created => StatusCode::CREATED,
    }
}

pub fn reply_to_response(result: DomainResult<Reply>) -> axum::response::Response {
    match result {
        Ok(reply) => (status_code(reply.status), Json(reply.body)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
