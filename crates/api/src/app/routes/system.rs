use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Extension, Query},
    http::{StatusCode, Uri},
    response::IntoResponse,
};
use chrono::{SecondsFormat, Utc};
use serde_json::{Value as JsonValue, json};

use gatewaysim_catalog::Product;
use gatewaysim_core::DomainResult;
use gatewaysim_users::User;

use crate::app::routes::ENDPOINTS;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::RequestContext;

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Echo payload for `/hello`. `received` is only present for POST.
pub fn hello_payload(
    services: &AppServices,
    query: BTreeMap<String, String>,
    received: Option<Option<JsonValue>>,
    request_id: &str,
) -> JsonValue {
    let mut payload = json!({
        "message": format!("Hello from {}!", services.service_name()),
        "timestamp": now_rfc3339(),
        "request_id": request_id,
        "query": query,
    });
    if let Some(received) = received {
        payload["received_data"] = received.unwrap_or(JsonValue::Null);
    }
    payload
}

/// Status payload for `/health`. Fails only if a collection is unreadable.
pub fn health_payload(services: &AppServices, request_id: &str) -> DomainResult<JsonValue> {
    Ok(json!({
        "status": "healthy",
        "service": services.service_name(),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": now_rfc3339(),
        "started_at": services.started_at().to_rfc3339_opts(SecondsFormat::Secs, true),
        "uptime_seconds": services.uptime_seconds(),
        "request_id": request_id,
        "collections": {
            "users": services.resource::<User>().count()?,
            "products": services.resource::<Product>().count()?,
        },
        "endpoints": ENDPOINTS,
    }))
}

pub async fn health(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
) -> axum::response::Response {
    match health_payload(&services, ctx.request_id()) {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn hello(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<BTreeMap<String, String>>,
) -> axum::response::Response {
    let body = hello_payload(&services, query, None, ctx.request_id());
    (StatusCode::OK, Json(body)).into_response()
}

pub async fn echo(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<BTreeMap<String, String>>,
    body: Bytes,
) -> axum::response::Response {
    let received = match dto::parse_bytes(&body) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let body = hello_payload(&services, query, Some(received), ctx.request_id());
    (StatusCode::OK, Json(body)).into_response()
}

pub async fn method_not_allowed() -> axum::response::Response {
    errors::json_error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

pub async fn not_found(uri: Uri) -> axum::response::Response {
    errors::json_error(
        StatusCode::NOT_FOUND,
        format!("No route for {}", uri.path()),
    )
}
