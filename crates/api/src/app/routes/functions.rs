//! Lambda proxy-integration simulator.
//!
//! `POST /2015-03-31/functions/{function}/invocations` takes an API-Gateway
//! proxy event and answers with a proxy response, the same contract a local
//! serverless runtime exposes. The functions reuse the HTTP handlers'
//! payloads, so both transports agree on status codes and bodies.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};

use gatewaysim_catalog::Product;
use gatewaysim_core::{DomainResult, Method, Reply, Resource, ResourceId, ResourceRequest};
use gatewaysim_users::User;

use crate::app::routes::system;
use crate::app::services::{AppServices, HandlerFor};
use crate::app::{dto, errors};
use crate::context::RequestContext;

const CORS_ALLOW_ORIGIN: &str = "*";
const CORS_ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// API-Gateway proxy event (the subset the functions read).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProxyEvent {
    pub http_method: Option<String>,
    pub path: Option<String>,
    pub path_parameters: Option<HashMap<String, String>>,
    pub query_string_parameters: Option<BTreeMap<String, String>>,
    pub headers: Option<HashMap<String, String>>,
    /// JSON document serialized as a string, as the gateway delivers it.
    pub body: Option<String>,
}

impl ProxyEvent {
    fn method(&self) -> &str {
        self.http_method.as_deref().unwrap_or("GET")
    }

    /// `pathParameters.id`, else the segment after the resource in `path`
    /// (`/users/1`).
    fn path_id(&self) -> Option<ResourceId> {
        let id = match &self.path_parameters {
            Some(params) => params.get("id")?.as_str(),
            None => {
                let path = self.path.as_deref()?;
                let mut segments = path.split('/').filter(|s| !s.is_empty());
                segments.next()?;
                let id = segments.next()?;
                if segments.next().is_some() {
                    return None;
                }
                id
            }
        };
        (!id.is_empty()).then(|| ResourceId::new(id))
    }

    /// Header value by case-insensitive name.
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .as_ref()?
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn query(&self) -> BTreeMap<String, String> {
        self.query_string_parameters.clone().unwrap_or_default()
    }

    fn json_body(&self) -> DomainResult<Option<JsonValue>> {
        match &self.body {
            Some(raw) => dto::parse_json_body(raw.as_bytes()),
            None => Ok(None),
        }
    }
}

/// API-Gateway proxy response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// The simulated functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Function {
    Hello,
    Health,
    Users,
    Products,
}

impl Function {
    fn lookup(name: &str) -> Option<Self> {
        match name {
            "hello" => Some(Self::Hello),
            "health" => Some(Self::Health),
            "users" => Some(Self::Users),
            "products" => Some(Self::Products),
            _ => None,
        }
    }

    fn allowed_methods(&self) -> &'static str {
        match self {
            Self::Hello => "GET, POST, OPTIONS",
            Self::Health => "GET, OPTIONS",
            Self::Users | Self::Products => "GET, POST, PUT, DELETE, OPTIONS",
        }
    }
}

pub async fn invoke(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(function): Path<String>,
    payload: Bytes,
) -> axum::response::Response {
    let Some(func) = Function::lookup(&function) else {
        return errors::json_error(
            StatusCode::NOT_FOUND,
            format!("Function {function} not found"),
        );
    };

    let event: ProxyEvent = match dto::parse_bytes(&payload) {
        Ok(None) => ProxyEvent::default(),
        Ok(Some(raw)) => match serde_json::from_value(raw) {
            Ok(event) => event,
            Err(e) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    format!("Malformed proxy event: {e}"),
                );
            }
        },
        Err(e) => return errors::domain_error_to_response(e),
    };

    tracing::debug!(function = %function, method = event.method(), "invoking function");
    let response = run(&services, func, &event, ctx.request_id());
    (StatusCode::OK, Json(response)).into_response()
}

fn run(
    services: &AppServices,
    func: Function,
    event: &ProxyEvent,
    request_id: &str,
) -> ProxyResponse {
    let Ok(method) = event.method().parse::<Method>() else {
        return method_not_allowed(func, request_id);
    };

    let result = match func {
        Function::Hello => match method {
            Method::Get | Method::Post => hello(services, method, event, request_id),
            _ => return method_not_allowed(func, request_id),
        },
        Function::Health => match method {
            Method::Get => system::health_payload(services, request_id).map(Reply::ok),
            _ => return method_not_allowed(func, request_id),
        },
        Function::Users => resource::<User>(services, method, event),
        Function::Products => resource::<Product>(services, method, event),
    };

    match result {
        Ok(reply) => {
            let mut body = reply.body;
            if let JsonValue::Object(map) = &mut body {
                map.insert("request_id".into(), request_id.into());
                map.insert("method".into(), method.as_str().into());
            }
            proxy_response(func, dto::status_code(reply.status), body)
        }
        Err(e) => proxy_error(func, errors::status_for(&e), e.message(), request_id),
    }
}

fn hello(
    services: &AppServices,
    method: Method,
    event: &ProxyEvent,
    request_id: &str,
) -> DomainResult<Reply> {
    let received = match method {
        Method::Post => Some(event.json_body()?),
        _ => None,
    };
    let mut payload = system::hello_payload(services, event.query(), received, request_id);
    if method == Method::Get {
        payload["headers"] = json!({
            "user-agent": event.header("user-agent"),
            "host": event.header("host"),
        });
    }
    Ok(Reply::ok(payload))
}

fn resource<R: Resource>(
    services: &AppServices,
    method: Method,
    event: &ProxyEvent,
) -> DomainResult<Reply>
where
    AppServices: HandlerFor<R>,
{
    let request = ResourceRequest::new(method, event.path_id())
        .with_query(event.query())
        .with_body(event.json_body()?);
    services.resource::<R>().handle(request)
}

fn method_not_allowed(func: Function, request_id: &str) -> ProxyResponse {
    proxy_error(
        func,
        StatusCode::METHOD_NOT_ALLOWED,
        "Method not allowed",
        request_id,
    )
}

fn proxy_error(
    func: Function,
    status: StatusCode,
    message: &str,
    request_id: &str,
) -> ProxyResponse {
    let mut body = errors::error_body(status, message);
    body["request_id"] = request_id.into();
    proxy_response(func, status, body)
}

fn proxy_response(func: Function, status: StatusCode, body: JsonValue) -> ProxyResponse {
    let mut headers = BTreeMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        (
            "Access-Control-Allow-Origin".to_string(),
            CORS_ALLOW_ORIGIN.to_string(),
        ),
        (
            "Access-Control-Allow-Methods".to_string(),
            func.allowed_methods().to_string(),
        ),
        (
            "Access-Control-Allow-Headers".to_string(),
            CORS_ALLOW_HEADERS.to_string(),
        ),
    ]);
    if func == Function::Health {
        headers.insert("Cache-Control".to_string(), "no-cache".to_string());
    }

    ProxyResponse {
        status_code: status.as_u16(),
        headers,
        body: body.to_string(),
    }
}
