//! CRUD routes shared by every resource type.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Extension, Path, Query},
    routing::get,
};

use gatewaysim_core::{Method, Resource, ResourceId, ResourceRequest};

use crate::app::dto;
use crate::app::routes::system;
use crate::app::services::{AppServices, HandlerFor};

pub fn router<R: Resource>() -> Router
where
    AppServices: HandlerFor<R>,
{
    Router::new()
        .route(
            "/",
            get(list::<R>)
                .post(create::<R>)
                .put(update_without_id::<R>)
                .delete(remove_without_id::<R>)
                .fallback(system::method_not_allowed),
        )
        .route(
            "/:id",
            get(fetch::<R>)
                .put(update::<R>)
                .delete(remove::<R>)
                .fallback(system::method_not_allowed),
        )
}

fn dispatch<R: Resource>(
    services: &AppServices,
    request: ResourceRequest,
) -> axum::response::Response
where
    AppServices: HandlerFor<R>,
{
    dto::reply_to_response(services.resource::<R>().handle(request))
}

pub async fn list<R: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<BTreeMap<String, String>>,
) -> axum::response::Response
where
    AppServices: HandlerFor<R>,
{
    dispatch::<R>(
        &services,
        ResourceRequest::new(Method::Get, None).with_query(query),
    )
}

pub async fn create<R: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    body: Bytes,
) -> axum::response::Response
where
    AppServices: HandlerFor<R>,
{
    let body = match dto::parse_bytes(&body) {
        Ok(v) => v,
        Err(e) => return crate::app::errors::domain_error_to_response(e),
    };
    dispatch::<R>(
        &services,
        ResourceRequest::new(Method::Post, None).with_body(body),
    )
}

pub async fn fetch<R: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response
where
    AppServices: HandlerFor<R>,
{
    dispatch::<R>(
        &services,
        ResourceRequest::new(Method::Get, Some(ResourceId::new(id))),
    )
}

pub async fn update<R: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Bytes,
) -> axum::response::Response
where
    AppServices: HandlerFor<R>,
{
    let body = match dto::parse_bytes(&body) {
        Ok(v) => v,
        Err(e) => return crate::app::errors::domain_error_to_response(e),
    };
    dispatch::<R>(
        &services,
        ResourceRequest::new(Method::Put, Some(ResourceId::new(id))).with_body(body),
    )
}

pub async fn remove<R: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response
where
    AppServices: HandlerFor<R>,
{
    dispatch::<R>(
        &services,
        ResourceRequest::new(Method::Delete, Some(ResourceId::new(id))),
    )
}

/// `PUT` on the collection itself: no id, so the handler answers NotFound.
pub async fn update_without_id<R: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response
where
    AppServices: HandlerFor<R>,
{
    dispatch::<R>(&services, ResourceRequest::new(Method::Put, None))
}

pub async fn remove_without_id<R: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response
where
    AppServices: HandlerFor<R>,
{
    dispatch::<R>(&services, ResourceRequest::new(Method::Delete, None))
}
