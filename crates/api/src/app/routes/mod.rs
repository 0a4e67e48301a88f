use axum::{
    Router,
    routing::{get, post},
};

use gatewaysim_catalog::Product;
use gatewaysim_users::User;

pub mod functions;
pub mod resources;
pub mod system;

/// Every route the simulator exposes, as listed by `/health`.
pub const ENDPOINTS: &[&str] = &[
    "GET /hello",
    "POST /hello",
    "GET /health",
    "GET /users",
    "POST /users",
    "GET /users/{id}",
    "PUT /users/{id}",
    "DELETE /users/{id}",
    "GET /products",
    "POST /products",
    "GET /products/{id}",
    "PUT /products/{id}",
    "DELETE /products/{id}",
    "POST /2015-03-31/functions/{function}/invocations",
];

/// Router for all endpoints.
pub fn router() -> Router {
    Router::new()
        .route(
            "/hello",
            get(system::hello)
                .post(system::echo)
                .fallback(system::method_not_allowed),
        )
        .route(
            "/health",
            get(system::health).fallback(system::method_not_allowed),
        )
        .nest("/users", resources::router::<User>())
        .nest("/products", resources::router::<Product>())
        .route(
            "/2015-03-31/functions/:function/invocations",
            post(functions::invoke).fallback(system::method_not_allowed),
        )
        .fallback(system::not_found)
}
