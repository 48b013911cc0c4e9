use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Router};
use once_cell::sync::Lazy;

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Build the employee directory router.
///
/// The service is injected per-route via `Extension`, so the router can
/// be nested into a larger application without shared state plumbing.
pub fn router(service: Arc<Service>, environment: impl Into<String>) -> Router {
    // Pin the uptime baseline to router construction time.
    Lazy::force(&handlers::STARTED);

    let env = handlers::RuntimeEnv(Arc::new(environment.into()));

    Router::new()
        .route(
            "/employees",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route(
            "/employees/{id}",
            get(handlers::get_employee)
                .put(handlers::update_employee)
                .delete(handlers::delete_employee),
        )
        .route("/health", get(handlers::health))
        .layer(Extension(service))
        .layer(Extension(env))
}
