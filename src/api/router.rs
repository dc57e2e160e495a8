//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//!
//! Layers (outermost → innermost):
//! 1. CORS → 2. Request logging → Handler

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::db::SpecialistStore;

/// Build the API router over the given store.
pub fn api_router(store: Arc<dyn SpecialistStore>) -> Router {
    build_router(ApiContext::new(store))
}

pub fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    // Static segments win over params, so `/inactivos` never reaches `:id`.
    let specialists = Router::new()
        .route(
            "/especialistas",
            get(endpoints::specialists::list).post(endpoints::specialists::create),
        )
        .route(
            "/especialistas/inactivos",
            get(endpoints::specialists::inactive),
        )
        .route(
            "/especialistas/:id",
            get(endpoints::specialists::detail)
                .put(endpoints::specialists::update)
                .delete(endpoints::specialists::soft_delete),
        )
        .route(
            "/especialistas/:id/restore",
            post(endpoints::specialists::restore),
        )
        .route(
            "/especialistas/:id/force",
            delete(endpoints::specialists::force_delete),
        )
        .with_state(ctx);

    Router::new()
        .route("/", get(endpoints::health::hello))
        .route("/health", get(endpoints::health::check))
        .merge(specialists)
        .layer(axum::middleware::from_fn(middleware::access::log_request))
        .layer(CorsLayer::permissive())
}
