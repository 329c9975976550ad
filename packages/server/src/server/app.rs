//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderName, Method},
    middleware,
    routing::get,
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::middleware::{extract_actor, ACTOR_HEADER};
use crate::server::routes::{
    create_submission_handler, delete_submission_handler, get_submission_handler,
    health_handler, list_submissions_handler, update_submission_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
}

/// Build the Axum application router
pub fn build_app(db_pool: PgPool, deps: ServerDeps) -> Router {
    let app_state = AppState {
        db_pool,
        deps: Arc::new(deps),
    };

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(ACTOR_HEADER)]);

    Router::new()
        .route(
            "/submissions",
            get(list_submissions_handler).post(create_submission_handler),
        )
        .route(
            "/submissions/:id",
            get(get_submission_handler)
                .patch(update_submission_handler)
                .delete(delete_submission_handler),
        )
        .layer(middleware::from_fn(extract_actor))
        // Health check (no actor needed)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
