pub mod auth;
mod error;
pub mod validation;

pub use error::{ApiError, ErrorCode};

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Routes behind the session gate
    let protected_routes = Router::new().route("/me", get(auth::me)).layer(
        middleware::from_fn_with_state(state.clone(), auth::auth_middleware),
    );

    // A single permitted development origin; the dashboard sends the
    // bearer token with credentials on.
    let origin = state
        .config
        .cors
        .allowed_origin
        .parse::<HeaderValue>()
        .expect("Invalid cors.allowed_origin");
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/api/health", get(health_check))
        .nest("/api/auth", auth_routes.merge(protected_routes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
