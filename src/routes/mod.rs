use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{recommender::DEFAULT_TOP_N, store::TrackStore},
};

pub mod recommendations;
pub mod users;

/// Shared state handed to every handler
pub struct AppState {
    pub store: Arc<dyn TrackStore>,
    pub default_top_n: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn TrackStore>) -> Self {
        Self {
            store,
            default_top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_default_top_n(mut self, default_top_n: usize) -> Self {
        self.default_top_n = default_top_n;
        self
    }

    /// Resolves a requested count: absent uses the default, negative means none
    pub fn resolve_top_n(&self, requested: Option<i64>) -> usize {
        match requested {
            None => self.default_top_n,
            Some(n) => usize::try_from(n).unwrap_or(0),
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recommendations", post(recommendations::score))
        .route("/recommendations/explain", post(recommendations::explain))
        .route("/users/:user_id/recommendations", post(users::recommend))
        .route("/users/:user_id/explain", post(users::explain))
        .route("/users/:user_id/profile", get(users::profile))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
