use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    db::CorpusStore,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::RecipeEngine,
};

pub mod chat;
pub mod providers;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecipeEngine>,
    pub corpus: Arc<dyn CorpusStore>,
}

impl AppState {
    pub fn new(engine: RecipeEngine, corpus: Arc<dyn CorpusStore>) -> Self {
        Self {
            engine: Arc::new(engine),
            corpus,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat::chat))
        .route("/providers", get(providers::list))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
