use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::{auth_middleware, request_id_middleware, request_span},
    services::{PopularityTracker, RemoteDataClient, SavedMoviesRegistry},
};

pub mod movies;
pub mod saved;
pub mod trending;

/// Shared state handed to every gateway handler
pub struct AppState {
    pub remote: Arc<RemoteDataClient>,
    pub tracker: Arc<PopularityTracker>,
    pub registry: Arc<SavedMoviesRegistry>,
    pub trending_limit: usize,
}

/// Creates the gateway router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(state.clone()))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(request_span)),
        )
}

/// API routes under /api/v1
fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies/search", get(movies::search))
        .route("/trending", get(trending::trending))
        .merge(saved_routes(state))
}

/// Bookmarks of the authenticated caller
fn saved_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/me/saved", get(saved::list_saved).post(saved::save_movie))
        .route("/me/movies/:movie_id/saved", get(saved::saved_status))
        .route("/me/saved/:document_id", delete(saved::unsave_movie))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
