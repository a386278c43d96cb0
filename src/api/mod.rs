use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    clients::{AuthClient, CatalogClient},
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    model::CfModel,
    models::OrganizationId,
    store::ScoreStore,
};

pub mod handlers;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: ScoreStore,
    pub catalog: Arc<dyn CatalogClient>,
    pub auth: Arc<dyn AuthClient>,
    /// Item model kept loaded for the similar-datasets lookup; `None` when
    /// the dump was unavailable at startup
    pub item_model: Option<Arc<CfModel>>,
    /// Ranking served when the requested organization has none stored
    pub fallback_org_id: OrganizationId,
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/recommender/", post(handlers::recommend))
        .route(
            "/recommender/similar/:dataset_id",
            get(handlers::similar_datasets),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
