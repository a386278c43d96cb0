use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{DatasetId, RecommendRequest, RecommendResponse},
    services::recommender,
};

use super::AppState;

/// Handler for the recommender endpoint.
///
/// The session is checked before anything else; an unauthorized caller
/// never reaches the filter chain. Only after that is the body inspected.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Option<Json<RecommendRequest>>,
) -> AppResult<Json<RecommendResponse>> {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if cookie.is_empty() {
        return Err(AppError::Unauthorized);
    }

    let valid = state.auth.validate(cookie).await.unwrap_or(false);
    if !valid {
        return Err(AppError::Unauthorized);
    }

    let Json(request) = body.ok_or_else(|| {
        AppError::InvalidInput("Request body is empty or does not contain org_id.".to_string())
    })?;

    tracing::info!(
        request_id = %request_id,
        org_id = %request.org_id,
        "Processing recommendation request"
    );

    let recommended_datasets = recommender::generate_recommendations(
        &state.store,
        state.catalog.as_ref(),
        &state.fallback_org_id,
        &request.org_id,
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        recommended = recommended_datasets.len(),
        "Recommendations successfully generated"
    );

    Ok(Json(RecommendResponse {
        recommended_datasets,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    pub k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SimilarResponse {
    pub neighbors: Vec<DatasetId>,
}

/// Handler for the auxiliary dataset-similarity lookup
pub async fn similar_datasets(
    State(state): State<AppState>,
    Path(dataset_id): Path<String>,
    Query(params): Query<SimilarQuery>,
) -> AppResult<Json<SimilarResponse>> {
    let model = state.item_model.as_ref().ok_or_else(|| {
        AppError::NotFound("Item model is not available".to_string())
    })?;

    let dataset_id = DatasetId::from(dataset_id.as_str());
    let k = params.k.unwrap_or(10);

    let neighbors = model.neighbors(&dataset_id, k).ok_or_else(|| {
        AppError::NotFound(format!("Dataset {} is unknown to the model", dataset_id))
    })?;

    tracing::debug!(dataset_id = %dataset_id, k, neighbors = neighbors.len(), "Neighbor lookup");

    Ok(Json(SimilarResponse { neighbors }))
}
