use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{ProfileRecord, TrackRecord},
    routes::AppState,
    services::recommendations::{self, RecommendationRun},
};

#[derive(Debug, Default, Deserialize)]
pub struct UserRecommendationRequest {
    #[serde(default)]
    pub top_n: Option<i64>,
    /// Write the list back to the `recommendations` table
    #[serde(default)]
    pub persist: bool,
}

/// Handler for recommending from a stored listening history
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    Json(request): Json<UserRecommendationRequest>,
) -> AppResult<Json<RecommendationRun>> {
    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        persist = request.persist,
        "Processing recommendation request"
    );

    let top_n = state.resolve_top_n(request.top_n);
    let run =
        recommendations::recommend_for_user(state.store.clone(), &user_id, top_n, request.persist)
            .await?;

    Ok(Json(run))
}

#[derive(Debug, Deserialize)]
pub struct UserExplainRequest {
    pub track: TrackRecord,
}

#[derive(Debug, Serialize)]
pub struct UserExplainResponse {
    pub user_id: String,
    pub spotify_track_id: Option<String>,
    pub explanation: String,
}

/// Handler for explaining a track against a user's stored taste
pub async fn explain(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(request): Json<UserExplainRequest>,
) -> AppResult<Json<UserExplainResponse>> {
    let explanation =
        recommendations::explain_for_user(state.store.clone(), &user_id, &request.track).await?;

    Ok(Json(UserExplainResponse {
        user_id,
        spotify_track_id: request.track.spotify_track_id,
        explanation,
    }))
}

/// Handler for fetching a stored user profile
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ProfileRecord>> {
    let profile = recommendations::profile_for_user(state.store.clone(), &user_id).await?;
    Ok(Json(profile))
}
