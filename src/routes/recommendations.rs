use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    middleware::RequestId,
    models::{AudioFeatures, Recommendation, TrackRecord},
    routes::AppState,
    services::recommendations,
};

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub tracks: Vec<TrackRecord>,
    #[serde(default)]
    pub top_n: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub recommendations: Vec<Recommendation>,
    pub diversity_score: f64,
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub profile: AudioFeatures,
    pub track: TrackRecord,
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub explanation: String,
}

/// Handler for scoring a caller-supplied listening history
pub async fn score(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<ScoreRequest>,
) -> Json<ScoreResponse> {
    let top_n = state.resolve_top_n(request.top_n);
    let (recommendations, diversity_score) =
        recommendations::score_tracks(&request.tracks, top_n);

    tracing::info!(
        request_id = %request_id,
        tracks = request.tracks.len(),
        returned = recommendations.len(),
        "Scored submitted tracks"
    );

    Json(ScoreResponse {
        recommendations,
        diversity_score,
    })
}

/// Handler for explaining a single recommendation
pub async fn explain(Json(request): Json<ExplainRequest>) -> Json<ExplainResponse> {
    Json(ExplainResponse {
        explanation: recommendations::explain(&request.profile, &request.track),
    })
}
