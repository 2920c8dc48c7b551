use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{AudioFeatures, ProfileRecord, Recommendation, TrackRecord},
    services::{recommender, store::TrackStore},
};

/// Result of scoring one listener's history
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationRun {
    pub user_id: String,
    pub recommendations: Vec<Recommendation>,
    pub diversity_score: f64,
    /// Rows written to the store; zero when persistence was not requested
    pub saved: usize,
}

/// Generates recommendations for a stored listener
///
/// Fetches the user's tracks, ranks them against the user's own profile and,
/// when `persist` is set, writes the resulting list back to the store.
pub async fn recommend_for_user(
    store: Arc<dyn TrackStore>,
    user_id: &str,
    top_n: usize,
    persist: bool,
) -> AppResult<RecommendationRun> {
    let user_id = validate_user_id(user_id)?;

    let tracks = store.fetch_user_tracks(user_id).await?;
    let recommendations = recommender::generate_recommendations(&tracks, top_n);
    let diversity_score = recommender::calculate_diversity_score(&recommendations);

    let saved = if persist && !recommendations.is_empty() {
        store
            .save_recommendations(user_id, &recommendations)
            .await?
            .len()
    } else {
        0
    };

    tracing::info!(
        user_id = %user_id,
        tracks = tracks.len(),
        recommendations = recommendations.len(),
        saved,
        store = store.name(),
        "Recommendations generated"
    );

    Ok(RecommendationRun {
        user_id: user_id.to_string(),
        recommendations,
        diversity_score,
        saved,
    })
}

/// Explains a track against the profile built from the user's stored history
///
/// A history without complete tracks yields the zero profile.
pub async fn explain_for_user(
    store: Arc<dyn TrackStore>,
    user_id: &str,
    track: &TrackRecord,
) -> AppResult<String> {
    let user_id = validate_user_id(user_id)?;

    let tracks = store.fetch_user_tracks(user_id).await?;
    let profile = recommender::compute_profile(&tracks).unwrap_or_default();

    Ok(recommender::explain_recommendation(&profile, track))
}

/// Looks up the stored profile row for a user
pub async fn profile_for_user(
    store: Arc<dyn TrackStore>,
    user_id: &str,
) -> AppResult<ProfileRecord> {
    let user_id = validate_user_id(user_id)?;

    store
        .fetch_user_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No profile for user {}", user_id)))
}

/// Scores caller-supplied tracks without touching the store
pub fn score_tracks(tracks: &[TrackRecord], top_n: usize) -> (Vec<Recommendation>, f64) {
    let recommendations = recommender::generate_recommendations(tracks, top_n);
    let diversity = recommender::calculate_diversity_score(&recommendations);
    (recommendations, diversity)
}

/// Explains a track against a caller-supplied profile
pub fn explain(profile: &AudioFeatures, track: &TrackRecord) -> String {
    recommender::explain_recommendation(profile, track)
}

fn validate_user_id(user_id: &str) -> AppResult<&str> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("User id cannot be empty".to_string()));
    }
    Ok(trimmed)
}
