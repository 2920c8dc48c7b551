//! Audio-feature recommendation pipeline.
//!
//! A listener's history is scored against itself in four stages:
//! 1. extract complete feature vectors ([`extract_features`])
//! 2. z-score the tempo column ([`normalize_features`])
//! 3. average the rows into a profile vector ([`build_profile`])
//! 4. rank every track by cosine similarity to the profile ([`rank_tracks`])
//!
//! Every stage is a pure function. Degenerate input degrades to an empty
//! result instead of an error.

use crate::models::{AudioFeatures, Recommendation, TrackRecord};
use crate::services::features::{extract_features, normalize_features, ValidTrack};
use crate::services::similarity::cosine_similarity;

/// Number of recommendations returned when the caller does not specify one
pub const DEFAULT_TOP_N: usize = 10;

/// Diversity reported for any set of two or more recommendations
pub const PLACEHOLDER_DIVERSITY: f64 = 0.5;

const EXPLANATION: &str = "This track matches your taste based on its audio characteristics";

/// Ranks a listener's tracks by similarity to their own average taste
///
/// Returns at most `top_n` recommendations with non-increasing scores. Tracks
/// with equal scores keep their input order.
pub fn generate_recommendations(user_tracks: &[TrackRecord], top_n: usize) -> Vec<Recommendation> {
    let validated = extract_features(user_tracks);
    if validated.is_empty() {
        tracing::debug!(input = user_tracks.len(), "No tracks with complete audio features");
        return Vec::new();
    }

    let normalized = normalize_features(&validated.features);
    let Some(profile) = build_profile(&normalized) else {
        return Vec::new();
    };

    let recommendations = rank_tracks(&profile, &normalized, &validated.tracks, top_n);

    tracing::debug!(
        valid = validated.len(),
        returned = recommendations.len(),
        top_n,
        "Generated recommendations"
    );

    recommendations
}

/// Profile vector for a listener history, `None` if no track is complete
pub fn compute_profile(user_tracks: &[TrackRecord]) -> Option<AudioFeatures> {
    let validated = extract_features(user_tracks);
    build_profile(&normalize_features(&validated.features))
}

/// Column-wise mean of the normalized feature rows
pub fn build_profile(normalized: &[AudioFeatures]) -> Option<AudioFeatures> {
    AudioFeatures::mean(normalized)
}

/// Scores each row against the profile and keeps the best `top_n`
///
/// `features[i]` must describe `tracks[i]`.
pub fn rank_tracks(
    profile: &AudioFeatures,
    features: &[AudioFeatures],
    tracks: &[ValidTrack<'_>],
    top_n: usize,
) -> Vec<Recommendation> {
    debug_assert_eq!(features.len(), tracks.len());

    let mut recommendations: Vec<Recommendation> = features
        .iter()
        .zip(tracks)
        .map(|(row, track)| Recommendation {
            spotify_track_id: track.spotify_track_id.to_string(),
            name: track.record.name.clone().unwrap_or_default(),
            artist: track.record.artist.clone().unwrap_or_default(),
            score: cosine_similarity(profile, row),
        })
        .collect();

    // stable: ties keep input order
    recommendations.sort_by(|a, b| b.score.total_cmp(&a.score));
    recommendations.truncate(top_n);
    recommendations
}

/// Spread of audio characteristics across a recommendation set, in `[0, 1]`
///
/// Placeholder metric: `0.0` below two entries, [`PLACEHOLDER_DIVERSITY`] otherwise.
pub fn calculate_diversity_score(recommendations: &[Recommendation]) -> f64 {
    if recommendations.len() < 2 {
        return 0.0;
    }

    PLACEHOLDER_DIVERSITY
}

/// Human-readable reason a track was recommended
///
/// Currently a fixed sentence; both inputs are accepted for future use.
pub fn explain_recommendation(_user_profile: &AudioFeatures, _track: &TrackRecord) -> String {
    EXPLANATION.to_string()
}
