use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A scored track returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub spotify_track_id: String,
    pub name: String,
    pub artist: String,
    /// Cosine similarity between the listener profile and this track
    pub score: f64,
}

/// Row shape of the `recommendations` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecommendation {
    pub user_id: String,
    pub spotify_track_id: String,
    pub score: f64,
    pub created_at: DateTime<Utc>,
}

impl StoredRecommendation {
    /// Tags every recommendation with the same user and timestamp
    pub fn batch(
        user_id: &str,
        recommendations: &[Recommendation],
        created_at: DateTime<Utc>,
    ) -> Vec<Self> {
        recommendations
            .iter()
            .map(|rec| Self {
                user_id: user_id.to_string(),
                spotify_track_id: rec.spotify_track_id.clone(),
                score: rec.score,
                created_at,
            })
            .collect()
    }
}

/// A row from the `profiles` table, passed through untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub user_id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}
