//! Listener data store abstraction
//!
//! The recommendation pipeline never talks to storage itself. Callers inject a
//! [`TrackStore`] (the Supabase REST implementation in production, an in-memory
//! one in tests) and hand the fetched rows to the pure scoring functions.

use crate::{
    error::AppResult,
    models::{ProfileRecord, Recommendation, StoredRecommendation, TrackRecord},
};

pub mod supabase;

pub use supabase::SupabaseStore;

/// Trait for listener data stores
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TrackStore: Send + Sync {
    /// Fetch every track row recorded for a user
    async fn fetch_user_tracks(&self, user_id: &str) -> AppResult<Vec<TrackRecord>>;

    /// Persist a recommendation list for a user
    ///
    /// All rows share one creation timestamp. Returns the rows as stored.
    async fn save_recommendations(
        &self,
        user_id: &str,
        recommendations: &[Recommendation],
    ) -> AppResult<Vec<StoredRecommendation>>;

    /// Fetch the profile row for a user, if one exists
    async fn fetch_user_profile(&self, user_id: &str) -> AppResult<Option<ProfileRecord>>;

    /// Store name for logging and debugging
    fn name(&self) -> &'static str;
}
