//! Supabase REST (PostgREST) store
//!
//! Tables used:
//! - `user_tracks`: listening history, filtered by `user_id`
//! - `recommendations`: one row per persisted recommendation
//! - `profiles`: one row per user

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{ProfileRecord, Recommendation, StoredRecommendation, TrackRecord},
    services::store::TrackStore,
};
use chrono::Utc;
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};

const USER_TRACKS_TABLE: &str = "user_tracks";
const RECOMMENDATIONS_TABLE: &str = "recommendations";
const PROFILES_TABLE: &str = "profiles";

#[derive(Clone)]
pub struct SupabaseStore {
    http_client: HttpClient,
    base_url: String,
    service_key: String,
}

impl SupabaseStore {
    /// Creates a store for the given project URL and service role key
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> AppResult<Self> {
        let base_url = base_url.into();
        let service_key = service_key.into();

        if base_url.trim().is_empty() || service_key.trim().is_empty() {
            return Err(AppError::Configuration(
                "Supabase URL and service role key are required".to_string(),
            ));
        }

        Ok(Self {
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(&config.supabase_url, &config.supabase_service_role_key)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Adds the auth and representation headers every request needs
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=representation")
    }

    /// GET request selecting rows, with PostgREST filters such as `("user_id", "eq.42")`
    fn select_request(&self, table: &str, select: &str, filters: &[(&str, String)]) -> RequestBuilder {
        let mut params: Vec<(&str, &str)> = vec![("select", select)];
        params.extend(filters.iter().map(|(key, value)| (*key, value.as_str())));

        self.authorize(self.http_client.get(self.table_url(table)))
            .query(&params)
    }

    fn insert_request<T: Serialize>(&self, table: &str, rows: &[T]) -> RequestBuilder {
        self.authorize(self.http_client.post(self.table_url(table)))
            .json(rows)
    }

    async fn query<T: DeserializeOwned>(
        &self,
        table: &str,
        select: &str,
        filters: &[(&str, String)],
    ) -> AppResult<Vec<T>> {
        let response = self.select_request(table, select, filters).send().await?;

        let rows = ensure_success(response, table).await?.json().await?;
        Ok(rows)
    }

    /// Inserts rows into a table and returns them as stored
    async fn insert<T: Serialize + Sync, R: DeserializeOwned>(
        &self,
        table: &str,
        rows: &[T],
    ) -> AppResult<Vec<R>> {
        let response = self.insert_request(table, rows).send().await?;

        let inserted = ensure_success(response, table).await?.json().await?;
        Ok(inserted)
    }
}

fn eq_filter(value: &str) -> String {
    format!("eq.{}", value)
}

async fn ensure_success(response: Response, table: &str) -> AppResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::error!(table = %table, status = %status, "Supabase request failed");
    Err(AppError::DataStore(format!(
        "Supabase returned status {} for table {}: {}",
        status, table, body
    )))
}

#[async_trait::async_trait]
impl TrackStore for SupabaseStore {
    async fn fetch_user_tracks(&self, user_id: &str) -> AppResult<Vec<TrackRecord>> {
        let tracks: Vec<TrackRecord> = self
            .query(USER_TRACKS_TABLE, "*", &[("user_id", eq_filter(user_id))])
            .await?;

        tracing::info!(
            user_id = %user_id,
            tracks = tracks.len(),
            store = self.name(),
            "Fetched user tracks"
        );

        Ok(tracks)
    }

    async fn save_recommendations(
        &self,
        user_id: &str,
        recommendations: &[Recommendation],
    ) -> AppResult<Vec<StoredRecommendation>> {
        let rows = StoredRecommendation::batch(user_id, recommendations, Utc::now());
        let stored: Vec<StoredRecommendation> = self.insert(RECOMMENDATIONS_TABLE, &rows).await?;

        tracing::info!(
            user_id = %user_id,
            saved = stored.len(),
            store = self.name(),
            "Saved recommendations"
        );

        Ok(stored)
    }

    async fn fetch_user_profile(&self, user_id: &str) -> AppResult<Option<ProfileRecord>> {
        let profiles: Vec<ProfileRecord> = self
            .query(PROFILES_TABLE, "*", &[("user_id", eq_filter(user_id))])
            .await?;

        Ok(profiles.into_iter().next())
    }

    fn name(&self) -> &'static str {
        "supabase"
    }
}
