use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Utc;
use serde_json::{json, Map, Value};

use tastematch_api::{
    error::AppResult,
    models::{ProfileRecord, Recommendation, StoredRecommendation, TrackRecord},
    routes::{create_router, AppState},
    services::store::TrackStore,
};

/// In-memory store standing in for Supabase
#[derive(Default)]
struct InMemoryStore {
    tracks: HashMap<String, Vec<TrackRecord>>,
    profiles: HashMap<String, ProfileRecord>,
    saved: Mutex<Vec<StoredRecommendation>>,
}

#[async_trait::async_trait]
impl TrackStore for InMemoryStore {
    async fn fetch_user_tracks(&self, user_id: &str) -> AppResult<Vec<TrackRecord>> {
        Ok(self.tracks.get(user_id).cloned().unwrap_or_default())
    }

    async fn save_recommendations(
        &self,
        user_id: &str,
        recommendations: &[Recommendation],
    ) -> AppResult<Vec<StoredRecommendation>> {
        let rows = StoredRecommendation::batch(user_id, recommendations, Utc::now());
        self.saved.lock().unwrap().extend(rows.iter().cloned());
        Ok(rows)
    }

    async fn fetch_user_profile(&self, user_id: &str) -> AppResult<Option<ProfileRecord>> {
        Ok(self.profiles.get(user_id).cloned())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

fn track_json(id: &str, d: f64, e: f64, v: f64, t: f64, a: f64) -> Value {
    json!({
        "spotify_track_id": id,
        "danceability": d,
        "energy": e,
        "valence": v,
        "tempo": t,
        "acousticness": a,
    })
}

fn listener_history() -> Vec<TrackRecord> {
    let rows = json!([
        { "spotify_track_id": "A", "name": "Alpha", "artist": "Band", "danceability": 0.8, "energy": 0.7, "valence": 0.6, "tempo": 120, "acousticness": 0.1 },
        { "spotify_track_id": "B", "danceability": 0.2, "energy": 0.3, "valence": 0.2, "tempo": 80, "acousticness": 0.9 },
        { "spotify_track_id": "C", "danceability": 0.6, "energy": 0.5, "valence": 0.4, "tempo": 100 },
    ]);
    serde_json::from_value(rows).unwrap()
}

fn create_test_server() -> (TestServer, Arc<InMemoryStore>) {
    let mut store = InMemoryStore::default();
    store.tracks.insert("user-1".to_string(), listener_history());

    let mut fields = Map::new();
    fields.insert("display_name".to_string(), json!("Ada"));
    store.profiles.insert(
        "user-1".to_string(),
        ProfileRecord {
            user_id: "user-1".to_string(),
            fields,
        },
    );

    let store = Arc::new(store);
    let state = AppState::new(store.clone());
    let app = create_router(Arc::new(state));
    (TestServer::new(app).unwrap(), store)
}

fn ids(body: &Value) -> Vec<String> {
    body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["spotify_track_id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let (server, _) = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (server, _) = create_test_server();
    let id = "0b6a3f52-52a4-4c3e-8f0a-2f0d6c1e9b77";

    let response = server
        .get("/health")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_static(id),
        )
        .await;

    assert_eq!(response.header("x-request-id"), id);
}

#[tokio::test]
async fn test_score_two_tracks() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "tracks": [
                track_json("A", 0.8, 0.7, 0.6, 120.0, 0.1),
                track_json("B", 0.2, 0.3, 0.2, 80.0, 0.9),
            ],
            "top_n": 2
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(ids(&body), vec!["A", "B"]);
    assert_eq!(body["recommendations"][0]["name"], "");
    assert_eq!(body["diversity_score"], 0.5);
}

#[tokio::test]
async fn test_score_excludes_incomplete_tracks() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "tracks": [
                track_json("A", 0.8, 0.7, 0.6, 120.0, 0.1),
                { "spotify_track_id": "partial", "danceability": 0.5, "energy": 0.5, "valence": 0.5, "tempo": 90 },
                track_json("B", 0.2, 0.3, 0.2, 80.0, 0.9),
            ]
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let returned = ids(&body);
    assert_eq!(returned.len(), 2);
    assert!(!returned.contains(&"partial".to_string()));
}

#[tokio::test]
async fn test_score_skips_rows_without_id_or_with_nan() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "tracks": [
                track_json("A", 0.8, 0.7, 0.6, 120.0, 0.1),
                { "name": "orphan" },
                { "spotify_track_id": "nan", "danceability": 0.5, "energy": 0.5, "valence": 0.5, "tempo": "NaN", "acousticness": 0.5 },
                track_json("B", 0.2, 0.3, 0.2, 80.0, 0.9),
            ]
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(ids(&body), vec!["A", "B"]);
    let scores: Vec<f64> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["score"].as_f64().unwrap())
        .collect();
    assert!(scores.iter().all(|s| s.is_finite()));
}

#[tokio::test]
async fn test_score_negative_top_n_is_empty() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "tracks": [track_json("A", 0.8, 0.7, 0.6, 120.0, 0.1)],
            "top_n": -1
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(ids(&body).is_empty());
    assert_eq!(body["diversity_score"], 0.0);
}

#[tokio::test]
async fn test_score_empty_input() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "tracks": [] }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(ids(&body).is_empty());
}

#[tokio::test]
async fn test_explain_with_supplied_profile() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/v1/recommendations/explain")
        .json(&json!({
            "profile": { "danceability": 0.5, "energy": 0.5, "valence": 0.4, "tempo": 0.0, "acousticness": 0.5 },
            "track": track_json("A", 0.8, 0.7, 0.6, 120.0, 0.1)
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["explanation"],
        "This track matches your taste based on its audio characteristics"
    );
}

#[tokio::test]
async fn test_user_recommendations_from_store() {
    let (server, store) = create_test_server();

    let response = server
        .post("/api/v1/users/user-1/recommendations")
        .json(&json!({ "top_n": 10 }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user_id"], "user-1");
    // C has no acousticness
    assert_eq!(ids(&body), vec!["A", "B"]);
    assert_eq!(body["recommendations"][0]["artist"], "Band");
    assert_eq!(body["saved"], 0);
    assert!(store.saved.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_user_recommendations_persisted() {
    let (server, store) = create_test_server();

    let response = server
        .post("/api/v1/users/user-1/recommendations")
        .json(&json!({ "persist": true }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["saved"], 2);

    let saved = store.saved.lock().unwrap();
    assert_eq!(saved.len(), 2);
    assert!(saved.iter().all(|row| row.user_id == "user-1"));
    assert_eq!(saved[0].created_at, saved[1].created_at);
}

#[tokio::test]
async fn test_unknown_user_gets_empty_list() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/v1/users/nobody/recommendations")
        .json(&json!({}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(ids(&body).is_empty());
}

#[tokio::test]
async fn test_user_explain() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/v1/users/user-1/explain")
        .json(&json!({ "track": track_json("Z", 0.1, 0.2, 0.3, 99.0, 0.4) }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["spotify_track_id"], "Z");
    assert_eq!(
        body["explanation"],
        "This track matches your taste based on its audio characteristics"
    );
}

#[tokio::test]
async fn test_profile_found_and_missing() {
    let (server, _) = create_test_server();

    let response = server.get("/api/v1/users/user-1/profile").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["display_name"], "Ada");

    let response = server.get("/api/v1/users/nobody/profile").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("nobody"));
}
