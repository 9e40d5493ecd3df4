//! API route configuration.

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats))

        // Location search
        .route("/location", get(handlers::get_location))

        // Location-dependent resources
        .route("/weather", get(handlers::get_weather))
        .route("/events", get(handlers::get_events))
        .route("/movies", get(handlers::get_movies))
        .route("/yelp", get(handlers::get_yelp))
        .route("/trails", get(handlers::get_trails))

        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use explorer_core::error::{ExplorerError, Result};
    use explorer_core::traits::Fetcher;
    use explorer_core::types::{Location, LookupKey, RecordData, ResourceKind, Weather};
    use explorer_store::MemoryStore;

    use crate::state::ApiConfig;

    /// Knows Seattle, has weather for it, and fails trails.
    #[derive(Default)]
    struct FakeProviders {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for FakeProviders {
        async fn fetch(&self, kind: ResourceKind, key: &LookupKey) -> Result<Vec<RecordData>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match (kind, key) {
                (ResourceKind::Location, LookupKey::Search(text))
                    if LookupKey::normalize_search(text) == "seattle" =>
                {
                    Ok(vec![RecordData::Location(Location {
                        search_query: "seattle".into(),
                        formatted_query: "Seattle, WA, USA".into(),
                        latitude: 47.6062,
                        longitude: -122.3321,
                    })])
                }
                (ResourceKind::Weather, _) => Ok(vec![
                    RecordData::Weather(Weather {
                        forecast: "Light rain in the morning.".into(),
                        time: "Mon Oct 19 2026".into(),
                    }),
                    RecordData::Weather(Weather {
                        forecast: "Overcast throughout the day.".into(),
                        time: "Tue Oct 20 2026".into(),
                    }),
                ]),
                (ResourceKind::Trail, _) => Err(ExplorerError::upstream("hikingproject", "HTTP 500")),
                _ => Err(ExplorerError::no_data("fake")),
            }
        }
    }

    fn test_app() -> (Router, Arc<FakeProviders>) {
        let fetcher = Arc::new(FakeProviders::default());
        let state = Arc::new(AppState::with_parts(
            ApiConfig::default(),
            Arc::new(MemoryStore::new()),
            fetcher.clone(),
        ));
        (create_router(state), fetcher)
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    const SEATTLE_PARAMS: &str =
        "id=1&search_query=seattle&formatted_query=Seattle%2C%20WA%2C%20USA&latitude=47.6062&longitude=-122.3321";

    #[tokio::test]
    async fn test_health_check() {
        let (app, _) = test_app();
        let (status, body) = get(&app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_location_found_then_cached() {
        let (app, fetcher) = test_app();

        let (status, body) = get(&app, "/location?data=Seattle").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["formatted_query"], "Seattle, WA, USA");
        assert_eq!(body["search_query"], "seattle");
        assert!(body["id"].is_i64());
        assert!(body["created_at"].is_i64());
        assert!(body.get("location_id").is_none());

        let (_, again) = get(&app, "/location?data=%20SEATTLE%20").await;
        assert_eq!(again, body);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_location_is_null() {
        let (app, _) = test_app();
        let (status, body) = get(&app, "/location?data=atlantis").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_missing_search_is_bad_request() {
        let (app, fetcher) = test_app();
        let (status, body) = get(&app, "/location").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_weather_array() {
        let (app, _) = test_app();
        let (status, body) = get(&app, &format!("/weather?{}", SEATTLE_PARAMS)).await;

        assert_eq!(status, StatusCode::OK);
        let days = body.as_array().unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0]["forecast"], "Light rain in the morning.");
        assert_eq!(days[0]["time"], "Mon Oct 19 2026");
        assert_eq!(days[0]["location_id"], "1");
    }

    #[tokio::test]
    async fn test_no_data_is_empty_array() {
        let (app, _) = test_app();
        for route in ["/events", "/movies", "/yelp"] {
            let (status, body) = get(&app, &format!("{}?{}", route, SEATTLE_PARAMS)).await;
            assert_eq!(status, StatusCode::OK, "{}", route);
            assert_eq!(body, Value::Array(vec![]), "{}", route);
        }
    }

    #[tokio::test]
    async fn test_upstream_failure_is_generic_500() {
        let (app, _) = test_app();
        let (status, body) = get(&app, &format!("/trails?{}", SEATTLE_PARAMS)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Sorry, something went wrong");
    }

    #[tokio::test]
    async fn test_missing_coordinates_is_bad_request() {
        let (app, _) = test_app();
        let (status, _) = get(&app, "/weather?id=1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stats_counts_hits() {
        let (app, _) = test_app();
        get(&app, "/location?data=seattle").await;
        get(&app, "/location?data=seattle").await;

        let (status, body) = get(&app, "/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hits"], 1);
        assert_eq!(body["misses"], 1);
        assert_eq!(body["hit_rate"], 0.5);
    }
}
