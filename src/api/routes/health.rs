//! Health check and readiness endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use super::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub profile: String,
    pub seed: u32,
    pub listings: usize,
    pub posted_ads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyResponse {
    pub ready: bool,
}

/// Health check routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let posted_ads = state.posted.read().await.len();
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        profile: state.dataset.profile.name().to_string(),
        seed: state.dataset.context.seed(),
        listings: state.dataset.listings.len(),
        posted_ads,
    };
    (StatusCode::OK, Json(response))
}

/// GET /ready
///
/// The dataset is generated before the router exists, so a served request is
/// always ready.
async fn ready_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(ReadyResponse { ready: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes::test_support::{body_json, state};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_endpoint_returns_json() {
        let router = routes().with_state(state());
        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.version, crate::VERSION);
        assert_eq!(health.profile, "client");
        assert_eq!(health.seed, 42);
        assert_eq!(health.listings, 400);
        assert_eq!(health.posted_ads, 0);
    }

    #[tokio::test]
    async fn test_health_response_camel_case() {
        let router = routes().with_state(state());
        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert!(json.get("uptimeSecs").is_some());
        assert!(json.get("postedAds").is_some());
    }

    #[tokio::test]
    async fn test_ready_endpoint() {
        let router = routes().with_state(state());
        let response = router
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["ready"], true);
    }
}
