//! Posted-ad endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use super::AppState;
use crate::api::error::ApiError;
use crate::error::AdError;
use crate::posted::NewAd;
use crate::types::Listing;

/// Posted-ad routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/ads", get(list_handler).post(create_handler))
        .route(
            "/api/ads/:id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
}

/// GET /api/ads
async fn list_handler(State(state): State<AppState>) -> Json<Vec<Listing>> {
    let posted = state.posted.read().await;
    Json(posted.list().cloned().collect())
}

/// POST /api/ads
async fn create_handler(
    State(state): State<AppState>,
    body: Result<Json<NewAd>, JsonRejection>,
) -> Result<(StatusCode, Json<Listing>), ApiError> {
    let Json(ad) = body?;
    let today = state.today();
    let listing = state.posted.write().await.create(ad, today)?;
    tracing::info!(id = listing.id, category = %listing.category, "ad posted");
    Ok((StatusCode::CREATED, Json(listing)))
}

/// GET /api/ads/:id
async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Listing>, ApiError> {
    let posted = state.posted.read().await;
    posted
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AdError::NotFound { id }.into())
}

/// PUT /api/ads/:id
async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    body: Result<Json<NewAd>, JsonRejection>,
) -> Result<Json<Listing>, ApiError> {
    let Json(ad) = body?;
    let listing = state.posted.write().await.update(id, ad)?;
    Ok(Json(listing))
}

/// DELETE /api/ads/:id
async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    match state.posted.write().await.remove(id) {
        Some(_) => {
            tracing::info!(id, "ad removed");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(AdError::NotFound { id }.into()),
    }
}
