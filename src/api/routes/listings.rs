//! Listing browse, lookup, fingerprint and export endpoints

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::api::error::ApiError;
use crate::query::{ListingQuery, Page};
use crate::serialization::{DatasetSerializer, JsonSerializer, NdjsonSerializer};
use crate::types::{Listing, POSTED_ID_OFFSET};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintResponse {
    pub fingerprint: String,
    pub profile: String,
    pub profile_version: String,
    pub seed: u32,
    pub today: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Ndjson,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExportParams {
    pub format: ExportFormat,
}

/// Listing, fingerprint and export routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/listings", get(list_handler))
        .route("/api/listings/:id", get(get_handler))
        .route("/api/fingerprint", get(fingerprint_handler))
        .route("/api/export", get(export_handler))
}

/// GET /api/listings
///
/// Generated listings first, then posted ads, filtered and paginated.
async fn list_handler(
    State(state): State<AppState>,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> Result<Json<Page<Listing>>, ApiError> {
    let Query(query) = query?;
    let posted = state.posted.read().await;
    let page = query.apply(state.dataset.listings.iter().chain(posted.list()))?;
    Ok(Json(page))
}

/// GET /api/listings/:id
async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Listing>, ApiError> {
    let found = if id > POSTED_ID_OFFSET {
        state.posted.read().await.get(id).cloned()
    } else {
        state.dataset.get(id).cloned()
    };
    found
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Listing not found: {}", id)))
}

/// GET /api/fingerprint
async fn fingerprint_handler(State(state): State<AppState>) -> Json<FingerprintResponse> {
    let dataset = &state.dataset;
    Json(FingerprintResponse {
        fingerprint: dataset.fingerprint.to_string(),
        profile: dataset.profile.name().to_string(),
        profile_version: dataset.profile.version().to_string(),
        seed: dataset.context.seed(),
        today: dataset.context.today(),
        count: dataset.listings.len(),
    })
}

/// GET /api/export?format=json|ndjson
///
/// The generated dataset only; posted ads are not part of the reproducible set.
async fn export_handler(
    State(state): State<AppState>,
    params: Result<Query<ExportParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;
    match params.format {
        ExportFormat::Json => export(&JsonSerializer::new(), &state.dataset.listings),
        ExportFormat::Ndjson => export(&NdjsonSerializer::new(), &state.dataset.listings),
    }
}

fn export<S: DatasetSerializer>(serializer: &S, listings: &[Listing]) -> Result<Response, ApiError> {
    let bytes = serializer.serialize(listings)?;
    tracing::debug!(format = serializer.name(), bytes = bytes.len(), "dataset exported");
    Ok((
        [(header::CONTENT_TYPE, serializer.content_type().to_string())],
        bytes,
    )
        .into_response())
}
