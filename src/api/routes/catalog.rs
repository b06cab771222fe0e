//! Category and city listings for the active profile

use axum::{extract::State, response::Json, routing::get, Router};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::derive;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub name: String,
    pub min_price: u64,
    pub max_price: u64,
    pub cover: String,
    pub listings: usize,
}

/// Catalog routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(categories_handler))
        .route("/api/cities", get(cities_handler))
}

/// GET /api/categories
///
/// Categories in generation order. The price bounds cover every type, so
/// `minPrice` is the exchange floor and `maxPrice` the sell ceiling.
async fn categories_handler(State(state): State<AppState>) -> Json<Vec<CategorySummary>> {
    let profile = &state.dataset.profile;
    let per_category = profile.types.len() * profile.reps_per_bucket;

    let summaries = profile
        .categories
        .iter()
        .map(|name| {
            let range = profile.catalog.price_range(name);
            let min_price = profile
                .types
                .iter()
                .map(|&t| derive::price(range, t, 0.0))
                .min()
                .unwrap_or(range.min);
            let max_price = profile
                .types
                .iter()
                .map(|&t| derive::max_price(range, t))
                .max()
                .unwrap_or(range.max);
            CategorySummary {
                name: name.clone(),
                min_price,
                max_price,
                cover: derive::cover(&profile.catalog, name, 0),
                listings: per_category,
            }
        })
        .collect();
    Json(summaries)
}

/// GET /api/cities
async fn cities_handler(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.dataset.profile.cities.clone())
}
