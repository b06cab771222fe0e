//! Route modules for the mock API
//!
//! - health: liveness and readiness probes
//! - listings: generated listings, fingerprint and export
//! - ads: posted-ad CRUD
//! - catalog: categories and cities of the active profile

pub mod ads;
pub mod catalog;
pub mod health;
pub mod listings;

use crate::api::config::{ConfigError, ServerConfig};
use crate::catalog::{CatalogProfile, CatalogRegistry};
use crate::context::GenerationContext;
use crate::generator::ListingGenerator;
use crate::hasher::DatasetHasher;
use crate::logging::{GenerationLog, LogLevel};
use crate::posted::PostedAdStore;
use crate::types::{DatasetHash, Listing, POSTED_ID_OFFSET};
use axum::Router;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// The generated listings, fixed for the lifetime of the server
#[derive(Debug)]
pub struct Dataset {
    pub profile: CatalogProfile,
    pub context: GenerationContext,
    pub listings: Vec<Listing>,
    pub fingerprint: DatasetHash,
}

impl Dataset {
    /// Generate the dataset for `profile` once
    pub fn generate(profile: CatalogProfile, context: GenerationContext) -> Self {
        let mut log = GenerationLog::new(LogLevel::Info);
        let listings = ListingGenerator::for_profile(&profile, context).generate_logged(
            &profile.categories,
            &profile.types,
            &profile.cities,
            &mut log,
        );
        for entry in log.entries() {
            match entry.level {
                LogLevel::Warn | LogLevel::Error => {
                    tracing::warn!(category = ?entry.category, "{}", entry.message)
                }
                _ => tracing::info!(profile = profile.name(), "{}", entry.message),
            }
        }

        let fingerprint = DatasetHasher::new().fingerprint(&listings);
        Self {
            profile,
            context,
            listings,
            fingerprint,
        }
    }

    /// Generated ids run 1..=N in order
    pub fn get(&self, id: u64) -> Option<&Listing> {
        if id == 0 || id > POSTED_ID_OFFSET {
            return None;
        }
        self.listings.get((id - 1) as usize).filter(|l| l.id == id)
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub dataset: Arc<Dataset>,
    pub posted: Arc<RwLock<PostedAdStore>>,
    /// Server start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Arc<ServerConfig>, dataset: Dataset) -> Self {
        let posted = PostedAdStore::new(dataset.profile.catalog.clone());
        Self {
            config,
            dataset: Arc::new(dataset),
            posted: Arc::new(RwLock::new(posted)),
            start_time: Instant::now(),
        }
    }

    /// Resolve the configured profile and generate its dataset
    pub fn from_config(config: ServerConfig, today: NaiveDate) -> Result<Self, ConfigError> {
        let profile = CatalogRegistry::with_builtin()
            .get(&config.profile)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownProfile(config.profile.clone()))?;
        let context = GenerationContext::new(config.seed, config.today.unwrap_or(today));
        let dataset = Dataset::generate(profile, context);
        Ok(Self::new(Arc::new(config), dataset))
    }

    /// Date posted ads are stamped with
    pub fn today(&self) -> NaiveDate {
        self.dataset.context.today()
    }
}

/// Build the main application router by merging all route modules
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(listings::routes())
        .merge(ads::routes())
        .merge(catalog::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
