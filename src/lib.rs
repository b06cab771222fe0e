//! localmart
//!
//! Deterministic demo-listing generation for a local-services marketplace.
//! A seeded Mulberry32 stream drives a fixed enumeration of categories, types
//! and repetitions, so the same seed, inputs and reference date always yield
//! the same listings. The [`api`] module serves that dataset over HTTP.

pub mod api;
pub mod catalog;
pub mod comparison;
pub mod context;
pub mod derive;
pub mod error;
pub mod generator;
pub mod hasher;
pub mod logging;
pub mod posted;
pub mod prng;
pub mod query;
pub mod serialization;
pub mod session;
pub mod traits;
pub mod types;

pub use catalog::{Catalog, CatalogBuilder, CatalogProfile, CatalogRegistry, PriceRange, ProfileMetadata};
pub use comparison::{DatasetComparator, DatasetComparison, FieldDifference};
pub use context::{DeterministicDate, GenerationContext, GenerationContextBuilder};
pub use error::{AdError, CatalogError, LocalmartError, QueryError, SerializationError, ValidationError};
pub use generator::{generate, generate_profile, generate_with, Bucket, BucketEnumerator, ListingGenerator};
pub use hasher::DatasetHasher;
pub use logging::{GenerationLog, LogEntry, LogLevel};
pub use posted::{NewAd, PostedAdStore};
pub use prng::Mulberry32;
pub use query::{ListingFilter, ListingQuery, Page, Pagination};
pub use serialization::{DatasetSerializer, JsonSerializer, NdjsonSerializer, SerializationContext};
pub use session::{DraftStore, ProviderDraft, SessionContext};
pub use traits::RandomSource;
pub use types::{DatasetHash, Listing, ListingType, VerifiedType, Version, POSTED_ID_OFFSET};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
