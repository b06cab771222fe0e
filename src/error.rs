//! Error types for localmart

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocalmartError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Ad error: {0}")]
    Ad(#[from] AdError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Invalid price range for {category}: min {min} exceeds max {max}")]
    InvalidPriceRange { category: String, min: u64, max: u64 },

    #[error("Profile already registered: {name}")]
    DuplicateProfile { name: String },

    #[error("Profile not found: {name}")]
    ProfileNotFound { name: String },

    #[error("Empty image list for category: {category}")]
    EmptyCoverList { category: String },

    #[error("Empty name list for category: {category}")]
    EmptyNameList { category: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid listing {id}: {reason}")]
    InvalidListing { id: u64, reason: String },

    #[error("Invalid ad: {field} {reason}")]
    InvalidAd { field: String, reason: String },

    #[error("Unknown listing type: {value}")]
    UnknownListingType { value: String },

    #[error("Invalid draft: {reason}")]
    InvalidDraft { reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("minPrice {min} exceeds maxPrice {max}")]
    InvalidPriceBounds { min: u64, max: u64 },

    #[error("minRating must be between 0 and 5, got {value}")]
    InvalidRating { value: u8 },

    #[error("Unknown listing type filter: {value}")]
    UnknownType { value: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdError {
    #[error("Posted ad not found: {id}")]
    NotFound { id: u64 },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("Serialization failed: {reason}")]
    SerializationFailed { reason: String },

    #[error("Deserialization failed: {reason}")]
    DeserializationFailed { reason: String },
}
