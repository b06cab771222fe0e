//! Core data types for localmart

use crate::derive;
use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifiers at or below this value belong to generated listings; posted ads
/// are numbered above it so the two never collide.
pub const POSTED_ID_OFFSET: u64 = 1_000_000;

/// Version of a catalog profile
///
/// Any change to a profile's tables changes the generated dataset, so the
/// version is bumped whenever they are edited.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Datasets generated under compatible versions share their tables' shape
    pub fn is_compatible_with(&self, other: &Version) -> bool {
        self.major == other.major
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Transaction type of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ListingType {
    Sell,
    Rent,
    Exchange,
    Service,
}

impl ListingType {
    /// All types in enumeration order
    pub const ALL: [ListingType; 4] = [
        ListingType::Sell,
        ListingType::Rent,
        ListingType::Exchange,
        ListingType::Service,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Sell => "Sell",
            ListingType::Rent => "Rent",
            ListingType::Exchange => "Exchange",
            ListingType::Service => "Service",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sell" => Ok(ListingType::Sell),
            "rent" => Ok(ListingType::Rent),
            "exchange" => Ok(ListingType::Exchange),
            "service" => Ok(ListingType::Service),
            _ => Err(ValidationError::UnknownListingType {
                value: s.to_string(),
            }),
        }
    }
}

/// How a verified listing was verified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerifiedType {
    Company,
    #[serde(rename = "KYC")]
    Kyc,
}

impl VerifiedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifiedType::Company => "Company",
            VerifiedType::Kyc => "KYC",
        }
    }
}

impl fmt::Display for VerifiedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single service-offering record
///
/// Generated listings are never persisted; they are recreated from the seed on
/// demand. Posted ads share the same shape with ids above [`POSTED_ID_OFFSET`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: u64,
    pub title: String,
    pub category: String,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    pub location: String,
    pub price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub cover: String,
    pub date: NaiveDate,
    pub views: u32,
    pub rating: u8,
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_type: Option<VerifiedType>,
}

impl Listing {
    /// Whether this listing is a user-posted ad rather than generated demo data
    pub fn is_posted(&self) -> bool {
        self.id > POSTED_ID_OFFSET
    }

    /// Check the cross-field invariants every listing must hold
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.verified != self.verified_type.is_some() {
            return Err(ValidationError::InvalidListing {
                id: self.id,
                reason: "verifiedType must be present exactly when verified".to_string(),
            });
        }

        if self.unit.as_deref() != derive::unit(self.listing_type) {
            return Err(ValidationError::InvalidListing {
                id: self.id,
                reason: format!("unit {:?} does not match type {}", self.unit, self.listing_type),
            });
        }

        if self.rating > 5 {
            return Err(ValidationError::InvalidListing {
                id: self.id,
                reason: format!("rating {} is above 5", self.rating),
            });
        }

        Ok(())
    }
}

/// Cryptographic fingerprint of a listing or a whole dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub [u8; 32]);

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
