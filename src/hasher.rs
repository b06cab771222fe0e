//! Dataset fingerprinting using Blake3
//!
//! Listings are fed to the hasher in a fixed field order with explicit
//! little-endian integers and length-prefixed strings, so a fingerprint is the
//! same on every platform and survives serde representation changes.

use crate::types::{DatasetHash, Listing, ListingType, VerifiedType};
use blake3::Hasher as Blake3Hasher;

/// Computes listing hashes and whole-dataset fingerprints
#[derive(Debug, Clone, Default)]
pub struct DatasetHasher;

impl DatasetHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a single listing
    pub fn hash_listing(&self, listing: &Listing) -> DatasetHash {
        let mut hasher = Blake3Hasher::new();
        hasher.update(&listing.id.to_le_bytes());
        write_str(&mut hasher, &listing.title);
        write_str(&mut hasher, &listing.category);
        hasher.update(&[type_tag(listing.listing_type)]);
        write_str(&mut hasher, &listing.location);
        hasher.update(&listing.price.to_le_bytes());
        write_opt_str(&mut hasher, listing.unit.as_deref());
        write_str(&mut hasher, &listing.cover);
        write_str(&mut hasher, &listing.date.format("%Y-%m-%d").to_string());
        hasher.update(&listing.views.to_le_bytes());
        hasher.update(&[listing.rating, u8::from(listing.verified)]);
        hasher.update(&[verified_tag(listing.verified_type)]);
        DatasetHash(*hasher.finalize().as_bytes())
    }

    /// Fingerprint of an ordered listing sequence
    ///
    /// Order matters: the same listings in a different order fingerprint
    /// differently.
    pub fn fingerprint(&self, listings: &[Listing]) -> DatasetHash {
        let hashes: Vec<DatasetHash> = listings.iter().map(|l| self.hash_listing(l)).collect();
        self.hash_chain(&hashes)
    }

    /// Single hash over a sequence of hashes
    pub fn hash_chain(&self, hashes: &[DatasetHash]) -> DatasetHash {
        let mut hasher = Blake3Hasher::new();
        for hash in hashes {
            hasher.update(&hash.0);
        }
        DatasetHash(*hasher.finalize().as_bytes())
    }

    /// Extend a running chain hash by one more hash
    pub fn extend_chain(&self, previous: &DatasetHash, next: &DatasetHash) -> DatasetHash {
        let mut hasher = Blake3Hasher::new();
        hasher.update(&previous.0);
        hasher.update(&next.0);
        DatasetHash(*hasher.finalize().as_bytes())
    }
}

fn write_str(hasher: &mut Blake3Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn write_opt_str(hasher: &mut Blake3Hasher, value: Option<&str>) {
    match value {
        None => {
            hasher.update(&[0]);
        }
        Some(value) => {
            hasher.update(&[1]);
            write_str(hasher, value);
        }
    }
}

fn type_tag(listing_type: ListingType) -> u8 {
    match listing_type {
        ListingType::Sell => 0,
        ListingType::Rent => 1,
        ListingType::Exchange => 2,
        ListingType::Service => 3,
    }
}

fn verified_tag(kind: Option<VerifiedType>) -> u8 {
    match kind {
        None => 0,
        Some(VerifiedType::Company) => 1,
        Some(VerifiedType::Kyc) => 2,
    }
}
