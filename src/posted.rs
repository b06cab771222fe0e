//! In-memory store for user-posted ads
//!
//! Posted ads live alongside generated listings but are ordinary mutable
//! state. Their identifiers start above [`POSTED_ID_OFFSET`] and are never
//! reused, even after removal.

use crate::catalog::Catalog;
use crate::derive;
use crate::error::{AdError, ValidationError};
use crate::types::{Listing, ListingType, POSTED_ID_OFFSET};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fields a user supplies when posting an ad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAd {
    pub title: String,
    pub category: String,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    pub location: String,
    pub price: u64,
    #[serde(default)]
    pub cover: Option<String>,
}

impl NewAd {
    /// Reject blank text fields and a zero price
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("title", &self.title),
            ("category", &self.category),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidAd {
                    field: field.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }
        if self.price == 0 {
            return Err(ValidationError::InvalidAd {
                field: "price".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PostedAdStore {
    ads: BTreeMap<u64, Listing>,
    last_sequence: u64,
    catalog: Catalog,
}

impl PostedAdStore {
    /// Empty store drawing default covers from `catalog`
    pub fn new(catalog: Catalog) -> Self {
        Self {
            ads: BTreeMap::new(),
            last_sequence: 0,
            catalog,
        }
    }

    /// Validate and store a new ad dated `today`
    pub fn create(&mut self, ad: NewAd, today: NaiveDate) -> Result<Listing, AdError> {
        ad.validate()?;

        self.last_sequence += 1;
        let id = POSTED_ID_OFFSET + self.last_sequence;
        let cover = self.cover_for(&ad, (self.last_sequence - 1) as usize);

        let listing = Listing {
            id,
            title: ad.title.trim().to_string(),
            category: ad.category.trim().to_string(),
            listing_type: ad.listing_type,
            location: ad.location.trim().to_string(),
            price: ad.price,
            unit: derive::unit(ad.listing_type).map(str::to_string),
            cover,
            date: today,
            views: 0,
            rating: 0,
            verified: false,
            verified_type: None,
        };
        self.ads.insert(id, listing.clone());
        tracing::debug!(id, category = %listing.category, "posted ad created");
        Ok(listing)
    }

    /// Look up a posted ad by id
    pub fn get(&self, id: u64) -> Option<&Listing> {
        self.ads.get(&id)
    }

    /// All posted ads in id order
    pub fn list(&self) -> impl Iterator<Item = &Listing> {
        self.ads.values()
    }

    /// Replace the user-editable fields of an existing ad
    ///
    /// An update without a cover keeps the current one.
    pub fn update(&mut self, id: u64, ad: NewAd) -> Result<Listing, AdError> {
        ad.validate()?;
        let listing = self.ads.get_mut(&id).ok_or(AdError::NotFound { id })?;
        if let Some(cover) = custom_cover(&ad) {
            listing.cover = cover.to_string();
        }
        listing.title = ad.title.trim().to_string();
        listing.category = ad.category.trim().to_string();
        listing.listing_type = ad.listing_type;
        listing.location = ad.location.trim().to_string();
        listing.price = ad.price;
        listing.unit = derive::unit(ad.listing_type).map(str::to_string);
        Ok(listing.clone())
    }

    /// Delete an ad; its id is not handed out again
    pub fn remove(&mut self, id: u64) -> Option<Listing> {
        self.ads.remove(&id)
    }

    /// Number of ads currently stored
    pub fn len(&self) -> usize {
        self.ads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ads.is_empty()
    }

    fn cover_for(&self, ad: &NewAd, index: usize) -> String {
        match custom_cover(ad) {
            Some(cover) => cover.to_string(),
            None => derive::cover(&self.catalog, ad.category.trim(), index),
        }
    }
}

fn custom_cover(ad: &NewAd) -> Option<&str> {
    ad.cover.as_deref().map(str::trim).filter(|c| !c.is_empty())
}

impl Default for PostedAdStore {
    fn default() -> Self {
        Self::new(Catalog::marketplace())
    }
}
