//! Query-string filtering and pagination over listings

use crate::error::QueryError;
use crate::types::{Listing, ListingType};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PER_PAGE: usize = 10;
pub const MAX_PER_PAGE: usize = 50;

/// Raw query parameters as they arrive on `GET /api/listings`
///
/// Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingQuery {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub listing_type: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub min_rating: Option<u8>,
    pub verified: Option<bool>,
    /// Out-of-range values are clamped by `Pagination::new`
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListingQuery {
    /// Validate the filter half of the query
    pub fn to_filter(&self) -> Result<ListingFilter, QueryError> {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(QueryError::InvalidPriceBounds { min, max });
            }
        }
        if let Some(value) = self.min_rating {
            if value > 5 {
                return Err(QueryError::InvalidRating { value });
            }
        }
        let listing_type = match non_empty(&self.listing_type) {
            Some(raw) => Some(raw.parse::<ListingType>().map_err(|_| QueryError::UnknownType {
                value: raw.to_string(),
            })?),
            None => None,
        };

        Ok(ListingFilter {
            category: non_empty(&self.category).map(str::to_lowercase),
            listing_type,
            location: non_empty(&self.location).map(str::to_lowercase),
            min_price: self.min_price,
            max_price: self.max_price,
            min_rating: self.min_rating,
            verified: self.verified,
        })
    }

    /// Clamped pagination for this query
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.per_page)
    }

    /// Filter then paginate
    pub fn apply<'a, I>(&self, listings: I) -> Result<Page<Listing>, QueryError>
    where
        I: IntoIterator<Item = &'a Listing>,
    {
        let filter = self.to_filter()?;
        let matched: Vec<&Listing> = listings.into_iter().filter(|l| filter.matches(l)).collect();
        Ok(paginate(&matched, self.pagination()))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Validated listing predicate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    /// Lowercased; matched exactly, ignoring case
    pub category: Option<String>,
    pub listing_type: Option<ListingType>,
    /// Lowercased; matched as a substring, ignoring case
    pub location: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub min_rating: Option<u8>,
    pub verified: Option<bool>,
}

impl ListingFilter {
    /// Whether `listing` passes every set criterion
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(category) = &self.category {
            if listing.category.to_lowercase() != *category {
                return false;
            }
        }
        if let Some(listing_type) = self.listing_type {
            if listing.listing_type != listing_type {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !listing.location.to_lowercase().contains(location.as_str()) {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| listing.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| listing.price > max) {
            return false;
        }
        if self.min_rating.is_some_and(|min| listing.rating < min) {
            return false;
        }
        if self.verified.is_some_and(|v| listing.verified != v) {
            return false;
        }
        true
    }
}

/// 1-based page number and clamped page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Page defaults to 1 and never goes below it; page size defaults to 10
    /// and is clamped to `[1, 50]`
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        let page = page.map_or(DEFAULT_PAGE, |p| usize::try_from(p.max(1)).unwrap_or(usize::MAX));
        let per_page = per_page.map_or(DEFAULT_PER_PAGE, |n| {
            n.clamp(1, MAX_PER_PAGE as i64) as usize
        });
        Self { page, per_page }
    }

    /// Number of matches skipped before this page
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

/// Slice one page out of `items`; a page past the end is empty
pub fn paginate<T: Clone>(items: &[&T], pagination: Pagination) -> Page<T> {
    let total = items.len();
    let page_items = items
        .iter()
        .skip(pagination.offset())
        .take(pagination.per_page)
        .map(|item| (*item).clone())
        .collect();

    Page {
        items: page_items,
        total,
        page: pagination.page,
        per_page: pagination.per_page,
        total_pages: total.div_ceil(pagination.per_page),
    }
}
