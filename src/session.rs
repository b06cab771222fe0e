//! Per-session state: failed cover images and provider-registration drafts
//!
//! Both live in explicit values owned by whoever drives the session. Nothing
//! here is global; dropping or clearing the value ends its lifetime.

use crate::catalog::FALLBACK_COVER_URL;
use crate::error::{LocalmartError, SerializationError, ValidationError};
use crate::types::Listing;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Number of steps in the provider-registration wizard
pub const TOTAL_STEPS: u8 = 4;

/// Cover images that failed to load during this session
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    failed_images: HashSet<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember that `url` failed to load
    pub fn mark_image_failed(&mut self, url: impl Into<String>) {
        let url = url.into();
        tracing::debug!(%url, "cover image marked as failed");
        self.failed_images.insert(url);
    }

    pub fn is_image_failed(&self, url: &str) -> bool {
        self.failed_images.contains(url)
    }

    /// Cover to display for `listing`; the placeholder once its image failed
    pub fn resolve_cover<'a>(&self, listing: &'a Listing) -> &'a str {
        if self.is_image_failed(&listing.cover) {
            FALLBACK_COVER_URL
        } else {
            &listing.cover
        }
    }

    pub fn failed_count(&self) -> usize {
        self.failed_images.len()
    }

    pub fn clear(&mut self) {
        self.failed_images.clear();
    }
}

/// Saved state of a partially completed provider registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDraft {
    step: u8,
    pub fields: BTreeMap<String, String>,
}

impl ProviderDraft {
    /// Fresh draft at step 1
    pub fn new() -> Self {
        Self {
            step: 1,
            fields: BTreeMap::new(),
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    /// Jump to `step`, which must be in `1..=TOTAL_STEPS`
    pub fn set_step(&mut self, step: u8) -> Result<(), ValidationError> {
        if !(1..=TOTAL_STEPS).contains(&step) {
            return Err(ValidationError::InvalidDraft {
                reason: format!("step {} outside 1..={}", step, TOTAL_STEPS),
            });
        }
        self.step = step;
        Ok(())
    }

    /// Move forward one step, staying on the last
    pub fn advance(&mut self) -> u8 {
        self.step = (self.step + 1).min(TOTAL_STEPS);
        self.step
    }

    /// Move back one step, staying on the first
    pub fn back(&mut self) -> u8 {
        self.step = self.step.saturating_sub(1).max(1);
        self.step
    }

    pub fn is_last_step(&self) -> bool {
        self.step == TOTAL_STEPS
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Check the step is in range
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=TOTAL_STEPS).contains(&self.step) {
            return Err(ValidationError::InvalidDraft {
                reason: format!("step {} outside 1..={}", self.step, TOTAL_STEPS),
            });
        }
        Ok(())
    }
}

impl Default for ProviderDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// Keyed JSON drafts
///
/// Drafts are stored serialized so a load always sees exactly what a save
/// wrote, the same way a browser's key/value storage behaves.
#[derive(Debug, Clone, Default)]
pub struct DraftStore {
    drafts: HashMap<String, String>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `draft` under `key`, replacing any earlier draft
    ///
    /// An out-of-range step is a `Validation` error; encoding failures are
    /// `Serialization` errors.
    pub fn save(&mut self, key: impl Into<String>, draft: &ProviderDraft) -> Result<(), LocalmartError> {
        draft.validate()?;
        let json = serde_json::to_string(draft).map_err(|e| SerializationError::SerializationFailed {
            reason: e.to_string(),
        })?;
        self.drafts.insert(key.into(), json);
        Ok(())
    }

    /// `Ok(None)` when nothing was saved under `key`
    pub fn load(&self, key: &str) -> Result<Option<ProviderDraft>, LocalmartError> {
        let Some(json) = self.drafts.get(key) else {
            return Ok(None);
        };
        let draft: ProviderDraft =
            serde_json::from_str(json).map_err(|e| SerializationError::DeserializationFailed {
                reason: e.to_string(),
            })?;
        draft.validate()?;
        Ok(Some(draft))
    }

    /// Drop the draft under `key`; false when there was none
    pub fn discard(&mut self, key: &str) -> bool {
        self.drafts.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.drafts.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn clear(&mut self) {
        self.drafts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ListingType;
    use chrono::NaiveDate;

    fn listing(cover: &str) -> Listing {
        Listing {
            id: 1,
            title: "Deep Cleaning - Cleaning (Service)".to_string(),
            category: "Cleaning".to_string(),
            listing_type: ListingType::Service,
            location: "Delhi, India".to_string(),
            price: 900,
            unit: Some("per visit".to_string()),
            cover: cover.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
            views: 80,
            rating: 4,
            verified: false,
            verified_type: None,
        }
    }

    #[test]
    fn test_failed_image_falls_back() {
        let mut session = SessionContext::new();
        let l = listing("/images/services/cleaning-2.jpg");
        assert_eq!(session.resolve_cover(&l), "/images/services/cleaning-2.jpg");

        session.mark_image_failed("/images/services/cleaning-2.jpg");
        assert!(session.is_image_failed(&l.cover));
        assert_eq!(session.resolve_cover(&l), FALLBACK_COVER_URL);

        session.clear();
        assert_eq!(session.failed_count(), 0);
        assert_eq!(session.resolve_cover(&l), l.cover);
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = SessionContext::new();
        let b = SessionContext::new();
        a.mark_image_failed("/x.jpg");
        assert!(a.is_image_failed("/x.jpg"));
        assert!(!b.is_image_failed("/x.jpg"));
    }

    #[test]
    fn test_draft_step_bounds() {
        let mut draft = ProviderDraft::new();
        assert_eq!(draft.step(), 1);
        assert_eq!(draft.back(), 1);
        assert_eq!(draft.advance(), 2);
        draft.set_step(TOTAL_STEPS).unwrap();
        assert!(draft.is_last_step());
        assert_eq!(draft.advance(), TOTAL_STEPS);

        assert!(matches!(
            draft.set_step(0),
            Err(ValidationError::InvalidDraft { .. })
        ));
        assert!(draft.set_step(TOTAL_STEPS + 1).is_err());
        assert_eq!(draft.step(), TOTAL_STEPS);
    }

    #[test]
    fn test_draft_store_save_load_discard() {
        let mut store = DraftStore::new();
        assert_eq!(store.load("provider").unwrap(), None);

        let mut draft = ProviderDraft::new()
            .with_field("businessName", "Sharma Plumbing")
            .with_field("city", "Jaipur, India");
        draft.advance();
        store.save("provider", &draft).unwrap();

        assert_eq!(store.load("provider").unwrap(), Some(draft));
        assert!(store.discard("provider"));
        assert!(!store.discard("provider"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_draft_rejected_on_load() {
        let mut store = DraftStore::new();
        store
            .drafts
            .insert("provider".to_string(), r#"{"step":9,"fields":{}}"#.to_string());
        assert!(matches!(
            store.load("provider"),
            Err(LocalmartError::Validation(ValidationError::InvalidDraft { .. }))
        ));

        store.drafts.insert("provider".to_string(), "not json".to_string());
        assert!(matches!(
            store.load("provider"),
            Err(LocalmartError::Serialization(SerializationError::DeserializationFailed { .. }))
        ));
    }

    #[test]
    fn test_save_rejects_out_of_range_step_as_validation() {
        let draft: ProviderDraft = serde_json::from_str(r#"{"step":0,"fields":{}}"#).unwrap();
        let mut store = DraftStore::new();
        assert!(matches!(
            store.save("provider", &draft),
            Err(LocalmartError::Validation(ValidationError::InvalidDraft { .. }))
        ));
        assert!(store.is_empty());
    }
}
