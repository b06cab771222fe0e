//! Category tables and versioned catalog profiles
//!
//! A [`Catalog`] holds the per-category price ranges, cover images and title
//! names that the derivation rules consult. Lookups never fail: a category
//! missing from a table falls back to the documented defaults, so no category
//! can ever make generation error out.
//!
//! A [`CatalogProfile`] bundles a catalog with the ordered inputs of one call
//! site (categories, types, cities, repetitions per bucket), and the
//! [`CatalogRegistry`] keeps profiles by name.

use crate::error::CatalogError;
use crate::types::{ListingType, Version};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Price range used for categories absent from the price table
pub const DEFAULT_PRICE_RANGE: PriceRange = PriceRange { min: 199, max: 1999 };

/// Cover used for categories without an image list
pub const FALLBACK_COVER_URL: &str = "/images/services/placeholder.jpg";

/// Title names used for categories without a name list
pub const DEFAULT_NAMES: [&str; 3] = ["Local Service", "Home Service", "Professional Help"];

/// Inclusive price bounds for a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
}

impl PriceRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Whether `min <= max`
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }
}

/// Per-category lookup tables with fallback-on-missing-key semantics
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    price_ranges: BTreeMap<String, PriceRange>,
    covers: BTreeMap<String, Vec<String>>,
    names: BTreeMap<String, Vec<String>>,
    default_names: Vec<String>,
}

impl Catalog {
    /// Create a builder for injecting custom tables
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// A catalog with no tables; every lookup falls back
    pub fn empty() -> Self {
        Self {
            price_ranges: BTreeMap::new(),
            covers: BTreeMap::new(),
            names: BTreeMap::new(),
            default_names: DEFAULT_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The built-in marketplace tables
    pub fn marketplace() -> Self {
        build_catalog(CLIENT_PRICES)
    }

    /// Price range for a category, or [`DEFAULT_PRICE_RANGE`]
    pub fn price_range(&self, category: &str) -> PriceRange {
        self.price_ranges
            .get(category)
            .copied()
            .unwrap_or(DEFAULT_PRICE_RANGE)
    }

    /// Cover images for a category, if it has any
    pub fn covers(&self, category: &str) -> Option<&[String]> {
        self.covers.get(category).map(Vec::as_slice)
    }

    /// Title names for a category, or the default name list
    pub fn names(&self, category: &str) -> &[String] {
        self.names
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&self.default_names)
    }

    /// Whether the price table knows this category
    pub fn has_category(&self, category: &str) -> bool {
        self.price_ranges.contains_key(category)
    }

    /// Categories present in the price table, in sorted order
    pub fn priced_categories(&self) -> impl Iterator<Item = (&str, PriceRange)> {
        self.price_ranges.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Categories that rely on at least one fallback table
    pub fn missing_tables(&self, category: &str) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.price_ranges.contains_key(category) {
            missing.push("price");
        }
        if !self.covers.contains_key(category) {
            missing.push("cover");
        }
        if !self.names.contains_key(category) {
            missing.push("name");
        }
        missing
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::marketplace()
    }
}

/// Builder for [`Catalog`]
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    price_ranges: Vec<(String, PriceRange)>,
    covers: Vec<(String, Vec<String>)>,
    names: Vec<(String, Vec<String>)>,
    default_names: Option<Vec<String>>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the price range for `category`
    pub fn with_price_range(mut self, category: impl Into<String>, min: u64, max: u64) -> Self {
        self.price_ranges.push((category.into(), PriceRange::new(min, max)));
        self
    }

    /// Set the cover list for `category`
    pub fn with_covers<I, S>(mut self, category: impl Into<String>, covers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.covers
            .push((category.into(), covers.into_iter().map(Into::into).collect()));
        self
    }

    /// Set the title names for `category`
    pub fn with_names<I, S>(mut self, category: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names
            .push((category.into(), names.into_iter().map(Into::into).collect()));
        self
    }

    /// Replace the fallback names used for unknown categories
    pub fn with_default_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Validate and build the catalog
    ///
    /// Empty image or name lists are rejected: the derivation rules index them
    /// by `index mod len`.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let mut catalog = Catalog::empty();

        for (category, range) in self.price_ranges {
            if !range.is_valid() {
                return Err(CatalogError::InvalidPriceRange {
                    category,
                    min: range.min,
                    max: range.max,
                });
            }
            catalog.price_ranges.insert(category, range);
        }

        for (category, covers) in self.covers {
            if covers.is_empty() {
                return Err(CatalogError::EmptyCoverList { category });
            }
            catalog.covers.insert(category, covers);
        }

        for (category, names) in self.names {
            if names.is_empty() {
                return Err(CatalogError::EmptyNameList { category });
            }
            catalog.names.insert(category, names);
        }

        if let Some(default_names) = self.default_names {
            if default_names.is_empty() {
                return Err(CatalogError::EmptyNameList {
                    category: "<default>".to_string(),
                });
            }
            catalog.default_names = default_names;
        }

        Ok(catalog)
    }
}

/// Metadata describing a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub name: String,
    pub description: String,
    pub version: Version,
}

/// A catalog together with the ordered generation inputs of one call site
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogProfile {
    pub metadata: ProfileMetadata,
    pub catalog: Catalog,
    pub categories: Vec<String>,
    pub types: Vec<ListingType>,
    pub cities: Vec<String>,
    /// Output beyond `MAX_GENERATED_LISTINGS` is cut off
    pub reps_per_bucket: usize,
}

impl CatalogProfile {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn version(&self) -> &Version {
        &self.metadata.version
    }

    /// Number of listings one generation run over this profile produces
    ///
    /// Capped at [`MAX_GENERATED_LISTINGS`](crate::generator::MAX_GENERATED_LISTINGS).
    pub fn listing_count(&self) -> usize {
        crate::generator::bucket_count(self.categories.len(), self.types.len(), self.reps_per_bucket)
    }

    /// Profile used by the in-browser listing service: 10 per bucket
    pub fn client() -> Self {
        Self {
            metadata: ProfileMetadata {
                name: CLIENT_PROFILE.to_string(),
                description: "In-memory listing service used for local filtering".to_string(),
                version: Version::new(1, 0, 0),
            },
            catalog: build_catalog(CLIENT_PRICES),
            categories: CLIENT_PRICES.iter().map(|(c, _, _)| c.to_string()).collect(),
            types: ListingType::ALL.to_vec(),
            cities: CITIES.iter().map(|c| c.to_string()).collect(),
            reps_per_bucket: 10,
        }
    }

    /// Profile used by the mock API server: 20 per bucket
    pub fn server() -> Self {
        Self {
            metadata: ProfileMetadata {
                name: SERVER_PROFILE.to_string(),
                description: "Mock HTTP API listing dataset".to_string(),
                version: Version::new(1, 1, 0),
            },
            catalog: build_catalog(SERVER_PRICES),
            categories: SERVER_PRICES.iter().map(|(c, _, _)| c.to_string()).collect(),
            types: ListingType::ALL.to_vec(),
            cities: CITIES.iter().map(|c| c.to_string()).collect(),
            reps_per_bucket: 20,
        }
    }
}

pub const CLIENT_PROFILE: &str = "client";
pub const SERVER_PROFILE: &str = "server";

/// Registry of named catalog profiles
#[derive(Debug, Default)]
pub struct CatalogRegistry {
    profiles: HashMap<String, CatalogProfile>,
}

impl CatalogRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in `client` and `server` profiles
    pub fn with_builtin() -> Self {
        let mut profiles = HashMap::new();
        for profile in [CatalogProfile::client(), CatalogProfile::server()] {
            profiles.insert(profile.name().to_string(), profile);
        }
        Self { profiles }
    }

    /// Register a profile under its name
    pub fn register(&mut self, profile: CatalogProfile) -> Result<(), CatalogError> {
        if self.profiles.contains_key(profile.name()) {
            return Err(CatalogError::DuplicateProfile {
                name: profile.name().to_string(),
            });
        }
        self.profiles.insert(profile.name().to_string(), profile);
        Ok(())
    }

    /// Look up a profile by name
    pub fn get(&self, name: &str) -> Option<&CatalogProfile> {
        self.profiles.get(name)
    }

    /// Look up a profile, failing with [`CatalogError::ProfileNotFound`]
    pub fn require(&self, name: &str) -> Result<&CatalogProfile, CatalogError> {
        self.get(name).ok_or_else(|| CatalogError::ProfileNotFound {
            name: name.to_string(),
        })
    }

    /// Whether a profile with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// Registered profile names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Unregister a profile
    pub fn remove(&mut self, name: &str) -> Option<CatalogProfile> {
        self.profiles.remove(name)
    }

    /// The profile with the highest version
    pub fn latest(&self) -> Option<&CatalogProfile> {
        self.profiles.values().max_by(|a, b| {
            a.version()
                .cmp(b.version())
                .then_with(|| b.name().cmp(a.name()))
        })
    }
}

// ============================================================================
// Built-in tables
// ============================================================================

pub const CITIES: [&str; 10] = [
    "Delhi, India",
    "Mumbai, India",
    "Bengaluru, India",
    "Hyderabad, India",
    "Chennai, India",
    "Kolkata, India",
    "Pune, India",
    "Ahmedabad, India",
    "Jaipur, India",
    "Lucknow, India",
];

const CLIENT_PRICES: &[(&str, u64, u64)] = &[
    ("Plumbing", 299, 1499),
    ("Electrical", 249, 1299),
    ("Cleaning", 499, 2999),
    ("Carpentry", 399, 2499),
    ("Painting", 1499, 9999),
    ("Appliance Repair", 349, 1999),
    ("Pest Control", 699, 2999),
    ("Beauty & Salon", 299, 2499),
    ("Tutoring", 499, 3999),
    ("Moving & Packing", 1999, 14999),
];

const SERVER_PRICES: &[(&str, u64, u64)] = &[
    ("Plumbing", 299, 1499),
    ("Electrical", 249, 1299),
    ("Cleaning", 399, 2499),
    ("Carpentry", 399, 2499),
    ("Painting", 999, 7999),
    ("Appliance Repair", 349, 1999),
    ("Pest Control", 599, 2499),
    ("Beauty & Salon", 299, 2499),
];

const NAMES: &[(&str, &[&str])] = &[
    (
        "Plumbing",
        &["Leak Repair", "Tap Installation", "Bathroom Fitting", "Drain Unclogging", "Water Tank Cleaning"],
    ),
    (
        "Electrical",
        &["Wiring Check", "Fan Installation", "Switchboard Repair", "Inverter Setup"],
    ),
    (
        "Cleaning",
        &["Deep Home Cleaning", "Kitchen Cleaning", "Sofa Shampoo", "Bathroom Cleaning"],
    ),
    (
        "Carpentry",
        &["Furniture Assembly", "Door Repair", "Modular Kitchen Fix", "Bed Repair"],
    ),
    (
        "Painting",
        &["Interior Painting", "Exterior Painting", "Texture Wall", "Waterproofing"],
    ),
    (
        "Appliance Repair",
        &["AC Service", "Washing Machine Repair", "Refrigerator Repair", "Microwave Repair"],
    ),
    (
        "Pest Control",
        &["Cockroach Control", "Termite Treatment", "Bed Bug Treatment", "Mosquito Control"],
    ),
    (
        "Beauty & Salon",
        &["Haircut at Home", "Bridal Makeup", "Facial Package", "Manicure & Pedicure"],
    ),
    (
        "Tutoring",
        &["Maths Tuition", "Science Tuition", "Spoken English", "Coding Classes"],
    ),
    (
        "Moving & Packing",
        &["Local Shifting", "Intercity Move", "Office Relocation", "Vehicle Transport"],
    ),
];

const COVERS_PER_CATEGORY: usize = 3;

/// Image slug for a category: lowercase, non-alphanumeric runs become `-`
fn slug(category: &str) -> String {
    let mut out = String::with_capacity(category.len());
    for c in category.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

fn build_catalog(prices: &[(&str, u64, u64)]) -> Catalog {
    let mut catalog = Catalog::empty();
    for &(category, min, max) in prices {
        catalog
            .price_ranges
            .insert(category.to_string(), PriceRange::new(min, max));

        let slug = slug(category);
        catalog.covers.insert(
            category.to_string(),
            (1..=COVERS_PER_CATEGORY)
                .map(|n| format!("/images/services/{}-{}.jpg", slug, n))
                .collect(),
        );
    }
    for &(category, names) in NAMES {
        if catalog.price_ranges.contains_key(category) {
            catalog.names.insert(
                category.to_string(),
                names.iter().map(|n| n.to_string()).collect(),
            );
        }
    }
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_category_falls_back() {
        let catalog = Catalog::marketplace();
        assert_eq!(catalog.price_range("Unknown"), DEFAULT_PRICE_RANGE);
        assert!(catalog.covers("Unknown").is_none());
        assert_eq!(catalog.names("Unknown")[0], "Local Service");
        assert!(!catalog.has_category("Unknown"));
        assert_eq!(catalog.missing_tables("Unknown"), vec!["price", "cover", "name"]);
    }

    #[test]
    fn test_marketplace_tables() {
        let catalog = Catalog::marketplace();
        assert_eq!(catalog.price_range("Plumbing"), PriceRange::new(299, 1499));
        assert_eq!(
            catalog.covers("Beauty & Salon").unwrap()[0],
            "/images/services/beauty-salon-1.jpg"
        );
        assert_eq!(catalog.names("Plumbing").len(), 5);
        assert!(catalog.missing_tables("Plumbing").is_empty());
    }

    #[test]
    fn test_builder_rejects_inverted_range() {
        let result = Catalog::builder()
            .with_price_range("Gardening", 900, 100)
            .build();
        assert_eq!(
            result.unwrap_err(),
            CatalogError::InvalidPriceRange {
                category: "Gardening".to_string(),
                min: 900,
                max: 100
            }
        );
    }

    #[test]
    fn test_builder_rejects_empty_lists() {
        let empty: Vec<String> = Vec::new();
        assert!(Catalog::builder().with_covers("X", empty.clone()).build().is_err());
        assert!(Catalog::builder().with_names("X", empty.clone()).build().is_err());
        assert!(Catalog::builder().with_default_names(empty).build().is_err());
    }

    #[test]
    fn test_builder_custom_tables() {
        let catalog = Catalog::builder()
            .with_price_range("Gardening", 100, 500)
            .with_covers("Gardening", ["/g.jpg"])
            .with_names("Gardening", ["Lawn Mowing"])
            .with_default_names(["Odd Job"])
            .build()
            .unwrap();
        assert_eq!(catalog.price_range("Gardening").max, 500);
        assert_eq!(catalog.covers("Gardening").unwrap(), ["/g.jpg".to_string()]);
        assert_eq!(catalog.names("Elsewhere"), ["Odd Job".to_string()]);
    }

    #[test]
    fn test_builtin_profiles() {
        let client = CatalogProfile::client();
        let server = CatalogProfile::server();
        assert_eq!(client.reps_per_bucket, 10);
        assert_eq!(server.reps_per_bucket, 20);
        assert_eq!(client.listing_count(), 10 * 4 * 10);
        assert_eq!(server.listing_count(), 8 * 4 * 20);

        let oversized = CatalogProfile {
            reps_per_bucket: usize::MAX,
            ..CatalogProfile::server()
        };
        assert_eq!(oversized.listing_count(), crate::generator::MAX_GENERATED_LISTINGS);
        assert_ne!(
            client.catalog.price_range("Cleaning"),
            server.catalog.price_range("Cleaning")
        );
    }

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = CatalogRegistry::new();
        assert!(registry.register(CatalogProfile::client()).is_ok());
        assert!(registry.contains(CLIENT_PROFILE));
        assert!(registry.get(CLIENT_PROFILE).is_some());
        assert!(registry.require("missing").is_err());
    }

    #[test]
    fn test_registry_duplicate_profile() {
        let mut registry = CatalogRegistry::with_builtin();
        let err = registry.register(CatalogProfile::server()).unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateProfile {
                name: SERVER_PROFILE.to_string()
            }
        );
    }

    #[test]
    fn test_registry_latest_and_remove() {
        let mut registry = CatalogRegistry::with_builtin();
        assert_eq!(registry.names(), vec![CLIENT_PROFILE, SERVER_PROFILE]);
        assert_eq!(registry.latest().unwrap().name(), SERVER_PROFILE);

        registry.remove(SERVER_PROFILE);
        assert_eq!(registry.latest().unwrap().name(), CLIENT_PROFILE);
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Moving & Packing"), "moving-packing");
        assert_eq!(slug("Plumbing"), "plumbing");
    }
}
