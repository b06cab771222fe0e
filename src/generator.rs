//! Combinatorial enumeration and listing generation
//!
//! Listings are produced over the Cartesian product categories × types ×
//! `0..reps_per_bucket`, in that nesting order, with identifiers `1..=N`.
//! Every run starts a fresh PRNG from the context seed, so the whole sequence
//! is reproducible and no state is shared between callers.
//!
//! Generated ids stop at [`MAX_GENERATED_LISTINGS`]; everything above belongs
//! to posted ads.

use crate::catalog::{Catalog, CatalogProfile};
use crate::context::GenerationContext;
use crate::derive::derive_listing;
use crate::logging::{GenerationLog, LogEntry, LogLevel};
use crate::types::{Listing, ListingType, POSTED_ID_OFFSET};
use chrono::NaiveDate;

/// Repetitions per bucket when a builder is not told otherwise
pub const DEFAULT_REPS_PER_BUCKET: usize = 10;

/// Ceiling on one run's output, keeping generated ids out of the posted range
pub const MAX_GENERATED_LISTINGS: usize = POSTED_ID_OFFSET as usize;

/// `categories × types × reps`, saturating and capped at [`MAX_GENERATED_LISTINGS`]
pub fn bucket_count(categories: usize, types: usize, reps_per_bucket: usize) -> usize {
    categories
        .checked_mul(types)
        .and_then(|n| n.checked_mul(reps_per_bucket))
        .unwrap_or(usize::MAX)
        .min(MAX_GENERATED_LISTINGS)
}

/// One position in the enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket<'a> {
    pub id: u64,
    pub category: &'a str,
    pub listing_type: ListingType,
    /// Repetition index within the `(category, type)` bucket
    pub index: usize,
}

/// Iterator over `(category, type, index)` triples in generation order
#[derive(Debug, Clone)]
pub struct BucketEnumerator<'a, C> {
    categories: &'a [C],
    types: &'a [ListingType],
    reps_per_bucket: usize,
    position: usize,
    total: usize,
}

impl<'a, C: AsRef<str>> BucketEnumerator<'a, C> {
    /// Enumerate `categories × types × 0..reps_per_bucket`
    pub fn new(categories: &'a [C], types: &'a [ListingType], reps_per_bucket: usize) -> Self {
        Self {
            categories,
            types,
            reps_per_bucket,
            position: 0,
            total: bucket_count(categories.len(), types.len(), reps_per_bucket),
        }
    }

    /// Number of triples the full enumeration yields
    pub fn total(&self) -> usize {
        self.total
    }
}

impl<'a, C: AsRef<str>> Iterator for BucketEnumerator<'a, C> {
    type Item = Bucket<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.total {
            return None;
        }
        let pos = self.position;
        let per_category = self.types.len().saturating_mul(self.reps_per_bucket);
        let bucket = Bucket {
            id: pos as u64 + 1,
            category: self.categories[pos / per_category].as_ref(),
            listing_type: self.types[(pos / self.reps_per_bucket) % self.types.len()],
            index: pos % self.reps_per_bucket,
        };
        self.position += 1;
        Some(bucket)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.position;
        (remaining, Some(remaining))
    }
}

impl<'a, C: AsRef<str>> ExactSizeIterator for BucketEnumerator<'a, C> {}

/// Generator bound to a context, a catalog and a repetition count
#[derive(Debug, Clone)]
pub struct ListingGenerator {
    context: GenerationContext,
    catalog: Catalog,
    reps_per_bucket: usize,
}

impl ListingGenerator {
    /// Create a new listing generator
    pub fn new(context: GenerationContext, catalog: Catalog, reps_per_bucket: usize) -> Self {
        Self {
            context,
            catalog,
            reps_per_bucket,
        }
    }

    pub fn builder() -> ListingGeneratorBuilder {
        ListingGeneratorBuilder::new()
    }

    /// Generator configured from a profile's catalog and repetition count
    pub fn for_profile(profile: &CatalogProfile, context: GenerationContext) -> Self {
        Self::new(context, profile.catalog.clone(), profile.reps_per_bucket)
    }

    pub fn context(&self) -> &GenerationContext {
        &self.context
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn reps_per_bucket(&self) -> usize {
        self.reps_per_bucket
    }

    /// Generate the full listing sequence
    pub fn generate<C, L>(&self, categories: &[C], types: &[ListingType], cities: &[L]) -> Vec<Listing>
    where
        C: AsRef<str>,
        L: AsRef<str>,
    {
        let mut rng = self.context.rng();
        let enumerator = BucketEnumerator::new(categories, types, self.reps_per_bucket);
        let mut listings = Vec::with_capacity(enumerator.total());

        for bucket in enumerator {
            listings.push(derive_listing(
                &mut rng,
                &self.catalog,
                self.context.today(),
                cities,
                bucket.id,
                bucket.category,
                bucket.listing_type,
                bucket.index,
            ));
        }

        tracing::debug!(
            seed = self.context.seed(),
            count = listings.len(),
            "generated listings"
        );
        listings
    }

    /// Generate and record fallbacks and totals into `log`
    ///
    /// The listings are identical to [`ListingGenerator::generate`].
    pub fn generate_logged<C, L>(
        &self,
        categories: &[C],
        types: &[ListingType],
        cities: &[L],
        log: &mut GenerationLog,
    ) -> Vec<Listing>
    where
        C: AsRef<str>,
        L: AsRef<str>,
    {
        for category in categories {
            let category = category.as_ref();
            for table in self.catalog.missing_tables(category) {
                log.log(
                    LogEntry::new(LogLevel::Warn, format!("{} table missing, using default", table))
                        .with_category(category)
                        .with_metadata("table", table),
                );
            }
        }
        if cities.is_empty() && !categories.is_empty() {
            log.warn("city list is empty, locations will be blank");
        }

        let listings = self.generate(categories, types, cities);
        log.log(
            LogEntry::new(LogLevel::Info, format!("generated {} listings", listings.len()))
                .with_metadata("seed", self.context.seed().to_string())
                .with_metadata("reps_per_bucket", self.reps_per_bucket.to_string()),
        );
        listings
    }
}

/// Builder for [`ListingGenerator`]
#[derive(Debug, Default)]
pub struct ListingGeneratorBuilder {
    seed: Option<u32>,
    today: Option<NaiveDate>,
    catalog: Option<Catalog>,
    reps_per_bucket: Option<usize>,
}

impl ListingGeneratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_reps_per_bucket(mut self, reps: usize) -> Self {
        self.reps_per_bucket = Some(reps);
        self
    }

    /// Build the generator, filling unset values with defaults
    pub fn build(self) -> ListingGenerator {
        let mut context = GenerationContext::builder();
        if let Some(seed) = self.seed {
            context = context.with_seed(seed);
        }
        if let Some(today) = self.today {
            context = context.with_today(today);
        }
        ListingGenerator::new(
            context.build(),
            self.catalog.unwrap_or_else(Catalog::marketplace),
            self.reps_per_bucket.unwrap_or(DEFAULT_REPS_PER_BUCKET),
        )
    }
}

/// Generate listings with the built-in catalog, dated back from today's UTC date
pub fn generate<C, L>(
    seed: u32,
    categories: &[C],
    types: &[ListingType],
    cities: &[L],
    reps_per_bucket: usize,
) -> Vec<Listing>
where
    C: AsRef<str>,
    L: AsRef<str>,
{
    let context = GenerationContext::builder().with_seed(seed).build();
    generate_with(&context, &Catalog::marketplace(), categories, types, cities, reps_per_bucket)
}

/// Generate listings under an explicit context and catalog
pub fn generate_with<C, L>(
    context: &GenerationContext,
    catalog: &Catalog,
    categories: &[C],
    types: &[ListingType],
    cities: &[L],
    reps_per_bucket: usize,
) -> Vec<Listing>
where
    C: AsRef<str>,
    L: AsRef<str>,
{
    ListingGenerator::new(*context, catalog.clone(), reps_per_bucket).generate(categories, types, cities)
}

/// Generate the full dataset a profile describes
pub fn generate_profile(profile: &CatalogProfile, context: &GenerationContext) -> Vec<Listing> {
    ListingGenerator::for_profile(profile, *context).generate(
        &profile.categories,
        &profile.types,
        &profile.cities,
    )
}
