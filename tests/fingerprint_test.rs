use chrono::NaiveDate;
use localmart::{
    generate_profile, CatalogProfile, DatasetComparator, DatasetHasher, DatasetSerializer, GenerationContext,
    JsonSerializer, Listing, NdjsonSerializer,
};
use proptest::prelude::*;

fn dataset(seed: u32) -> Vec<Listing> {
    let context = GenerationContext::new(seed, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    generate_profile(&CatalogProfile::server(), &context)
}

#[test]
fn test_fingerprint_reproducible_across_runs() {
    let hasher = DatasetHasher::new();
    assert_eq!(hasher.fingerprint(&dataset(42)), hasher.fingerprint(&dataset(42)));
    assert_ne!(hasher.fingerprint(&dataset(42)), hasher.fingerprint(&dataset(43)));
}

#[test]
fn test_fingerprint_matches_chain_of_listing_hashes() {
    let hasher = DatasetHasher::new();
    let listings = dataset(1);
    let hashes: Vec<_> = listings.iter().map(|l| hasher.hash_listing(l)).collect();
    assert_eq!(hasher.fingerprint(&listings), hasher.hash_chain(&hashes));
}

#[test]
fn test_date_change_is_a_divergence() {
    let baseline = dataset(42);
    let context = GenerationContext::new(42, NaiveDate::from_ymd_opt(2024, 6, 16).unwrap());
    let candidate = generate_profile(&CatalogProfile::server(), &context);

    let comparison = DatasetComparator::new().compare(&baseline, &candidate);
    assert!(!comparison.is_identical());
    assert_eq!(comparison.divergent_listing_count(), baseline.len());
    assert!(comparison.differences.iter().all(|d| d.field == "date"));
}

#[test]
fn test_exported_dataset_keeps_fingerprint() {
    let hasher = DatasetHasher::new();
    let listings = dataset(42);
    let expected = hasher.fingerprint(&listings);

    let json = JsonSerializer::new();
    let restored: Vec<Listing> = json.deserialize(&json.serialize(&listings).unwrap()).unwrap();
    assert_eq!(hasher.fingerprint(&restored), expected);

    let ndjson = NdjsonSerializer::new();
    let restored: Vec<Listing> = ndjson.deserialize(&ndjson.serialize(&listings).unwrap()).unwrap();
    assert_eq!(hasher.fingerprint(&restored), expected);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// A one-field edit anywhere is reported at exactly that position
    #[test]
    fn property_single_edit_located(seed in any::<u32>(), position in 0usize..640) {
        let baseline = dataset(seed);
        let mut candidate = baseline.clone();
        candidate[position].views += 1;

        let comparison = DatasetComparator::new().compare(&baseline, &candidate);
        prop_assert!(!comparison.fingerprint_matches());
        prop_assert_eq!(comparison.differences.len(), 1);
        let diff = comparison.first_divergence().unwrap();
        prop_assert_eq!(diff.position, position);
        prop_assert_eq!(diff.field.as_str(), "views");
    }
}
