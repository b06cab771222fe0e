//! Field-by-field comparison of two generated datasets

use crate::hasher::DatasetHasher;
use crate::types::{DatasetHash, Listing};
use serde::{Deserialize, Serialize};

/// One field that differs between two listings at the same position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDifference {
    pub position: usize,
    pub id: u64,
    pub field: String,
    pub baseline: String,
    pub candidate: String,
}

/// Outcome of comparing a baseline dataset with a candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetComparison {
    pub baseline_len: usize,
    pub candidate_len: usize,
    pub baseline_fingerprint: DatasetHash,
    pub candidate_fingerprint: DatasetHash,
    pub differences: Vec<FieldDifference>,
}

impl DatasetComparison {
    pub fn length_matches(&self) -> bool {
        self.baseline_len == self.candidate_len
    }

    pub fn fingerprint_matches(&self) -> bool {
        self.baseline_fingerprint == self.candidate_fingerprint
    }

    /// Same length, same fingerprint, no field differences
    pub fn is_identical(&self) -> bool {
        self.length_matches() && self.fingerprint_matches() && self.differences.is_empty()
    }

    /// The first differing field, in generation order
    pub fn first_divergence(&self) -> Option<&FieldDifference> {
        self.differences.first()
    }

    /// Number of positions with at least one differing field
    pub fn divergent_listing_count(&self) -> usize {
        let mut positions: Vec<usize> = self.differences.iter().map(|d| d.position).collect();
        positions.dedup();
        positions.len()
    }

    /// One-line human-readable result
    pub fn summary(&self) -> String {
        if self.is_identical() {
            return "Datasets are identical".to_string();
        }

        let mut parts = Vec::new();
        if !self.length_matches() {
            parts.push(format!(
                "lengths differ ({} vs {})",
                self.baseline_len, self.candidate_len
            ));
        }
        if !self.fingerprint_matches() {
            parts.push("fingerprints differ".to_string());
        }
        let divergent = self.divergent_listing_count();
        if divergent > 0 {
            parts.push(format!("{} listings diverged", divergent));
        }
        format!("Datasets differ: {}", parts.join(", "))
    }
}

/// Compares datasets produced by two generation runs
#[derive(Debug, Clone, Default)]
pub struct DatasetComparator {
    hasher: DatasetHasher,
}

impl DatasetComparator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare position by position; extra listings on either side are not
    /// diffed field by field but show up in the length check
    pub fn compare(&self, baseline: &[Listing], candidate: &[Listing]) -> DatasetComparison {
        let differences = baseline
            .iter()
            .zip(candidate)
            .enumerate()
            .flat_map(|(position, (b, c))| diff_listing(position, b, c))
            .collect();

        DatasetComparison {
            baseline_len: baseline.len(),
            candidate_len: candidate.len(),
            baseline_fingerprint: self.hasher.fingerprint(baseline),
            candidate_fingerprint: self.hasher.fingerprint(candidate),
            differences,
        }
    }
}

fn diff_listing(position: usize, b: &Listing, c: &Listing) -> Vec<FieldDifference> {
    let mut out = Vec::new();
    let mut check = |field: &str, baseline: String, candidate: String| {
        if baseline != candidate {
            out.push(FieldDifference {
                position,
                id: b.id,
                field: field.to_string(),
                baseline,
                candidate,
            });
        }
    };

    check("id", b.id.to_string(), c.id.to_string());
    check("title", b.title.clone(), c.title.clone());
    check("category", b.category.clone(), c.category.clone());
    check("type", b.listing_type.to_string(), c.listing_type.to_string());
    check("location", b.location.clone(), c.location.clone());
    check("price", b.price.to_string(), c.price.to_string());
    check("unit", format!("{:?}", b.unit), format!("{:?}", c.unit));
    check("cover", b.cover.clone(), c.cover.clone());
    check("date", b.date.to_string(), c.date.to_string());
    check("views", b.views.to_string(), c.views.to_string());
    check("rating", b.rating.to_string(), c.rating.to_string());
    check("verified", b.verified.to_string(), c.verified.to_string());
    check(
        "verifiedType",
        format!("{:?}", b.verified_type),
        format!("{:?}", c.verified_type),
    );
    out
}
