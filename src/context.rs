//! Generation context: the explicit inputs that fully determine a run

use crate::prng::Mulberry32;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Frozen calendar date used as "today" by the date derivation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterministicDate {
    today: NaiveDate,
}

impl DeterministicDate {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Freeze the current UTC date
    pub fn utc_today() -> Self {
        Self::new(Utc::now().date_naive())
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn with_today(&self, today: NaiveDate) -> Self {
        Self::new(today)
    }
}

/// Seed and frozen date for one generation run
///
/// The context is plain data. Each run builds a fresh generator from it via
/// [`GenerationContext::rng`], so concurrent callers never share draw state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationContext {
    seed: u32,
    date: DeterministicDate,
}

impl GenerationContext {
    /// Context for one run with an explicit reference date
    pub fn new(seed: u32, today: NaiveDate) -> Self {
        Self {
            seed,
            date: DeterministicDate::new(today),
        }
    }

    pub fn builder() -> GenerationContextBuilder {
        GenerationContextBuilder::new()
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn today(&self) -> NaiveDate {
        self.date.today()
    }

    /// A fresh generator positioned at the start of the seed's stream
    pub fn rng(&self) -> Mulberry32 {
        Mulberry32::new(self.seed)
    }

    /// Copy of this context with another seed
    pub fn with_seed(&self, seed: u32) -> Self {
        Self { seed, ..*self }
    }

    pub fn with_today(&self, today: NaiveDate) -> Self {
        Self {
            date: self.date.with_today(today),
            ..*self
        }
    }
}

/// Builder for [`GenerationContext`]
#[derive(Debug, Default)]
pub struct GenerationContextBuilder {
    seed: Option<u32>,
    today: Option<NaiveDate>,
}

impl GenerationContextBuilder {
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

    /// Build the context; seed defaults to 0 and today to the current UTC date
    pub fn build(self) -> GenerationContext {
        let date = self
            .today
            .map(DeterministicDate::new)
            .unwrap_or_else(DeterministicDate::utc_today);
        GenerationContext {
            seed: self.seed.unwrap_or(0),
            date,
        }
    }
}
