//! Attribute derivation rules
//!
//! Each rule maps `(category, type, index)` and zero or more PRNG draws to one
//! listing attribute. [`derive_listing`] applies them with draws taken in this
//! order, which is part of the reproducibility contract:
//!
//! 1. date offset
//! 2. location
//! 3. price
//! 4. views
//! 5. rating
//! 6. verified
//! 7. verified type, only when verified
//!
//! Title, unit and cover are pure functions and consume no draws.

use crate::catalog::{Catalog, PriceRange, FALLBACK_COVER_URL};
use crate::traits::RandomSource;
use crate::types::{Listing, ListingType, VerifiedType};
use chrono::{Days, NaiveDate};

/// Dates fall within this many days before "today"
pub const DATE_WINDOW_DAYS: u64 = 120;
pub const MIN_VIEWS: u32 = 50;
pub const VIEWS_SPAN: u32 = 2000;
pub const MIN_RATING: u8 = 3;
pub const RATING_STEPS: u8 = 3;
pub const VERIFIED_PROBABILITY: f64 = 0.6;
pub const COMPANY_PROBABILITY: f64 = 0.5;
pub const RENT_FACTOR: f64 = 0.8;
pub const EXCHANGE_FACTOR: f64 = 0.6;

/// Round to nearest, halves upward; inputs are non-negative
pub fn round_half_up(x: f64) -> u64 {
    (x + 0.5).floor() as u64
}

/// Price drawn from the category range, discounted by type
pub fn price(range: PriceRange, listing_type: ListingType, r: f64) -> u64 {
    let span = range.max.saturating_sub(range.min) as f64;
    let base = round_half_up(range.min as f64 + r * span);
    match listing_type {
        ListingType::Rent => round_half_up(base as f64 * RENT_FACTOR),
        ListingType::Exchange => round_half_up(base as f64 * EXCHANGE_FACTOR),
        ListingType::Sell | ListingType::Service => base,
    }
}

/// Highest price a type can reach within a range
pub fn max_price(range: PriceRange, listing_type: ListingType) -> u64 {
    match listing_type {
        ListingType::Rent => round_half_up(range.max as f64 * RENT_FACTOR),
        ListingType::Exchange => round_half_up(range.max as f64 * EXCHANGE_FACTOR),
        ListingType::Sell | ListingType::Service => range.max,
    }
}

/// Unit of sale; depends on the type alone
pub fn unit(listing_type: ListingType) -> Option<&'static str> {
    match listing_type {
        ListingType::Rent => Some("per day"),
        ListingType::Service => Some("per visit"),
        ListingType::Sell | ListingType::Exchange => None,
    }
}

/// Whole days before today, `0..120`
pub fn days_ago(r: f64) -> u64 {
    (r * DATE_WINDOW_DAYS as f64).floor() as u64
}

/// Listing date, counted back from `today`
pub fn date(today: NaiveDate, r: f64) -> NaiveDate {
    today
        .checked_sub_days(Days::new(days_ago(r)))
        .unwrap_or(NaiveDate::MIN)
}

/// City picked by the draw; an empty city list yields an empty location
pub fn location<S: AsRef<str>>(cities: &[S], r: f64) -> String {
    if cities.is_empty() {
        return String::new();
    }
    let index = ((r * cities.len() as f64).floor() as usize).min(cities.len() - 1);
    cities[index].as_ref().to_string()
}

/// View count in `50..2050`
pub fn views(r: f64) -> u32 {
    (MIN_VIEWS as f64 + r * VIEWS_SPAN as f64).floor() as u32
}

/// Star rating in `3..=5`
pub fn rating(r: f64) -> u8 {
    MIN_RATING + ((r * RATING_STEPS as f64).floor() as u8).min(RATING_STEPS - 1)
}

/// Verification flag and kind; takes a second draw only when verified
pub fn verification<R: RandomSource + ?Sized>(rng: &mut R) -> (bool, Option<VerifiedType>) {
    if rng.next_f64() >= VERIFIED_PROBABILITY {
        return (false, None);
    }
    let kind = if rng.next_f64() < COMPANY_PROBABILITY {
        VerifiedType::Company
    } else {
        VerifiedType::Kyc
    };
    (true, Some(kind))
}

/// `"<name> - <category>"`, suffixed with `" (<type>)"` except for services
pub fn title(catalog: &Catalog, category: &str, listing_type: ListingType, index: usize) -> String {
    let names = catalog.names(category);
    let name = &names[index % names.len()];
    match listing_type {
        ListingType::Service => format!("{} - {}", name, category),
        other => format!("{} - {} ({})", name, category, other),
    }
}

/// Cover chosen by position, not by draw
pub fn cover(catalog: &Catalog, category: &str, index: usize) -> String {
    match catalog.covers(category) {
        Some(covers) if !covers.is_empty() => covers[index % covers.len()].clone(),
        _ => FALLBACK_COVER_URL.to_string(),
    }
}

/// Derive one complete listing, consuming draws in the documented order
#[allow(clippy::too_many_arguments)]
pub fn derive_listing<R, S>(
    rng: &mut R,
    catalog: &Catalog,
    today: NaiveDate,
    cities: &[S],
    id: u64,
    category: &str,
    listing_type: ListingType,
    index: usize,
) -> Listing
where
    R: RandomSource + ?Sized,
    S: AsRef<str>,
{
    let date = date(today, rng.next_f64());
    let location = location(cities, rng.next_f64());
    let price = price(catalog.price_range(category), listing_type, rng.next_f64());
    let views = views(rng.next_f64());
    let rating = rating(rng.next_f64());
    let (verified, verified_type) = verification(rng);

    Listing {
        id,
        title: title(catalog, category, listing_type, index),
        category: category.to_string(),
        listing_type,
        location,
        price,
        unit: unit(listing_type).map(str::to_string),
        cover: cover(catalog, category, index),
        date,
        views,
        rating,
        verified,
        verified_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays a fixed list of draws
    struct Scripted(VecDeque<f64>);

    impl Scripted {
        fn new(draws: &[f64]) -> Self {
            Self(draws.iter().copied().collect())
        }
    }

    impl RandomSource for Scripted {
        fn next_f64(&mut self) -> f64 {
            self.0.pop_front().expect("script exhausted")
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_price_by_type() {
        let range = PriceRange::new(299, 1499);
        assert_eq!(price(range, ListingType::Sell, 0.0), 299);
        assert_eq!(price(range, ListingType::Sell, 0.5), 899);
        assert_eq!(price(range, ListingType::Rent, 0.5), 719);
        assert_eq!(price(range, ListingType::Exchange, 0.5), 539);
        assert_eq!(price(range, ListingType::Service, 0.5), 899);
    }

    #[test]
    fn test_price_rounds_half_up() {
        // 100 + 0.25 * 2 lands exactly on the half
        assert_eq!(price(PriceRange::new(100, 102), ListingType::Sell, 0.25), 101);
        assert_eq!(round_half_up(100.5), 101);
        assert_eq!(round_half_up(100.49), 100);
        // 3 * 0.8 is 2.4000000000000004 in binary floating point
        assert_eq!(price(PriceRange::new(3, 3), ListingType::Rent, 0.9), 2);
    }

    #[test]
    fn test_max_price() {
        let range = PriceRange::new(299, 1499);
        assert_eq!(max_price(range, ListingType::Rent), 1199);
        assert_eq!(max_price(range, ListingType::Exchange), 899);
        assert_eq!(max_price(range, ListingType::Sell), 1499);
    }

    #[test]
    fn test_unit_rule() {
        assert_eq!(unit(ListingType::Rent), Some("per day"));
        assert_eq!(unit(ListingType::Service), Some("per visit"));
        assert_eq!(unit(ListingType::Sell), None);
        assert_eq!(unit(ListingType::Exchange), None);
    }

    #[test]
    fn test_date_window() {
        assert_eq!(date(today(), 0.0), today());
        assert_eq!(date(today(), 0.999_999), NaiveDate::from_ymd_opt(2024, 2, 17).unwrap());
        assert_eq!(days_ago(0.5), 60);
    }

    #[test]
    fn test_location_index() {
        let cities = ["A", "B", "C"];
        assert_eq!(location(&cities, 0.0), "A");
        assert_eq!(location(&cities, 0.34), "B");
        assert_eq!(location(&cities, 0.999), "C");
        let none: [&str; 0] = [];
        assert_eq!(location(&none, 0.5), "");
    }

    #[test]
    fn test_views_and_rating_bounds() {
        assert_eq!(views(0.0), 50);
        assert_eq!(views(0.999_999_9), 2049);
        assert_eq!(rating(0.0), 3);
        assert_eq!(rating(0.5), 4);
        assert_eq!(rating(0.999_999_9), 5);
    }

    #[test]
    fn test_verification_draws() {
        let mut rng = Scripted::new(&[0.7]);
        assert_eq!(verification(&mut rng), (false, None));
        assert!(rng.0.is_empty());

        let mut rng = Scripted::new(&[0.1, 0.2]);
        assert_eq!(verification(&mut rng), (true, Some(VerifiedType::Company)));

        let mut rng = Scripted::new(&[0.59, 0.5]);
        assert_eq!(verification(&mut rng), (true, Some(VerifiedType::Kyc)));
    }

    #[test]
    fn test_title_rule() {
        let catalog = Catalog::marketplace();
        assert_eq!(
            title(&catalog, "Plumbing", ListingType::Rent, 0),
            "Leak Repair - Plumbing (Rent)"
        );
        assert_eq!(
            title(&catalog, "Plumbing", ListingType::Service, 6),
            "Tap Installation - Plumbing"
        );
        assert_eq!(
            title(&catalog, "Unknown", ListingType::Sell, 1),
            "Home Service - Unknown (Sell)"
        );
    }

    #[test]
    fn test_cover_rule() {
        let catalog = Catalog::marketplace();
        assert_eq!(cover(&catalog, "Plumbing", 4), "/images/services/plumbing-2.jpg");
        assert_eq!(cover(&catalog, "Unknown", 4), FALLBACK_COVER_URL);
    }

    #[test]
    fn test_derive_listing_draw_order() {
        let catalog = Catalog::marketplace();
        let cities = ["Delhi, India", "Mumbai, India"];
        // date, location, price, views, rating, verified, verified type
        let mut rng = Scripted::new(&[0.5, 0.75, 0.0, 0.0, 0.99, 0.0, 0.9]);

        let listing = derive_listing(
            &mut rng,
            &catalog,
            today(),
            &cities,
            7,
            "Plumbing",
            ListingType::Exchange,
            2,
        );

        assert!(rng.0.is_empty());
        assert_eq!(listing.id, 7);
        assert_eq!(listing.date, NaiveDate::from_ymd_opt(2024, 4, 16).unwrap());
        assert_eq!(listing.location, "Mumbai, India");
        assert_eq!(listing.price, 179);
        assert_eq!(listing.views, 50);
        assert_eq!(listing.rating, 5);
        assert!(listing.verified);
        assert_eq!(listing.verified_type, Some(VerifiedType::Kyc));
        assert_eq!(listing.unit, None);
        assert_eq!(listing.title, "Bathroom Fitting - Plumbing (Exchange)");
        assert!(listing.validate().is_ok());
    }
}
