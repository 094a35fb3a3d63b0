//! Rough market price band for a decoded vehicle
//!
//! A make-level base price depreciated linearly by age. Good enough to tell
//! a buyer whether a financed amount is in the right neighborhood, nothing
//! more.

use chrono::{Datelike, Utc};

use autolexis_core::{PriceRange, VehicleInfo};

const DEFAULT_BASE_PRICE: u32 = 25_000;
const DEPRECIATION_PER_YEAR: u32 = 2_000;
const PRICE_FLOOR: u32 = 5_000;
const BAND_WIDTH: u32 = 5_000;

/// Model year assumed when the registry did not report one
const FALLBACK_MODEL_YEAR: u16 = 2020;

const BASE_PRICES: &[(&str, u32)] = &[
    ("toyota", 25_000),
    ("honda", 24_000),
    ("ford", 28_000),
    ("chevrolet", 27_000),
    ("bmw", 45_000),
    ("mercedes", 50_000),
    ("audi", 42_000),
    ("nissan", 23_000),
    ("hyundai", 22_000),
    ("kia", 21_000),
];

fn base_price(make: &str) -> u32 {
    let make = make.trim().to_lowercase();
    BASE_PRICES
        .iter()
        .find(|(name, _)| make.starts_with(name))
        .map(|(_, price)| *price)
        .unwrap_or(DEFAULT_BASE_PRICE)
}

/// Price band for `make` built in `year`, as seen from `reference_year`
///
/// `None` when the make is blank. Model years after the reference year are
/// treated as new.
pub fn estimate_market_price(
    make: &str,
    year: Option<u16>,
    reference_year: i32,
) -> Option<PriceRange> {
    if make.trim().is_empty() {
        return None;
    }

    let year = i32::from(year.unwrap_or(FALLBACK_MODEL_YEAR));
    let age = u32::try_from(reference_year - year).unwrap_or(0);
    let low = base_price(make)
        .saturating_sub(age.saturating_mul(DEPRECIATION_PER_YEAR))
        .max(PRICE_FLOOR);

    Some(PriceRange {
        low,
        high: low + BAND_WIDTH,
    })
}

/// Fill `estimated_market_price` from make and year, using the current year
pub fn attach_market_price(info: &mut VehicleInfo) {
    if let Some(make) = info.make.as_deref() {
        info.estimated_market_price = estimate_market_price(make, info.year, Utc::now().year());
    }
}
