//! Derived rating for a ship.
//!
//! `rating = round2(80 * speed * k / (3019 - year + 1))` where `k` is 0.5 for a
//! used ship and 1 otherwise. All arithmetic is decimal; the result is rounded
//! half away from zero and always carries two fraction digits.

use rust_decimal::{Decimal, RoundingStrategy};

/// The "present" year of the catalog; ships built this year have age 1.
pub const CURRENT_YEAR: i32 = 3019;

const SPEED_WEIGHT: i64 = 80;
const RATING_SCALE: u32 = 2;

/// Panics if `production_year` is after [`CURRENT_YEAR`]; validated ships
/// never are.
pub fn compute_rating(speed: Decimal, production_year: i32, is_used: bool) -> Decimal {
    assert!(
        production_year <= CURRENT_YEAR,
        "production year {production_year} is after {CURRENT_YEAR}"
    );

    let usage = if is_used {
        Decimal::new(5, 1)
    } else {
        Decimal::ONE
    };
    let age = Decimal::from(CURRENT_YEAR - production_year + 1);
    let raw = Decimal::from(SPEED_WEIGHT) * speed * usage / age;

    let mut rating = raw.round_dp_with_strategy(RATING_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rating.rescale(RATING_SCALE);
    rating
}
