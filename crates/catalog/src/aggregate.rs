//! Running rating aggregates.
//!
//! `record_rating` is the incremental path used by every rating insertion;
//! `compute_average` is the batch path used at ingestion time. Both round
//! through [`round1`], so one batch over a multiset and repeated single
//! insertions of the same multiset always agree exactly.
//!
//! Rounding is round-half-away-from-zero to one decimal place, done in
//! integer arithmetic on `(sum, count)`: 4.25 becomes 4.3, 3.75 becomes 3.8.

use crate::types::{Entry, Rating};

/// Append one validated rating and refresh the aggregates. O(1).
pub fn record_rating(entry: &mut Entry, rating: Rating) {
    entry.ratings.push(rating);
    entry.rating_count += 1;
    entry.rating_sum += u64::from(rating.value());
    entry.average_rating = round1(entry.rating_sum, entry.rating_count);

    debug_assert_eq!(entry.rating_count, entry.ratings.len() as u64);
}

/// Batch average of a rating sequence, `0.0` when empty
pub fn compute_average(ratings: &[Rating]) -> f64 {
    let sum: u64 = ratings.iter().map(|r| u64::from(r.value())).sum();
    round1(sum, ratings.len() as u64)
}

/// `sum / count` rounded half away from zero to one decimal, `0.0` for `count == 0`
pub fn round1(sum: u64, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    // floor((10 * sum / count) + 1/2) without leaving the integers; widened
    // so 20 * sum cannot overflow for any u64 input
    let (sum, count) = (u128::from(sum), u128::from(count));
    let tenths = (20 * sum + count) / (2 * count);
    tenths as f64 / 10.0
}
