//! Rating validation.
//!
//! A rating is accepted when it is a whole number in the closed range
//! `MIN_RATING..=MAX_RATING`. This is the only place the bound is defined.

/// Lowest accepted rating
pub const MIN_RATING: i64 = 1;

/// Highest accepted rating
pub const MAX_RATING: i64 = 5;

/// Returns true iff `value` lies in `[MIN_RATING, MAX_RATING]`
pub fn is_valid(value: i64) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&value)
}
