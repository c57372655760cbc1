//! Utilities related to numbers.

use ieee754;
use num;
use std::fmt;

/// Floating point marker trait for easier control over trait bounds.
pub trait BFloat:
    Sync + Send + num::Float + num::cast::FromPrimitive + ieee754::Ieee754 + fmt::Debug + fmt::Display
{
}

impl BFloat for f32 {}
impl BFloat for f64 {}

/// Returns the index and value of the smallest of the given values.
///
/// Ties are resolved in favour of the earliest index and NaN values are
/// skipped. `None` is returned when no value remains.
pub fn index_of_min<F, I>(values: I) -> Option<(usize, F)>
where
    F: BFloat,
    I: IntoIterator<Item = F>,
{
    values
        .into_iter()
        .enumerate()
        .filter(|(_, value)| !value.is_nan())
        .fold(None, |min, (idx, value)| match min {
            Some((_, min_value)) if value >= min_value => min,
            _ => Some((idx, value)),
        })
}

/// Whether the two values have identical bit patterns.
pub fn bitwise_eq<F: BFloat>(a: F, b: F) -> bool {
    a.bits() == b.bits()
}
