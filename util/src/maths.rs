//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::{Float, ToPrimitive};

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float,
{
    target_range.0
        + ((value - source_range.0) * (target_range.1 - target_range.0)
            / (source_range.1 - source_range.0))
}

/// Arithmetic mean of the values, or `None` if there are none.
pub fn mean<T>(values: &[T]) -> Option<f64>
where
    T: ToPrimitive,
{
    if values.is_empty() {
        return None;
    }

    let mut sum = 0f64;
    for v in values {
        sum += v.to_f64()?;
    }

    Some(sum / values.len() as f64)
}

/// Median of an already sorted slice, averaging the middle pair for even
/// lengths. Returns `None` for an empty slice.
pub fn median_sorted<T>(sorted: &[T]) -> Option<f64>
where
    T: ToPrimitive,
{
    let n = sorted.len();

    if n == 0 {
        return None;
    }

    if n % 2 == 1 {
        sorted[n / 2].to_f64()
    } else {
        Some((sorted[n / 2 - 1].to_f64()? + sorted[n / 2].to_f64()?) / 2.0)
    }
}
