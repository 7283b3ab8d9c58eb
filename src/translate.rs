//! Line-number-to-index translation.
//!
//! Clients address the survey with real-world line numbers (the labels in the
//! manifest); the scheduler and everything below it work in zero-based
//! cartesian indices. This module is the boundary where labels are forgotten:
//! after translation the rest of the system takes the indices at face value
//! and uses them for lookup directly.

use num_traits::PrimInt;

use crate::error::StrataError;

/// Translates each requested label in `xs` to its position in `labels`.
///
/// `labels` must be sorted ascending and duplicate-free; the binary search
/// relies on it. Any label absent from the sequence fails the whole call with
/// `NotFound`. Cost is O(len(xs) * log(len(labels))).
///
/// Returns a fresh vector rather than rewriting `xs` in place, so callers can
/// keep the raw request values around for the process header.
pub fn to_cartesian<T>(labels: &[T], xs: &[T]) -> Result<Vec<usize>, StrataError>
where
    T: PrimInt + std::fmt::Display,
{
    debug_assert!(labels.windows(2).all(|w| w[0] < w[1]));

    xs.iter()
        .map(|x| {
            labels
                .binary_search(x)
                .map_err(|_| StrataError::NotFound(format!("lineno {} not in index", x)))
        })
        .collect()
}
