//! Filter dilation for the à trous algorithm.
//! no_std + alloc compatible
//!
//! Dilating a filter by `level` places each tap at `i * level` and fills the
//! `level - 1` following slots with zeros, so an `L`-tap filter becomes
//! `L * level` long. The trailing zeros after the last tap are kept; the
//! decomposition driver's window offsets depend on that length.

use alloc::vec::Vec;
use core::fmt;

use crate::buffer::try_zeroed;

/// Smallest stride that actually dilates a filter.
const MIN_LEVEL: usize = 2;

/// Errors that can occur while dilating a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsampleError {
    /// `level < 2` or the filter is empty.
    InvalidParameter,
    /// The output buffer is not `filter.len() * level` long.
    MismatchedLengths,
    /// The dilated filter could not be allocated.
    OutOfMemory,
}

impl fmt::Display for UpsampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpsampleError::InvalidParameter => write!(
                f,
                "dilation needs a non-empty filter and a stride of at least {}",
                MIN_LEVEL
            ),
            UpsampleError::MismatchedLengths => {
                write!(f, "output length must equal filter length times stride")
            }
            UpsampleError::OutOfMemory => write!(f, "dilated filter allocation failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UpsampleError {}

/// Length of `filter_len` taps dilated by `level`, saturating at `usize::MAX`.
#[inline]
pub const fn dilated_len(filter_len: usize, level: usize) -> usize {
    filter_len.saturating_mul(level)
}

/// Dilate `filter` by `level` into a newly allocated buffer.
///
/// # Errors
///
/// [`UpsampleError::InvalidParameter`] when `level < 2` or `filter` is empty,
/// [`UpsampleError::OutOfMemory`] when the buffer cannot be allocated.
pub fn upsample(filter: &[f32], level: usize) -> Result<Vec<f32>, UpsampleError> {
    check(filter, level)?;
    let len = filter
        .len()
        .checked_mul(level)
        .ok_or(UpsampleError::OutOfMemory)?;
    let mut out = try_zeroed(len).map_err(|_| UpsampleError::OutOfMemory)?;
    upsample_into(filter, level, &mut out)?;
    Ok(out)
}

/// Dilate `filter` by `level` into `out` without allocating.
///
/// Every slot of `out` is written, so it may hold stale data on entry.
pub fn upsample_into(filter: &[f32], level: usize, out: &mut [f32]) -> Result<(), UpsampleError> {
    check(filter, level)?;
    if out.len() != dilated_len(filter.len(), level) {
        return Err(UpsampleError::MismatchedLengths);
    }
    for (chunk, &tap) in out.chunks_exact_mut(level).zip(filter) {
        chunk[0] = tap;
        chunk[1..].fill(0.0);
    }
    Ok(())
}

#[inline]
fn check(filter: &[f32], level: usize) -> Result<(), UpsampleError> {
    if level < MIN_LEVEL || filter.is_empty() {
        return Err(UpsampleError::InvalidParameter);
    }
    Ok(())
}


#[cfg(all(feature = "internal-tests", test))]
mod prop_tests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_dilation_layout(
            shift in 1u32..7,
            ref taps in proptest::collection::vec(-10.0f32..10.0, 1..12),
        ) {
            let level = 1usize << shift;
            let out = upsample(taps, level).unwrap();
            prop_assert_eq!(out.len(), taps.len() * level);
            let on_grid: Vec<f32> = out.iter().step_by(level).copied().collect();
            prop_assert_eq!(&on_grid, taps);
            for (i, &v) in out.iter().enumerate() {
                if i % level != 0 {
                    prop_assert_eq!(v, 0.0);
                }
            }
        }
    }
}
