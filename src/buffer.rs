//! Fallible allocation of sample buffers.
//! no_std + alloc compatible

use alloc::collections::TryReserveError;
use alloc::vec::Vec;

/// Allocate a zero-filled buffer of exactly `len` samples.
///
/// Unlike `vec![0.0; len]`, which aborts the process when the allocator
/// refuses the request, this reports the failure to the caller. A `len` of
/// zero never touches the allocator.
pub fn try_zeroed(len: usize) -> Result<Vec<f32>, TryReserveError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;
    buf.resize(len, 0.0);
    Ok(buf)
}
