//! Stationary (à trous) wavelet decomposition driver.
//!
//! A `depth`-level decomposition runs `depth` full linear convolutions. Level
//! `ℓ` convolves the previous level's output with a base filter dilated by
//! `2^ℓ`: the low-pass filter for every level but the last, the high-pass
//! filter for the last. Each raw convolution is `n + 8·2^ℓ - 1` samples long;
//! the window starting at `8·2^ℓ / 2` is copied back so that every level
//! publishes exactly `n` samples.
//!
//! Buffer discipline: one working buffer, sized for the widest (final)
//! convolution, lives for the whole call and is reused by every level. A
//! dilated filter is allocated at the start of each level after the first and
//! dropped at its end. Every buffer is an owned value, so all of them are
//! released on every exit path.
//!
//! no_std + alloc compatible

use alloc::collections::TryReserveError;
use alloc::vec::Vec;
use core::fmt;

use crate::buffer::try_zeroed;
use crate::conv::{convolve, output_len, ConvError};
use crate::filter::{FilterKind, FILTER_LENGTH};
use crate::upsample::{dilated_len, upsample, upsample_into, UpsampleError};

/// Errors that can occur during a decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwtError {
    /// The depth is zero, the length is not a power of two, or
    /// `2^(depth + 1)` exceeds the signal length.
    InvalidSize,
    /// The coefficient buffer is not as long as the input.
    MismatchedLengths,
    /// A caller-provided scratch buffer is shorter than [`work_len`] or [`taps_len`].
    ScratchTooSmall,
    /// A working or filter buffer could not be allocated.
    OutOfMemory,
}

impl fmt::Display for SwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwtError::InvalidSize => write!(
                f,
                "signal length must be a power of two of at least 2^(depth + 1), depth at least 1"
            ),
            SwtError::MismatchedLengths => {
                write!(f, "coefficient buffer length must equal input length")
            }
            SwtError::ScratchTooSmall => write!(f, "scratch buffer is too small"),
            SwtError::OutOfMemory => write!(f, "decomposition buffer allocation failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SwtError {}

impl SwtError {
    /// Integer status code of this error, see [`Status`].
    pub const fn status_code(self) -> i32 {
        self.status().code()
    }

    /// Coarse status class of this error.
    pub const fn status(self) -> Status {
        match self {
            SwtError::InvalidSize | SwtError::MismatchedLengths => Status::InvalidSize,
            SwtError::ScratchTooSmall | SwtError::OutOfMemory => Status::OutOfMemory,
        }
    }
}

impl From<TryReserveError> for SwtError {
    fn from(_: TryReserveError) -> Self {
        SwtError::OutOfMemory
    }
}

impl From<UpsampleError> for SwtError {
    fn from(e: UpsampleError) -> Self {
        match e {
            UpsampleError::InvalidParameter => SwtError::InvalidSize,
            UpsampleError::MismatchedLengths => SwtError::ScratchTooSmall,
            UpsampleError::OutOfMemory => SwtError::OutOfMemory,
        }
    }
}

impl From<ConvError> for SwtError {
    fn from(e: ConvError) -> Self {
        match e {
            ConvError::EmptyInput => SwtError::InvalidSize,
            ConvError::MismatchedLengths => SwtError::ScratchTooSmall,
        }
    }
}

/// Integer status of a decomposition, for callers that speak return codes.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success = 0,
    OutOfMemory = -1,
    InvalidSize = -2,
}

impl Status {
    /// Numeric value of the status.
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl From<SwtError> for Status {
    fn from(e: SwtError) -> Self {
        e.status()
    }
}

impl<T> From<&Result<T, SwtError>> for Status {
    fn from(r: &Result<T, SwtError>) -> Self {
        match r {
            Ok(_) => Status::Success,
            Err(e) => e.status(),
        }
    }
}

/// Check that a `depth`-level decomposition of `input_size` samples is possible.
///
/// Requires `depth >= 1`, `input_size` a power of two and
/// `2^(depth + 1) <= input_size`.
pub fn validate(input_size: usize, depth: usize) -> Result<(), SwtError> {
    if depth == 0 || !input_size.is_power_of_two() {
        return Err(SwtError::InvalidSize);
    }
    // 2^(depth + 1) would not fit in usize, so it cannot be <= input_size.
    if depth >= usize::BITS as usize - 1 {
        return Err(SwtError::InvalidSize);
    }
    if (1usize << (depth + 1)) > input_size {
        return Err(SwtError::InvalidSize);
    }
    Ok(())
}

/// Deepest valid decomposition for `input_size` samples, or 0 if none is.
pub fn max_level(input_size: usize) -> usize {
    if !input_size.is_power_of_two() || input_size < 4 {
        return 0;
    }
    input_size.trailing_zeros() as usize - 1
}

/// `2^level`, or `usize::MAX` when it does not fit.
const fn saturating_stride(level: usize) -> usize {
    if level >= usize::BITS as usize {
        usize::MAX
    } else {
        1 << level
    }
}

/// Length of the working buffer needed by a `depth`-level run.
///
/// Sized for the final, most dilated convolution:
/// `input_size + 8·2^(depth - 1) - 1`. Saturates at `usize::MAX` for depths
/// [`validate`] rejects.
pub const fn work_len(input_size: usize, depth: usize) -> usize {
    if depth == 0 {
        return 0;
    }
    output_len(
        input_size,
        dilated_len(FILTER_LENGTH, saturating_stride(depth - 1)),
    )
}

/// Length of the dilated-filter scratch needed by [`decompose_with_scratch`].
///
/// Level 0 uses the base taps directly, so a single-level run needs none.
/// Saturates at `usize::MAX` like [`work_len`].
pub const fn taps_len(depth: usize) -> usize {
    if depth <= 1 {
        0
    } else {
        dilated_len(FILTER_LENGTH, saturating_stride(depth - 1))
    }
}

/// Offset of the published window inside level `level`'s raw convolution.
#[inline]
const fn window_offset(level: usize) -> usize {
    dilated_len(FILTER_LENGTH, 1 << level) / 2
}

/// Supplies the (possibly dilated) taps for one level.
trait TapSource {
    fn with_taps<F>(&mut self, kind: FilterKind, stride: usize, f: F) -> Result<(), SwtError>
    where
        F: FnOnce(&[f32]) -> Result<(), SwtError>;
}

/// Allocates each dilated filter for the duration of one level.
struct HeapTaps;

impl TapSource for HeapTaps {
    fn with_taps<F>(&mut self, kind: FilterKind, stride: usize, f: F) -> Result<(), SwtError>
    where
        F: FnOnce(&[f32]) -> Result<(), SwtError>,
    {
        if stride == 1 {
            return f(&kind.taps()[..]);
        }
        let dilated = upsample(kind.taps(), stride).map_err(|e| {
            swt_log!(warn, "swt: dilated filter allocation failed at stride {}", stride);
            e
        })?;
        f(&dilated[..])
    }
}

/// Dilates into caller-provided memory.
struct ScratchTaps<'a>(&'a mut [f32]);

impl TapSource for ScratchTaps<'_> {
    fn with_taps<F>(&mut self, kind: FilterKind, stride: usize, f: F) -> Result<(), SwtError>
    where
        F: FnOnce(&[f32]) -> Result<(), SwtError>,
    {
        if stride == 1 {
            return f(&kind.taps()[..]);
        }
        let len = dilated_len(FILTER_LENGTH, stride);
        let buf = self.0.get_mut(..len).ok_or(SwtError::ScratchTooSmall)?;
        upsample_into(kind.taps(), stride, buf)?;
        f(&*buf)
    }
}

/// Convolve `src` with level `level`'s filter into the head of `work`.
fn filter_level<T: TapSource>(
    src: &[f32],
    kind: FilterKind,
    level: usize,
    work: &mut [f32],
    taps: &mut T,
) -> Result<(), SwtError> {
    let stride = 1usize << level;
    swt_log!(
        debug,
        "swt: level {} {:?} stride {} window offset {}",
        level,
        kind,
        stride,
        window_offset(level)
    );
    taps.with_taps(kind, stride, |h| {
        let len = output_len(src.len(), h.len());
        let raw = work.get_mut(..len).ok_or(SwtError::ScratchTooSmall)?;
        convolve(src, h, raw)?;
        Ok(())
    })
}

/// Copy the centred window of level `level`'s raw convolution into `dst`.
#[inline]
fn publish(work: &[f32], level: usize, dst: &mut [f32]) {
    let offset = window_offset(level);
    dst.copy_from_slice(&work[offset..offset + dst.len()]);
}

/// Run the cascade. Level 0 reads `input`, or `coefficients` itself when
/// `input` is `None`; every later level reads the previous level's output
/// from `coefficients`.
fn cascade<T: TapSource>(
    input: Option<&[f32]>,
    coefficients: &mut [f32],
    depth: usize,
    work: &mut [f32],
    taps: &mut T,
) -> Result<(), SwtError> {
    for level in 0..depth {
        let kind = FilterKind::for_level(level, depth);
        let src: &[f32] = match input {
            Some(x) if level == 0 => x,
            _ => &*coefficients,
        };
        filter_level(src, kind, level, work, taps)?;
        publish(work, level, coefficients);
    }
    Ok(())
}

fn alloc_work(input_size: usize, depth: usize) -> Result<Vec<f32>, SwtError> {
    try_zeroed(work_len(input_size, depth)).map_err(|e| {
        swt_log!(warn, "swt: working buffer allocation failed: {}", e);
        SwtError::from(e)
    })
}

/// Detail coefficients of a `depth`-level stationary Daubechies-4 decomposition.
///
/// `input` is left untouched; `coefficients` must be as long as `input` and
/// receives the detail band of octave `depth`. Its contents are unspecified
/// when an error is returned.
///
/// # Errors
///
/// - [`SwtError::InvalidSize`] when `depth == 0`, `input.len()` is not a power
///   of two, or `2^(depth + 1) > input.len()`. Nothing is allocated.
/// - [`SwtError::MismatchedLengths`] when the buffers differ in length.
/// - [`SwtError::OutOfMemory`] when any buffer cannot be allocated. Buffers
///   acquired earlier in the call are released before returning.
pub fn decompose(input: &[f32], coefficients: &mut [f32], depth: usize) -> Result<(), SwtError> {
    validate(input.len(), depth)?;
    if coefficients.len() != input.len() {
        return Err(SwtError::MismatchedLengths);
    }
    swt_log!(debug, "swt: decomposing {} samples to depth {}", input.len(), depth);
    let mut work = alloc_work(input.len(), depth)?;
    cascade(Some(input), coefficients, depth, &mut work, &mut HeapTaps)
}

/// Like [`decompose`], but `signal` is both the input and the output.
pub fn decompose_in_place(signal: &mut [f32], depth: usize) -> Result<(), SwtError> {
    validate(signal.len(), depth)?;
    let mut work = alloc_work(signal.len(), depth)?;
    cascade(None, signal, depth, &mut work, &mut HeapTaps)
}

/// Like [`decompose`], without any heap allocation.
///
/// `work` must hold at least [`work_len`]`(input.len(), depth)` samples and
/// `taps` at least [`taps_len`]`(depth)`. Both may contain stale data.
///
/// ```
/// use atrous::swt::{decompose_with_scratch, taps_len, work_len};
///
/// const N: usize = 64;
/// const DEPTH: usize = 3;
/// let input = [0.5f32; N];
/// let mut detail = [0.0f32; N];
/// let mut work = [0.0f32; work_len(N, DEPTH)];
/// let mut taps = [0.0f32; taps_len(DEPTH)];
/// decompose_with_scratch(&input, &mut detail, DEPTH, &mut work, &mut taps).unwrap();
/// ```
pub fn decompose_with_scratch(
    input: &[f32],
    coefficients: &mut [f32],
    depth: usize,
    work: &mut [f32],
    taps: &mut [f32],
) -> Result<(), SwtError> {
    validate(input.len(), depth)?;
    if coefficients.len() != input.len() {
        return Err(SwtError::MismatchedLengths);
    }
    if work.len() < work_len(input.len(), depth) || taps.len() < taps_len(depth) {
        return Err(SwtError::ScratchTooSmall);
    }
    cascade(Some(input), coefficients, depth, work, &mut ScratchTaps(taps))
}

/// Allocating form of [`decompose`].
pub fn decompose_vec(input: &[f32], depth: usize) -> Result<Vec<f32>, SwtError> {
    validate(input.len(), depth)?;
    let mut out = try_zeroed(input.len())?;
    decompose(input, &mut out, depth)?;
    Ok(out)
}

/// Decompose each frame of `inputs` independently.
///
/// Frames may differ in length; each must satisfy [`validate`] for `depth`.
pub fn decompose_batch(inputs: &[Vec<f32>], depth: usize) -> Result<Vec<Vec<f32>>, SwtError> {
    let mut out = Vec::new();
    out.try_reserve_exact(inputs.len())?;
    for input in inputs {
        out.push(decompose_vec(input, depth)?);
    }
    Ok(out)
}

/// Parallel form of [`decompose_batch`]; each frame owns its buffers.
#[cfg(feature = "parallel")]
pub fn decompose_batch_parallel(
    inputs: &[Vec<f32>],
    depth: usize,
) -> Result<Vec<Vec<f32>>, SwtError> {
    use rayon::prelude::*;
    inputs
        .par_iter()
        .map(|input| decompose_vec(input, depth))
        .collect()
}

/// Detail coefficients for every depth `1..=max_depth`.
///
/// Entry `d - 1` equals `decompose_vec(input, d)` exactly. The low-pass
/// cascade is shared between depths, so this costs roughly twice one
/// `max_depth` run rather than `max_depth` of them.
pub fn decompose_levels(input: &[f32], max_depth: usize) -> Result<Vec<Vec<f32>>, SwtError> {
    validate(input.len(), max_depth)?;
    let n = input.len();
    let mut work = alloc_work(n, max_depth)?;
    let mut approx = try_zeroed(n)?;
    approx.copy_from_slice(input);
    let mut details = Vec::new();
    details.try_reserve_exact(max_depth)?;
    for level in 0..max_depth {
        let mut detail = try_zeroed(n)?;
        filter_level(&approx, FilterKind::HighPass, level, &mut work, &mut HeapTaps)?;
        publish(&work, level, &mut detail);
        details.push(detail);
        if level + 1 < max_depth {
            filter_level(&approx, FilterKind::LowPass, level, &mut work, &mut HeapTaps)?;
            publish(&work, level, &mut approx);
        }
    }
    Ok(details)
}


#[cfg(all(feature = "internal-tests", test))]
mod prop_tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_output_length_and_finiteness(
            shift in 2u32..10,
            ref samples in proptest::collection::vec(-100.0f32..100.0, 512),
        ) {
            let n = 1usize << shift;
            let input: Vec<f32> = samples.iter().take(n).copied().collect();
            for depth in 1..=max_level(n) {
                let mut out = vec![f32::NAN; n];
                prop_assert!(decompose(&input, &mut out, depth).is_ok());
                prop_assert!(out.iter().all(|v| v.is_finite()));
            }
        }

        #[test]
        fn prop_invalid_depth_rejected(shift in 1u32..10, extra in 0usize..4) {
            let n = 1usize << shift;
            let depth = max_level(n) + 1 + extra;
            let input = vec![0.0f32; n];
            let mut out = vec![0.0f32; n];
            prop_assert_eq!(decompose(&input, &mut out, depth), Err(SwtError::InvalidSize));
        }
    }
}
