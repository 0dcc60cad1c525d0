//! Linear convolution of finite real sequences
//! no_std compatible, allocation-free

use core::fmt;

/// Errors reported by [`convolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvError {
    /// One of the operands has no samples.
    EmptyInput,
    /// The output buffer is not `a.len() + b.len() - 1` long.
    MismatchedLengths,
}

impl fmt::Display for ConvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvError::EmptyInput => write!(f, "convolution operand is empty"),
            ConvError::MismatchedLengths => {
                write!(f, "output length must equal len(a) + len(b) - 1")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConvError {}

/// Number of samples produced by a full linear convolution of sequences of
/// length `a_len` and `b_len`. Zero if either is empty; saturates at `usize::MAX`.
#[inline]
pub const fn output_len(a_len: usize, b_len: usize) -> usize {
    if a_len == 0 || b_len == 0 {
        0
    } else {
        a_len.saturating_add(b_len - 1)
    }
}

/// Full linear convolution `out[k] = Σ a[i]·b[k-i]` for `k = 0..a.len()+b.len()-1`.
///
/// `out` is overwritten entirely. Zero-valued taps of `b` are skipped when `a`
/// is finite, so a dilated filter costs only as much as its non-zero support.
/// A non-finite `a` takes the full sum, so `inf·0` still yields NaN.
pub fn convolve(a: &[f32], b: &[f32], out: &mut [f32]) -> Result<(), ConvError> {
    if a.is_empty() || b.is_empty() {
        return Err(ConvError::EmptyInput);
    }
    if out.len() != output_len(a.len(), b.len()) {
        return Err(ConvError::MismatchedLengths);
    }
    out.fill(0.0);
    let skip_zeros = a.iter().all(|x| x.is_finite());
    for (j, &tap) in b.iter().enumerate() {
        if skip_zeros && tap == 0.0 {
            continue;
        }
        for (o, &x) in out[j..j + a.len()].iter_mut().zip(a) {
            *o += x * tap;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_reproduces_kernel() {
        let a = [1.0f32];
        let b = [0.5f32, -1.0, 2.0];
        let mut out = [0.0f32; 3];
        convolve(&a, &b, &mut out).unwrap();
        assert_eq!(out, b);
    }

    #[test]
    fn small_known_result() {
        // (1 + 2z + 3z^2)(1 - z) = 1 + z + z^2 - 3z^3
        let a = [1.0f32, 2.0, 3.0];
        let b = [1.0f32, -1.0];
        let mut out = [9.0f32; 4];
        convolve(&a, &b, &mut out).unwrap();
        assert_eq!(out, [1.0, 1.0, 1.0, -3.0]);
    }

    #[test]
    fn zero_taps_are_transparent() {
        let a = [1.0f32, -2.0, 0.5, 4.0];
        let sparse = [2.0f32, 0.0, 0.0, -1.0];
        let mut out = [0.0f32; 7];
        convolve(&a, &sparse, &mut out).unwrap();
        let expected = [2.0f32, -4.0, 1.0, 7.0, 2.0, -0.5, -4.0];
        assert_eq!(out, expected);
    }

    #[test]
    fn commutes_for_short_sequences() {
        let a = [0.25f32, 1.0, -0.5];
        let b = [3.0f32, 0.0, 1.5, -2.0, 1.0];
        let mut ab = [0.0f32; 7];
        let mut ba = [0.0f32; 7];
        convolve(&a, &b, &mut ab).unwrap();
        convolve(&b, &a, &mut ba).unwrap();
        for (x, y) in ab.iter().zip(ba.iter()) {
            assert!((x - y).abs() < 1e-6, "{} vs {}", x, y);
        }
    }

    #[test]
    fn non_finite_input_meets_zero_taps() {
        let mut out = [0.0f32; 3];
        convolve(&[f32::INFINITY, 1.0], &[1.0, 0.0], &mut out).unwrap();
        assert_eq!(out[0], f32::INFINITY);
        assert!(out[1].is_nan());
        assert_eq!(out[2], 0.0);
    }

    #[test]
    fn output_len_saturates() {
        assert_eq!(output_len(usize::MAX, 8), usize::MAX);
        assert_eq!(output_len(usize::MAX - 3, usize::MAX), usize::MAX);
    }

    #[test]
    fn rejects_bad_shapes() {
        let mut out = [0.0f32; 3];
        assert_eq!(convolve(&[], &[1.0], &mut out), Err(ConvError::EmptyInput));
        assert_eq!(convolve(&[1.0], &[], &mut out), Err(ConvError::EmptyInput));
        assert_eq!(
            convolve(&[1.0, 2.0], &[1.0, 2.0], &mut out[..2]),
            Err(ConvError::MismatchedLengths)
        );
        assert_eq!(output_len(0, 8), 0);
        assert_eq!(output_len(16, 8), 23);
    }
}
