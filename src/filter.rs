//! Daubechies-4 analysis filter bank.
//!
//! Taps come from the reference Daubechies-4 table, rounded to five decimal
//! places.

/// Number of taps in each base filter.
pub const FILTER_LENGTH: usize = 8;

/// Daubechies-4 low-pass decomposition filter.
pub const LO_D: [f32; FILTER_LENGTH] = [
    -0.01060, 0.03288, 0.03084, -0.18703, -0.02798, 0.63088, 0.71484, 0.23038,
];

/// Daubechies-4 high-pass decomposition filter.
pub const HI_D: [f32; FILTER_LENGTH] = [
    -0.23038, 0.71484, -0.63088, -0.02798, 0.18703, 0.03084, -0.03288, -0.01060,
];

/// Which half of the filter bank a decomposition stage uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Smoothing stage, used for every level before the target octave.
    LowPass,
    /// Detail stage, used only at the target octave.
    HighPass,
}

impl FilterKind {
    /// Filter applied at `level` (0-indexed) of a `depth`-level decomposition.
    ///
    /// Only the final level extracts the detail band; all preceding levels
    /// smooth the signal down to that octave.
    #[inline]
    pub const fn for_level(level: usize, depth: usize) -> Self {
        if level + 1 == depth {
            FilterKind::HighPass
        } else {
            FilterKind::LowPass
        }
    }

    /// Base taps of this filter.
    #[inline]
    pub const fn taps(self) -> &'static [f32; FILTER_LENGTH] {
        match self {
            FilterKind::LowPass => &LO_D,
            FilterKind::HighPass => &HI_D,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_pass_is_quadrature_mirror_of_low_pass() {
        // hi[k] = (-1)^(k+1) * lo[N-1-k]
        for k in 0..FILTER_LENGTH {
            let sign = if k % 2 == 0 { -1.0 } else { 1.0 };
            assert_eq!(HI_D[k], sign * LO_D[FILTER_LENGTH - 1 - k], "tap {}", k);
        }
    }

    #[test]
    fn low_pass_gain_is_sqrt2() {
        let dc: f32 = LO_D.iter().sum();
        assert!((dc - core::f32::consts::SQRT_2).abs() < 1e-3, "dc gain {}", dc);
        let hi_dc: f32 = HI_D.iter().sum();
        assert!(hi_dc.abs() < 1e-3, "high-pass dc gain {}", hi_dc);
    }

    #[test]
    fn only_final_level_is_high_pass() {
        assert_eq!(FilterKind::for_level(0, 1), FilterKind::HighPass);
        assert_eq!(FilterKind::for_level(0, 3), FilterKind::LowPass);
        assert_eq!(FilterKind::for_level(1, 3), FilterKind::LowPass);
        assert_eq!(FilterKind::for_level(2, 3), FilterKind::HighPass);
        assert_eq!(FilterKind::HighPass.taps(), &HI_D);
    }
}
