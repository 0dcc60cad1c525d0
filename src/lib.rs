//! # atrous - stationary Daubechies-4 wavelet detail decomposition
//!
//! Computes the detail coefficients of a multi-level *à trous* (stationary,
//! undecimated) wavelet decomposition with the 8-tap Daubechies-4 filter bank.
//! Every level keeps the signal length: instead of downsampling the signal, the
//! filter is dilated by inserting zeros between its taps.
//!
//! ## Features
//!
//! - **Explicit buffers**: one working buffer per call, one dilated filter per level
//! - **Zero-allocation scratch API** for MCU/embedded systems
//! - **Fallible allocation**: memory exhaustion is reported, never aborts
//! - **Batch and multi-frame processing**
//! - **Parallel batch processing** (optional)
//!
//! ## Cargo Features
//!
//! - `std` (default): Enable standard library features
//! - `parallel`: Decompose independent frames in parallel with Rayon
//! - `verbose-logging`: Emit `log` records from the decomposition driver
//! - `internal-tests`: Property tests backed by `proptest`
//!
//! ## Example
//!
//! ```
//! use atrous::swt::decompose;
//!
//! let signal: Vec<f32> = (0..16).map(|i| (i as f32 * 0.4).sin()).collect();
//! let mut detail = vec![0.0f32; signal.len()];
//! decompose(&signal, &mut detail, 2).unwrap();
//! assert_eq!(detail.len(), 16);
//! ```
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

#![no_std]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "verbose-logging")]
macro_rules! swt_log {
    ($lvl:ident, $($arg:tt)+) => { log::$lvl!($($arg)+) };
}

#[cfg(not(feature = "verbose-logging"))]
macro_rules! swt_log {
    ($lvl:ident, $($arg:tt)+) => {};
}

/// Fallible buffer allocation
///
/// Zeroed `f32` buffers whose allocation failure is reported instead of aborting.
pub mod buffer;

/// Linear convolution
///
/// Allocation-free full convolution of two finite sequences.
pub mod conv;

/// Daubechies-4 filter bank
///
/// The fixed 8-tap analysis low-pass and high-pass filters.
pub mod filter;

/// Filter dilation ("hole insertion")
pub mod upsample;

/// Stationary wavelet decomposition driver
///
/// Multi-level à trous cascade producing detail coefficients at a requested depth.
pub mod swt;

pub use filter::{FilterKind, FILTER_LENGTH, HI_D, LO_D};
pub use swt::{decompose, Status, SwtError};
