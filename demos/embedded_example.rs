//! Embedded/MCU example for atrous
//!
//! All buffers are fixed-size arrays sized at compile time, so the
//! decomposition runs without touching the heap.

use atrous::swt::{decompose_with_scratch, taps_len, work_len};

const N: usize = 128;
const DEPTH: usize = 4;

fn main() {
    println!("=== atrous Embedded Example ===\n");

    let mut input = [0.0f32; N];
    for (i, x) in input.iter_mut().enumerate() {
        *x = if (i / 16) % 2 == 0 { 1.0 } else { -1.0 };
    }
    let mut detail = [0.0f32; N];
    let mut work = [0.0f32; work_len(N, DEPTH)];
    let mut taps = [0.0f32; taps_len(DEPTH)];

    match decompose_with_scratch(&input, &mut detail, DEPTH, &mut work, &mut taps) {
        Ok(()) => println!("   Decomposition completed"),
        Err(e) => println!("   Decomposition failed: {} (status {})", e, e.status_code()),
    }

    let peak = detail.iter().fold(0.0f32, |m, &v| m.max(v.abs()));
    println!("   Peak |detail| at octave {}: {:.4}", DEPTH, peak);

    println!("\nMemory Usage Summary");
    println!("   - signal + detail: {} bytes", 2 * N * 4);
    println!("   - working buffer:  {} bytes", work.len() * 4);
    println!("   - dilated filter:  {} bytes", taps.len() * 4);
}
