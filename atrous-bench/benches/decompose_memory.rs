#[cfg(target_os = "linux")]
use atrous::swt::decompose;
#[cfg(target_os = "linux")]
use criterion::{criterion_group, criterion_main, Criterion};
#[cfg(target_os = "linux")]
use procfs::process::Process;
#[cfg(target_os = "linux")]
use std::hint::black_box;

#[cfg(target_os = "linux")]
/// Benchmarks resident memory growth across a deep decomposition to confirm
/// the working buffer is reused rather than reallocated per level.
fn decompose_memory_benchmark(c: &mut Criterion) {
    c.bench_function("decompose_memory", |b| {
        let input = vec![0.5f32; 1 << 16];
        let mut out = vec![0.0f32; 1 << 16];
        b.iter(|| {
            let process = Process::myself().unwrap();
            let before = process.statm().unwrap().resident;
            decompose(&input, &mut out, 10).unwrap();
            let after = process.statm().unwrap().resident;
            black_box(after.saturating_sub(before));
        });
    });
}

#[cfg(target_os = "linux")]
criterion_group!(benches, decompose_memory_benchmark);
#[cfg(target_os = "linux")]
criterion_main!(benches);

#[cfg(not(target_os = "linux"))]
fn main() {}
