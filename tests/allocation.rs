// Test intent: verifies buffer lifetimes of the decomposition driver, including injected allocation failures.
use atrous::swt::{
    decompose, decompose_in_place, decompose_with_scratch, taps_len, work_len, Status, SwtError,
};
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::ptr;

/// Allocator that counts, measures and optionally refuses allocations made
/// by the current thread while tracking is enabled.
struct TrackingAlloc;

thread_local! {
    static TRACKING: Cell<bool> = const { Cell::new(false) };
    static ALLOCS: Cell<usize> = const { Cell::new(0) };
    static LIVE_BYTES: Cell<isize> = const { Cell::new(0) };
    static PEAK_BYTES: Cell<isize> = const { Cell::new(0) };
    static FAIL_AT: Cell<Option<usize>> = const { Cell::new(None) };
}

fn tracking() -> bool {
    TRACKING.try_with(Cell::get).unwrap_or(false)
}

unsafe impl GlobalAlloc for TrackingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if !tracking() {
            return System.alloc(layout);
        }
        let index = ALLOCS.with(|c| {
            let n = c.get();
            c.set(n + 1);
            n
        });
        if FAIL_AT.with(Cell::get) == Some(index) {
            return ptr::null_mut();
        }
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            let live = LIVE_BYTES.with(|b| {
                let v = b.get() + layout.size() as isize;
                b.set(v);
                v
            });
            PEAK_BYTES.with(|p| p.set(p.get().max(live)));
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if tracking() {
            LIVE_BYTES.with(|b| b.set(b.get() - layout.size() as isize));
        }
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static A: TrackingAlloc = TrackingAlloc;

/// What happened to the heap while a closure ran.
#[derive(Debug)]
struct HeapReport {
    allocs: usize,
    live_bytes: isize,
    peak_bytes: isize,
}

/// Run `f` with tracking enabled, refusing the `fail_at`-th allocation if set.
fn tracked<R>(fail_at: Option<usize>, f: impl FnOnce() -> R) -> (R, HeapReport) {
    ALLOCS.with(|c| c.set(0));
    LIVE_BYTES.with(|c| c.set(0));
    PEAK_BYTES.with(|c| c.set(0));
    FAIL_AT.with(|c| c.set(fail_at));
    TRACKING.with(|c| c.set(true));
    let out = f();
    TRACKING.with(|c| c.set(false));
    let report = HeapReport {
        allocs: ALLOCS.with(Cell::get),
        live_bytes: LIVE_BYTES.with(Cell::get),
        peak_bytes: PEAK_BYTES.with(Cell::get),
    };
    (out, report)
}

fn signal(n: usize) -> Vec<f32> {
    (0..n).map(|i| ((i * 7 % 13) as f32 - 6.0) / 6.0).collect()
}

/// Invalid depth/length combinations are rejected before touching the heap.
#[test]
fn invalid_size_performs_no_allocation() {
    let input = signal(16);
    let mut out = vec![0.0f32; 16];
    for depth in [0usize, 4, 5, 64] {
        let (res, report) = tracked(None, || decompose(&input, &mut out, depth));
        assert_eq!(res, Err(SwtError::InvalidSize));
        assert_eq!(report.allocs, 0, "depth {}", depth);
    }
}

/// One working buffer per call plus one dilated filter per level after the first.
#[test]
fn successful_run_allocation_pattern() {
    let n = 256;
    let input = signal(n);
    let mut out = vec![0.0f32; n];
    for depth in 1..=7 {
        let (res, report) = tracked(None, || decompose(&input, &mut out, depth));
        assert_eq!(res, Ok(()));
        assert_eq!(report.allocs, depth, "depth {}", depth);
        assert_eq!(report.live_bytes, 0, "depth {}", depth);
        let bound = (work_len(n, depth) + taps_len(depth)) * std::mem::size_of::<f32>();
        assert!(
            report.peak_bytes as usize <= bound,
            "depth {}: peak {} > {}",
            depth,
            report.peak_bytes,
            bound
        );
    }
}

/// Refusing any single allocation yields OutOfMemory and releases everything.
#[test]
fn failure_at_every_allocation_leaks_nothing() {
    let n = 128;
    let input = signal(n);
    let mut out = vec![0.0f32; n];
    for depth in 1..=6 {
        for fail_at in 0..depth {
            let (res, report) = tracked(Some(fail_at), || decompose(&input, &mut out, depth));
            assert_eq!(res, Err(SwtError::OutOfMemory), "depth {} fail_at {}", depth, fail_at);
            assert_eq!(Status::from(&res).code(), -1);
            assert_eq!(report.allocs, fail_at + 1, "depth {} fail_at {}", depth, fail_at);
            assert_eq!(report.live_bytes, 0, "depth {} fail_at {}", depth, fail_at);
        }
    }
}

#[test]
fn in_place_failure_leaks_nothing() {
    let mut data = signal(64);
    for fail_at in 0..4 {
        let (res, report) = tracked(Some(fail_at), || decompose_in_place(&mut data, 4));
        assert_eq!(res, Err(SwtError::OutOfMemory));
        assert_eq!(report.live_bytes, 0);
    }
}

/// A failed call leaves no hidden state: the next call succeeds and agrees
/// with a call that never saw a failure.
#[test]
fn retry_after_failure_matches_clean_run() {
    let input = signal(64);
    let mut clean = vec![0.0f32; 64];
    decompose(&input, &mut clean, 3).unwrap();

    let mut out = vec![0.0f32; 64];
    let (res, _) = tracked(Some(2), || decompose(&input, &mut out, 3));
    assert_eq!(res, Err(SwtError::OutOfMemory));
    decompose(&input, &mut out, 3).unwrap();
    assert_eq!(out, clean);
}

#[test]
fn scratch_variant_never_allocates() {
    let n = 512;
    let depth = 6;
    let input = signal(n);
    let mut out = vec![0.0f32; n];
    let mut work = vec![0.0f32; work_len(n, depth)];
    let mut taps = vec![0.0f32; taps_len(depth)];
    let (res, report) = tracked(None, || {
        decompose_with_scratch(&input, &mut out, depth, &mut work, &mut taps)
    });
    assert_eq!(res, Ok(()));
    assert_eq!(report.allocs, 0);
}
