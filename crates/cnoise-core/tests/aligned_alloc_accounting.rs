#![allow(clippy::cast_possible_wrap)]
//! Leak accounting for aligned buffers.
//!
//! A counting global allocator tracks live bytes per thread; every aligned
//! allocation must be returned in full once its buffer is dropped or freed.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use cnoise_core::{
    allocate_aligned, allocate_aligned_f32, coherent_noise_row_aligned, free_aligned, Quality,
};

struct CountingAllocator;

thread_local! {
    // Per-thread so the harness and parallel tests do not disturb the count.
    static LIVE_BYTES: Cell<isize> = const { Cell::new(0) };
}

fn record(delta: isize) {
    // Ignored during thread teardown, when the slot is already gone.
    let _ = LIVE_BYTES.try_with(|live| live.set(live.get() + delta));
}

// SAFETY: Delegates every call to `System` and only adjusts a counter.
// - Condition 1: Layouts are forwarded unchanged, so `System`'s contract holds.
// Reason: The test needs to observe allocation traffic from the library.
unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            record(layout.size() as isize);
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            record(layout.size() as isize);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        record(-(layout.size() as isize));
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            record(new_size as isize - layout.size() as isize);
        }
        new_ptr
    }
}

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

fn live_bytes() -> isize {
    LIVE_BYTES.with(Cell::get)
}

/// Runs one-time initialization (tier detection, log callsite registration)
/// outside the measured window.
fn prime() {
    drop(allocate_aligned(16, 16));
    drop(coherent_noise_row_aligned(&[0.5; 17], 0.5, 0.5, 0, Quality::Fast, None, 16));
}

#[test]
fn test_allocate_and_free_balances() {
    prime();
    let before = live_bytes();
    for alignment in [1, 2, 8, 16, 32, 64, 4096] {
        for size in [0, 1, 3, 64, 1000, 65_536] {
            let buffer = allocate_aligned(alignment, size).expect("allocation");
            assert!(live_bytes() > before, "allocation was not observed");
            free_aligned(buffer);
        }
    }
    assert_eq!(live_bytes(), before);
}

#[test]
fn test_drop_releases_buffer() {
    prime();
    let before = live_bytes();
    {
        let mut buffer = allocate_aligned_f32(32, 1024).expect("allocation");
        buffer.as_f32_slice_mut().expect("f32 view").fill(1.5);
    }
    assert_eq!(live_bytes(), before);
}

#[test]
fn test_failed_allocation_leaks_nothing() {
    prime();
    let before = live_bytes();
    assert!(allocate_aligned(24, 128).is_err());
    assert!(allocate_aligned(64, usize::MAX).is_err());
    assert_eq!(live_bytes(), before);
}

#[test]
fn test_aligned_rows_release_everything() {
    let xs: Vec<f32> = (0..257u16).map(|i| f32::from(i) * 0.1).collect();
    prime();
    let before = live_bytes();
    for _ in 0..100 {
        let row = coherent_noise_row_aligned(&xs, 0.5, 0.5, 42, Quality::Best, None, 64)
            .expect("aligned row");
        assert_eq!(row.as_f32_slice().expect("f32 view").len(), xs.len());
    }
    assert_eq!(live_bytes(), before);
}
