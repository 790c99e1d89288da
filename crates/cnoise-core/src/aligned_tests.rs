#![allow(clippy::cast_possible_truncation)]
//! Tests for `aligned` module.

use crate::aligned::{allocate_aligned, allocate_aligned_f32, free_aligned, AlignedBuffer};
use crate::error::Error;

const SIZES: [usize; 7] = [0, 1, 7, 64, 1000, 4096, 1 << 20];

#[test]
fn test_allocate_aligned_address_is_multiple_of_alignment() {
    for alignment in [16, 32, 64] {
        for size in SIZES {
            let buf = allocate_aligned(alignment, size).expect("allocation");
            assert_eq!(
                buf.as_ptr() as usize % alignment,
                0,
                "alignment {alignment}, size {size}"
            );
            assert_eq!(buf.len(), size);
            assert_eq!(buf.alignment(), alignment);
            free_aligned(buf);
        }
    }
}

#[test]
fn test_allocate_aligned_small_alignments_below_pointer_width() {
    for alignment in [1, 2, 4] {
        let buf = allocate_aligned(alignment, 33).expect("allocation");
        assert_eq!(buf.as_ptr() as usize % alignment, 0);
        free_aligned(buf);
    }
}

#[test]
fn test_allocate_aligned_large_alignment() {
    let buf = allocate_aligned(4096, 100).expect("allocation");
    assert_eq!(buf.as_ptr() as usize % 4096, 0);
}

#[test]
fn test_invalid_alignment_rejected() {
    for alignment in [0, 3, 24, 48, 1000] {
        let err = allocate_aligned(alignment, 16).unwrap_err();
        assert_eq!(err, Error::InvalidAlignment(alignment));
    }
}

#[test]
fn test_oversized_request_is_allocation_error() {
    let err = allocate_aligned(64, usize::MAX - 8).unwrap_err();
    assert_eq!(
        err,
        Error::Allocation {
            size: usize::MAX - 8,
            alignment: 64
        }
    );
}

#[test]
fn test_buffer_is_zeroed_and_writable() {
    let mut buf = allocate_aligned(32, 256).expect("allocation");
    assert!(buf.as_slice().iter().all(|&b| b == 0));
    for (i, byte) in buf.as_mut_slice().iter_mut().enumerate() {
        *byte = (i % 251) as u8;
    }
    assert_eq!(buf.as_slice()[250], 250);
    assert_eq!(buf.as_slice()[127], 127);
    assert_eq!(buf.as_slice()[255], 4);
}

#[test]
fn test_live_buffers_do_not_alias() {
    let mut a = allocate_aligned(64, 256).expect("allocation");
    let mut b = allocate_aligned(64, 256).expect("allocation");
    a.as_mut_slice().fill(0xAA);
    b.as_mut_slice().fill(0x55);
    assert!(a.as_slice().iter().all(|&v| v == 0xAA));
    assert!(b.as_slice().iter().all(|&v| v == 0x55));

    let (a_start, a_end) = (a.as_ptr() as usize, a.as_ptr() as usize + a.len());
    let b_start = b.as_ptr() as usize;
    assert!(b_start >= a_end || b_start + b.len() <= a_start);
}

#[test]
fn test_f32_view_length() {
    let mut buf = allocate_aligned_f32(64, 37).expect("allocation");
    assert_eq!(buf.len(), 37 * 4);
    let view = buf.as_f32_slice_mut().expect("f32 view");
    assert_eq!(view.len(), 37);
    view[36] = 1.5;
    assert_eq!(buf.as_f32_slice().expect("f32 view")[36], 1.5);
}

#[test]
fn test_f32_view_unavailable_below_f32_alignment() {
    let buf = allocate_aligned(2, 16).expect("allocation");
    assert!(buf.as_f32_slice().is_none());
    assert_eq!(
        allocate_aligned_f32(2, 4).unwrap_err(),
        Error::InvalidAlignment(2)
    );
}

#[test]
fn test_empty_buffer() {
    let buf = allocate_aligned(16, 0).expect("allocation");
    assert!(buf.is_empty());
    assert!(buf.as_slice().is_empty());
    assert_eq!(buf.as_ptr() as usize % 16, 0);
}

#[test]
fn test_buffer_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AlignedBuffer>();
}

#[test]
fn test_buffer_debug_impl() {
    let buf = allocate_aligned(32, 10).expect("allocation");
    let debug = format!("{buf:?}");
    assert!(debug.contains("AlignedBuffer"));
    assert!(debug.contains("alignment: 32"));
}

#[test]
fn test_repeated_allocate_free_cycles() {
    for i in 0..1000 {
        let alignment = 16 << (i % 3);
        let buf = allocate_aligned(alignment, i * 3).expect("allocation");
        assert_eq!(buf.as_ptr() as usize % alignment, 0);
        free_aligned(buf);
    }
}
