//! Aligned buffers for vector-friendly noise output.
//!
//! A thin one-shot wrapper around the host allocator: the usable region
//! starts at a multiple of the requested power-of-two alignment and the
//! address of the real allocation is stored in a hidden pointer-sized header
//! immediately before it. The handle additionally keeps an explicit
//! `{raw, aligned, layout}` record so that release never depends on offset
//! arithmetic alone.
//!
//! # Usage
//!
//! ```rust
//! use cnoise_core::aligned::{allocate_aligned_f32, free_aligned};
//!
//! let mut buf = allocate_aligned_f32(32, 256)?;
//! assert_eq!(buf.as_ptr() as usize % 32, 0);
//! buf.as_f32_slice_mut().expect("f32-aligned")[0] = 1.0;
//! free_aligned(buf);
//! # Ok::<(), cnoise_core::Error>(())
//! ```

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::fmt;
use std::mem::{align_of, size_of};
use std::ptr::NonNull;

use crate::error::{Error, Result};

/// Size of the hidden back-pointer stored before the aligned region.
const HEADER_BYTES: usize = size_of::<*mut u8>();

/// Owned, aligned, zero-initialised memory region.
///
/// Released exactly once, either through [`free_aligned`] or on drop.
pub struct AlignedBuffer {
    raw: NonNull<u8>,
    aligned: NonNull<u8>,
    layout: Layout,
    len: usize,
    alignment: usize,
}

/// Allocates `size` usable bytes whose start address is a multiple of `alignment`.
///
/// # Errors
///
/// - [`Error::InvalidAlignment`] if `alignment` is zero or not a power of two
///   (checked before any allocation is attempted).
/// - [`Error::Allocation`] if the host allocator is exhausted or the padded
///   size overflows `isize`.
pub fn allocate_aligned(alignment: usize, size: usize) -> Result<AlignedBuffer> {
    if !alignment.is_power_of_two() {
        return Err(Error::InvalidAlignment(alignment));
    }
    let alloc_err = || Error::Allocation { size, alignment };

    let total = size
        .checked_add(alignment)
        .and_then(|n| n.checked_add(HEADER_BYTES))
        .ok_or_else(alloc_err)?;
    let layout =
        Layout::from_size_align(total, align_of::<*mut u8>()).map_err(|_| alloc_err())?;

    // SAFETY: `alloc_zeroed` requires a non-zero-sized layout.
    // - Condition 1: `total >= HEADER_BYTES + 1 > 0`.
    // - Condition 2: `layout` was validated by `Layout::from_size_align`.
    // Reason: the header trick needs a raw allocation we can offset into.
    let raw = NonNull::new(unsafe { alloc_zeroed(layout) }).ok_or_else(alloc_err)?;

    let addr = raw.as_ptr() as usize;
    let aligned_addr = (addr + alignment + HEADER_BYTES) & !(alignment - 1);
    let offset = aligned_addr - addr;
    debug_assert!(offset > HEADER_BYTES && offset <= alignment + HEADER_BYTES);

    // SAFETY: `offset + size <= total`, so the aligned region and the header
    // word before it (`offset - HEADER_BYTES >= 1`) lie inside the allocation.
    // The header may be under-aligned for alignments below pointer width,
    // hence the unaligned write.
    let aligned = unsafe {
        let aligned = raw.as_ptr().add(offset);
        aligned
            .sub(HEADER_BYTES)
            .cast::<*mut u8>()
            .write_unaligned(raw.as_ptr());
        NonNull::new_unchecked(aligned)
    };

    tracing::trace!(size, alignment, total, "aligned buffer allocated");

    Ok(AlignedBuffer {
        raw,
        aligned,
        layout,
        len: size,
        alignment,
    })
}

/// Allocates a zeroed buffer of `count` `f32` values aligned to `alignment`.
///
/// # Errors
///
/// [`Error::InvalidAlignment`] if `alignment` is not a power of two or is
/// smaller than `align_of::<f32>()`; [`Error::Allocation`] on exhaustion.
pub fn allocate_aligned_f32(alignment: usize, count: usize) -> Result<AlignedBuffer> {
    if alignment < align_of::<f32>() {
        return Err(Error::InvalidAlignment(alignment));
    }
    let size = count
        .checked_mul(size_of::<f32>())
        .ok_or(Error::Allocation { size: usize::MAX, alignment })?;
    allocate_aligned(alignment, size)
}

/// Releases a buffer obtained from [`allocate_aligned`].
///
/// Equivalent to dropping it; provided so call sites can make the release explicit.
pub fn free_aligned(buffer: AlignedBuffer) {
    drop(buffer);
}

impl AlignedBuffer {
    /// Start of the aligned region.
    #[inline]
    #[must_use]
    pub fn as_ptr(&self) -> *const u8 {
        self.aligned.as_ptr()
    }

    /// Mutable start of the aligned region.
    #[inline]
    #[must_use]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.aligned.as_ptr()
    }

    /// Usable size in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the usable region is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Alignment requested at allocation time.
    #[inline]
    #[must_use]
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Byte view of the usable region.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: `aligned..aligned+len` is inside the zero-initialised allocation
        // owned by `self`; the shared borrow prevents concurrent mutation.
        unsafe { std::slice::from_raw_parts(self.aligned.as_ptr(), self.len) }
    }

    /// Mutable byte view of the usable region.
    #[inline]
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as in `as_slice`; `&mut self` guarantees exclusivity.
        unsafe { std::slice::from_raw_parts_mut(self.aligned.as_ptr(), self.len) }
    }

    /// `f32` view of the usable region (trailing bytes beyond a whole `f32` are excluded).
    ///
    /// Returns `None` when the buffer was allocated with an alignment smaller
    /// than `align_of::<f32>()`.
    #[must_use]
    pub fn as_f32_slice(&self) -> Option<&[f32]> {
        if self.alignment < align_of::<f32>() {
            return None;
        }
        // SAFETY: the start is f32-aligned (checked above), the region is
        // initialised (zeroed at allocation, every bit pattern is a valid f32)
        // and `len / 4` elements fit in `len` bytes.
        Some(unsafe {
            std::slice::from_raw_parts(
                self.aligned.as_ptr().cast::<f32>(),
                self.len / size_of::<f32>(),
            )
        })
    }

    /// Mutable `f32` view of the usable region. See [`AlignedBuffer::as_f32_slice`].
    #[must_use]
    pub fn as_f32_slice_mut(&mut self) -> Option<&mut [f32]> {
        if self.alignment < align_of::<f32>() {
            return None;
        }
        // SAFETY: as in `as_f32_slice`; `&mut self` guarantees exclusivity.
        Some(unsafe {
            std::slice::from_raw_parts_mut(
                self.aligned.as_ptr().cast::<f32>(),
                self.len / size_of::<f32>(),
            )
        })
    }

    /// Reads the hidden back-pointer stored before the aligned region.
    fn header(&self) -> *mut u8 {
        // SAFETY: `allocate_aligned` wrote a pointer at `aligned - HEADER_BYTES`,
        // which lies inside the allocation; the read tolerates under-alignment.
        unsafe {
            self.aligned
                .as_ptr()
                .sub(HEADER_BYTES)
                .cast::<*mut u8>()
                .read_unaligned()
        }
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        let raw = self.header();
        debug_assert_eq!(raw, self.raw.as_ptr(), "aligned buffer header corrupted");
        // SAFETY: `dealloc` requires the original pointer/layout pair.
        // - Condition 1: `raw` is the pointer returned by `alloc_zeroed(self.layout)`.
        // - Condition 2: `Drop` runs at most once for an owned buffer.
        unsafe {
            dealloc(raw, self.layout);
        }
    }
}

impl fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("ptr", &self.aligned)
            .field("len", &self.len)
            .field("alignment", &self.alignment)
            .finish()
    }
}

// SAFETY: `AlignedBuffer` owns its allocation exclusively.
// - Condition 1: no aliasing references are stored, only pointers into memory it owns.
// - Condition 2: mutation requires `&mut self`.
// Reason: heap allocations are not thread-affine; moving ownership across threads is sound.
unsafe impl Send for AlignedBuffer {}

// SAFETY: `&AlignedBuffer` only exposes shared read-only views (`as_slice`,
// `as_f32_slice`), so concurrent readers cannot race with a writer.
unsafe impl Sync for AlignedBuffer {}
