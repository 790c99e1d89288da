//! 128-bit SSE kernels for x86_64 (4 lanes).
//!
//! SSE2 has no 32-bit low multiply, so the `Sse2` tier synthesizes it from
//! two `_mm_mul_epu32` products. `Sse41` uses `_mm_mullo_epi32` directly.
//! Everything else is shared.

#![allow(clippy::wildcard_imports)]

use std::arch::x86_64::*;

type F = __m128;
type I = __m128i;

const LANES: usize = 4;

// =============================================================================
// Shared Primitives
// =============================================================================

#[target_feature(enable = "sse2")]
#[inline]
unsafe fn load(ptr: *const f32) -> F {
    _mm_loadu_ps(ptr)
}

#[target_feature(enable = "sse2")]
#[inline]
unsafe fn store(ptr: *mut f32, v: F) {
    _mm_storeu_ps(ptr, v);
}

#[target_feature(enable = "sse2")]
#[inline]
unsafe fn splat(v: f32) -> F {
    _mm_set1_ps(v)
}

#[target_feature(enable = "sse2")]
#[inline]
unsafe fn add(a: F, b: F) -> F {
    _mm_add_ps(a, b)
}

#[target_feature(enable = "sse2")]
#[inline]
unsafe fn sub(a: F, b: F) -> F {
    _mm_sub_ps(a, b)
}

#[target_feature(enable = "sse2")]
#[inline]
unsafe fn mul(a: F, b: F) -> F {
    _mm_mul_ps(a, b)
}

#[target_feature(enable = "sse2")]
#[inline]
unsafe fn div(a: F, b: F) -> F {
    _mm_div_ps(a, b)
}

/// `trunc(x)` where `x > 0`, `trunc(x) - 1` elsewhere.
#[target_feature(enable = "sse2")]
#[inline]
unsafe fn lower_corner(x: F) -> I {
    let truncated = _mm_cvttps_epi32(x);
    let positive = _mm_castps_si128(_mm_cmpgt_ps(x, _mm_setzero_ps()));
    // -1 on lanes that are not strictly positive
    _mm_add_epi32(truncated, _mm_andnot_si128(positive, _mm_set1_epi32(-1)))
}

#[target_feature(enable = "sse2")]
#[inline]
unsafe fn add_one(v: I) -> I {
    _mm_add_epi32(v, _mm_set1_epi32(1))
}

#[target_feature(enable = "sse2")]
#[inline]
unsafe fn to_float(v: I) -> F {
    _mm_cvtepi32_ps(v)
}

#[target_feature(enable = "sse2")]
#[inline]
unsafe fn hash_axis(x: F) -> I {
    let bits = _mm_castps_si128(x);
    _mm_xor_si128(bits, _mm_srai_epi32(bits, 16))
}

#[target_feature(enable = "sse2")]
#[inline]
unsafe fn splat_i32(v: i32) -> I {
    _mm_set1_epi32(v)
}

#[target_feature(enable = "sse2")]
#[inline]
unsafe fn xor_i32(a: I, b: I) -> I {
    _mm_xor_si128(a, b)
}

/// Wrapping 32-bit low multiply built from two 32x32->64 unsigned products.
///
/// The low 32 bits of a product are the same for signed and unsigned
/// operands, so `_mm_mul_epu32` on even and odd lanes gives every result.
#[target_feature(enable = "sse2")]
#[inline]
unsafe fn mul_i32_sse2(a: I, b: I) -> I {
    let even = _mm_mul_epu32(a, b);
    let odd = _mm_mul_epu32(_mm_srli_epi64(a, 32), _mm_srli_epi64(b, 32));
    // Gather the low dword of each 64-bit product: lanes [0, 2] of each.
    let even_lo = _mm_shuffle_epi32(even, 0x08);
    let odd_lo = _mm_shuffle_epi32(odd, 0x08);
    _mm_unpacklo_epi32(even_lo, odd_lo)
}

#[target_feature(enable = "sse4.1")]
#[inline]
unsafe fn mul_i32_sse41(a: I, b: I) -> I {
    _mm_mullo_epi32(a, b)
}

// =============================================================================
// Kernels
// =============================================================================

pub(crate) mod sse2 {
    use super::mul_i32_sse2 as mul_i32;
    use super::*;
    use crate::noise::wide::coherent_row_kernel;

    coherent_row_kernel!(#[target_feature(enable = "sse2")] coherent_row_sse2);
}

pub(crate) mod sse41 {
    use super::mul_i32_sse41 as mul_i32;
    use super::*;
    use crate::noise::wide::coherent_row_kernel;

    coherent_row_kernel!(#[target_feature(enable = "sse4.1")] coherent_row_sse41);
}
