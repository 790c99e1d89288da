//! AVX kernel for x86_64 (8 lanes, float math only).
//!
//! AVX has 256-bit float arithmetic but no 256-bit integer arithmetic. Float
//! steps run on full `__m256` registers; integer steps split each register
//! into its low and high 128-bit halves, run the SSE4.1 operation on each,
//! and merge them back with `lo` in lanes 0..4.

#![allow(clippy::wildcard_imports)]

use std::arch::x86_64::*;

use crate::noise::wide::coherent_row_kernel;

type F = __m256;
type I = __m256i;

const LANES: usize = 8;

// =============================================================================
// Half-Register Helpers
// =============================================================================

#[target_feature(enable = "avx")]
#[inline]
unsafe fn split(v: I) -> (__m128i, __m128i) {
    (_mm256_castsi256_si128(v), _mm256_extractf128_si256(v, 1))
}

#[target_feature(enable = "avx")]
#[inline]
unsafe fn merge(lo: __m128i, hi: __m128i) -> I {
    _mm256_set_m128i(hi, lo)
}

// =============================================================================
// Primitives
// =============================================================================

#[target_feature(enable = "avx")]
#[inline]
unsafe fn load(ptr: *const f32) -> F {
    _mm256_loadu_ps(ptr)
}

#[target_feature(enable = "avx")]
#[inline]
unsafe fn store(ptr: *mut f32, v: F) {
    _mm256_storeu_ps(ptr, v);
}

#[target_feature(enable = "avx")]
#[inline]
unsafe fn splat(v: f32) -> F {
    _mm256_set1_ps(v)
}

#[target_feature(enable = "avx")]
#[inline]
unsafe fn add(a: F, b: F) -> F {
    _mm256_add_ps(a, b)
}

#[target_feature(enable = "avx")]
#[inline]
unsafe fn sub(a: F, b: F) -> F {
    _mm256_sub_ps(a, b)
}

#[target_feature(enable = "avx")]
#[inline]
unsafe fn mul(a: F, b: F) -> F {
    _mm256_mul_ps(a, b)
}

#[target_feature(enable = "avx")]
#[inline]
unsafe fn div(a: F, b: F) -> F {
    _mm256_div_ps(a, b)
}

#[target_feature(enable = "avx")]
#[inline]
unsafe fn lower_corner(x: F) -> I {
    let (t_lo, t_hi) = split(_mm256_cvttps_epi32(x));
    let positive = _mm256_castps_si256(_mm256_cmp_ps(x, _mm256_setzero_ps(), _CMP_GT_OQ));
    let (p_lo, p_hi) = split(positive);
    let minus_one = _mm_set1_epi32(-1);
    merge(
        _mm_add_epi32(t_lo, _mm_andnot_si128(p_lo, minus_one)),
        _mm_add_epi32(t_hi, _mm_andnot_si128(p_hi, minus_one)),
    )
}

#[target_feature(enable = "avx")]
#[inline]
unsafe fn add_one(v: I) -> I {
    let (lo, hi) = split(v);
    let one = _mm_set1_epi32(1);
    merge(_mm_add_epi32(lo, one), _mm_add_epi32(hi, one))
}

#[target_feature(enable = "avx")]
#[inline]
unsafe fn to_float(v: I) -> F {
    _mm256_cvtepi32_ps(v)
}

#[target_feature(enable = "avx")]
#[inline]
unsafe fn hash_axis(x: F) -> I {
    let (lo, hi) = split(_mm256_castps_si256(x));
    merge(
        _mm_xor_si128(lo, _mm_srai_epi32(lo, 16)),
        _mm_xor_si128(hi, _mm_srai_epi32(hi, 16)),
    )
}

#[target_feature(enable = "avx")]
#[inline]
unsafe fn splat_i32(v: i32) -> I {
    _mm256_set1_epi32(v)
}

#[target_feature(enable = "avx")]
#[inline]
unsafe fn xor_i32(a: I, b: I) -> I {
    let (a_lo, a_hi) = split(a);
    let (b_lo, b_hi) = split(b);
    merge(_mm_xor_si128(a_lo, b_lo), _mm_xor_si128(a_hi, b_hi))
}

#[target_feature(enable = "avx")]
#[inline]
unsafe fn mul_i32(a: I, b: I) -> I {
    let (a_lo, a_hi) = split(a);
    let (b_lo, b_hi) = split(b);
    merge(_mm_mullo_epi32(a_lo, b_lo), _mm_mullo_epi32(a_hi, b_hi))
}

// =============================================================================
// Kernel
// =============================================================================

coherent_row_kernel!(#[target_feature(enable = "avx")] coherent_row_avx);
