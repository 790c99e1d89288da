//! AVX-512F kernel for x86_64 (16 lanes).
//!
//! Comparisons produce a `__mmask16` instead of a vector mask, so the lower
//! corner is a masked subtract on the lanes that are not strictly positive.

#![allow(clippy::wildcard_imports)]

use std::arch::x86_64::*;

use crate::noise::wide::coherent_row_kernel;

type F = __m512;
type I = __m512i;

const LANES: usize = 16;

#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn load(ptr: *const f32) -> F {
    _mm512_loadu_ps(ptr)
}

#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn store(ptr: *mut f32, v: F) {
    _mm512_storeu_ps(ptr, v);
}

#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn splat(v: f32) -> F {
    _mm512_set1_ps(v)
}

#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn add(a: F, b: F) -> F {
    _mm512_add_ps(a, b)
}

#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn sub(a: F, b: F) -> F {
    _mm512_sub_ps(a, b)
}

#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn mul(a: F, b: F) -> F {
    _mm512_mul_ps(a, b)
}

#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn div(a: F, b: F) -> F {
    _mm512_div_ps(a, b)
}

#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn lower_corner(x: F) -> I {
    let truncated = _mm512_cvttps_epi32(x);
    let positive: __mmask16 = _mm512_cmp_ps_mask(x, _mm512_setzero_ps(), _CMP_GT_OQ);
    _mm512_mask_sub_epi32(truncated, !positive, truncated, _mm512_set1_epi32(1))
}

#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn add_one(v: I) -> I {
    _mm512_add_epi32(v, _mm512_set1_epi32(1))
}

#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn to_float(v: I) -> F {
    _mm512_cvtepi32_ps(v)
}

#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn hash_axis(x: F) -> I {
    let bits = _mm512_castps_si512(x);
    _mm512_xor_si512(bits, _mm512_srai_epi32(bits, 16))
}

#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn splat_i32(v: i32) -> I {
    _mm512_set1_epi32(v)
}

#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn xor_i32(a: I, b: I) -> I {
    _mm512_xor_si512(a, b)
}

#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn mul_i32(a: I, b: I) -> I {
    _mm512_mullo_epi32(a, b)
}

coherent_row_kernel!(#[target_feature(enable = "avx512f")] coherent_row_avx512);
