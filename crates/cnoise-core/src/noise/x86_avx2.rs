//! AVX2 kernel for x86_64 (8 lanes, native 256-bit integer ops).

#![allow(clippy::wildcard_imports)]

use std::arch::x86_64::*;

use crate::noise::wide::coherent_row_kernel;

type F = __m256;
type I = __m256i;

const LANES: usize = 8;

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn load(ptr: *const f32) -> F {
    _mm256_loadu_ps(ptr)
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn store(ptr: *mut f32, v: F) {
    _mm256_storeu_ps(ptr, v);
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn splat(v: f32) -> F {
    _mm256_set1_ps(v)
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn add(a: F, b: F) -> F {
    _mm256_add_ps(a, b)
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn sub(a: F, b: F) -> F {
    _mm256_sub_ps(a, b)
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn mul(a: F, b: F) -> F {
    _mm256_mul_ps(a, b)
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn div(a: F, b: F) -> F {
    _mm256_div_ps(a, b)
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn lower_corner(x: F) -> I {
    let truncated = _mm256_cvttps_epi32(x);
    let positive = _mm256_castps_si256(_mm256_cmp_ps(x, _mm256_setzero_ps(), _CMP_GT_OQ));
    _mm256_add_epi32(
        truncated,
        _mm256_andnot_si256(positive, _mm256_set1_epi32(-1)),
    )
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn add_one(v: I) -> I {
    _mm256_add_epi32(v, _mm256_set1_epi32(1))
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn to_float(v: I) -> F {
    _mm256_cvtepi32_ps(v)
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn hash_axis(x: F) -> I {
    let bits = _mm256_castps_si256(x);
    _mm256_xor_si256(bits, _mm256_srai_epi32(bits, 16))
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn splat_i32(v: i32) -> I {
    _mm256_set1_epi32(v)
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn xor_i32(a: I, b: I) -> I {
    _mm256_xor_si256(a, b)
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn mul_i32(a: I, b: I) -> I {
    _mm256_mullo_epi32(a, b)
}

coherent_row_kernel!(#[target_feature(enable = "avx2")] coherent_row_avx2);
