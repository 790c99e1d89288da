//! NEON kernel for aarch64 (4 lanes).
//!
//! NEON is part of the aarch64 baseline; `vdivq_f32` gives an IEEE divide,
//! matching the scalar `/` exactly.

#![allow(clippy::wildcard_imports)]

use std::arch::aarch64::*;

use crate::noise::wide::coherent_row_kernel;

type F = float32x4_t;
type I = int32x4_t;

const LANES: usize = 4;

#[target_feature(enable = "neon")]
#[inline]
unsafe fn load(ptr: *const f32) -> F {
    vld1q_f32(ptr)
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn store(ptr: *mut f32, v: F) {
    vst1q_f32(ptr, v);
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn splat(v: f32) -> F {
    vdupq_n_f32(v)
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn add(a: F, b: F) -> F {
    vaddq_f32(a, b)
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn sub(a: F, b: F) -> F {
    vsubq_f32(a, b)
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn mul(a: F, b: F) -> F {
    vmulq_f32(a, b)
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn div(a: F, b: F) -> F {
    vdivq_f32(a, b)
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn lower_corner(x: F) -> I {
    let truncated = vcvtq_s32_f32(x);
    let positive = vcgtq_f32(x, vdupq_n_f32(0.0));
    // all-ones (-1) on lanes that are not strictly positive
    vaddq_s32(truncated, vreinterpretq_s32_u32(vmvnq_u32(positive)))
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn add_one(v: I) -> I {
    vaddq_s32(v, vdupq_n_s32(1))
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn to_float(v: I) -> F {
    vcvtq_f32_s32(v)
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn hash_axis(x: F) -> I {
    let bits = vreinterpretq_s32_f32(x);
    veorq_s32(bits, vshrq_n_s32::<16>(bits))
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn splat_i32(v: i32) -> I {
    vdupq_n_s32(v)
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn xor_i32(a: I, b: I) -> I {
    veorq_s32(a, b)
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn mul_i32(a: I, b: I) -> I {
    vmulq_s32(a, b)
}

coherent_row_kernel!(#[target_feature(enable = "neon")] coherent_row_neon);
