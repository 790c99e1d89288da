//! Scalar reference noise kernel.
//!
//! These functions define correctness: every wide kernel must reproduce
//! [`gradient_coherent_noise_3d`] bit for bit on each lane. They also serve
//! as the `Fallback` tier and as the tail handler for rows whose length is
//! not a multiple of the lane width.

// Integer/float conversions are the algorithm: lattice corners are truncated
// floats and hashed integers are rescaled to [-1, 1).
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::similar_names)]

use crate::interp::{linear_interp, Quality};

/// Hash multiplier for the x axis.
pub const X_NOISE_GEN: i32 = 1619;
/// Hash multiplier for the y axis.
pub const Y_NOISE_GEN: i32 = 31337;
/// Hash multiplier for the z axis.
pub const Z_NOISE_GEN: i32 = 6971;
/// Hash multiplier for the seed (lattice value noise only).
pub const SEED_NOISE_GEN: i32 = 1013;

/// Multiplier applied to the cubed gradient hash.
pub(crate) const GRADIENT_HASH_MUL: i32 = 60493;
/// `2^31`: maps the gradient hash onto [-1, 1).
pub(crate) const GRADIENT_NORM: f32 = 2_147_483_648.0;
/// Empirical output normalization of the gradient dot product.
pub(crate) const GRADIENT_SCALE: f32 = 2.12;

/// Lower lattice corner on one axis.
///
/// Truncates positive values and steps non-positive values one further
/// down, so integer coordinates `<= 0` land on the corner below themselves.
#[inline]
pub(crate) fn lower_corner(v: f32) -> i32 {
    let truncated = v as i32;
    if v > 0.0 {
        truncated
    } else {
        truncated.wrapping_sub(1)
    }
}

/// Folds the high half-word of a coordinate's bit pattern into the low one.
#[inline]
pub(crate) fn axis_hash(v: f32) -> i32 {
    let bits = v.to_bits() as i32;
    bits ^ (bits >> 16)
}

/// One component of the pseudo-random gradient, in [-1, 1).
#[inline]
pub(crate) fn axis_gradient(v: f32, generator: i32, seed: i32) -> f32 {
    let r = seed ^ generator.wrapping_mul(axis_hash(v));
    let cubed = r
        .wrapping_mul(r)
        .wrapping_mul(r)
        .wrapping_mul(GRADIENT_HASH_MUL);
    cubed as f32 / GRADIENT_NORM
}

/// Integer lattice hash in `[0, 2^31)`.
#[must_use]
pub fn int_value_noise_3d(x: i32, y: i32, z: i32, seed: i32) -> i32 {
    let n = X_NOISE_GEN
        .wrapping_mul(x)
        .wrapping_add(Y_NOISE_GEN.wrapping_mul(y))
        .wrapping_add(Z_NOISE_GEN.wrapping_mul(z))
        .wrapping_add(SEED_NOISE_GEN.wrapping_mul(seed))
        & 0x7fff_ffff;
    let n = (n >> 13) ^ n;
    n.wrapping_mul(n.wrapping_mul(n).wrapping_mul(60493).wrapping_add(19_990_303))
        .wrapping_add(1_376_312_589)
        & 0x7fff_ffff
}

/// Pseudo-random value in (-1, 1] at an integer lattice point.
#[must_use]
pub fn value_noise_3d(x: i32, y: i32, z: i32, seed: i32) -> f32 {
    1.0 - (int_value_noise_3d(x, y, z, seed) as f32 / 1_073_741_824.0)
}

/// Gradient contribution of lattice point `(ix, iy, iz)` at sample `(fx, fy, fz)`.
///
/// The gradient is hashed from the bit patterns of the sample coordinates
/// and the seed; the result is its dot product with the offset from the
/// lattice point, scaled by 2.12.
#[must_use]
pub fn gradient_noise_3d(fx: f32, fy: f32, fz: f32, ix: i32, iy: i32, iz: i32, seed: i32) -> f32 {
    let xv_gradient = axis_gradient(fx, X_NOISE_GEN, seed);
    let yv_gradient = axis_gradient(fy, Y_NOISE_GEN, seed);
    let zv_gradient = axis_gradient(fz, Z_NOISE_GEN, seed);

    let xv_point = fx - ix as f32;
    let yv_point = fy - iy as f32;
    let zv_point = fz - iz as f32;

    (xv_gradient * xv_point + yv_gradient * yv_point + zv_gradient * zv_point) * GRADIENT_SCALE
}

/// Coherent gradient noise at `(x, y, z)`.
///
/// Coordinates are expected within `±2^31`; fold larger ones with
/// [`crate::interp::make_int32_range`] first.
#[must_use]
pub fn gradient_coherent_noise_3d(x: f32, y: f32, z: f32, seed: i32, quality: Quality) -> f32 {
    let x0 = lower_corner(x);
    let x1 = x0.wrapping_add(1);
    let y0 = lower_corner(y);
    let y1 = y0.wrapping_add(1);
    let z0 = lower_corner(z);
    let z1 = z0.wrapping_add(1);

    let xs = quality.smooth(x - x0 as f32);
    let ys = quality.smooth(y - y0 as f32);
    let zs = quality.smooth(z - z0 as f32);

    let n0 = gradient_noise_3d(x, y, z, x0, y0, z0, seed);
    let n1 = gradient_noise_3d(x, y, z, x1, y0, z0, seed);
    let ix0 = linear_interp(n0, n1, xs);
    let n0 = gradient_noise_3d(x, y, z, x0, y1, z0, seed);
    let n1 = gradient_noise_3d(x, y, z, x1, y1, z0, seed);
    let ix1 = linear_interp(n0, n1, xs);
    let iy0 = linear_interp(ix0, ix1, ys);

    let n0 = gradient_noise_3d(x, y, z, x0, y0, z1, seed);
    let n1 = gradient_noise_3d(x, y, z, x1, y0, z1, seed);
    let ix0 = linear_interp(n0, n1, xs);
    let n0 = gradient_noise_3d(x, y, z, x0, y1, z1, seed);
    let n1 = gradient_noise_3d(x, y, z, x1, y1, z1, seed);
    let ix1 = linear_interp(n0, n1, xs);
    let iy1 = linear_interp(ix0, ix1, ys);

    linear_interp(iy0, iy1, zs)
}

/// Per-row scalar state shared by every lane of a wide kernel.
///
/// Holds the y/z half of the computation, which is identical for all
/// samples of a row: smoothed offsets and the `g·offset` terms for both
/// corners on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RowContext {
    pub(crate) seed: i32,
    pub(crate) quality: Quality,
    pub(crate) ys: f32,
    pub(crate) zs: f32,
    /// `g_y·(y − y0)`, `g_y·(y − y1)`.
    pub(crate) y_terms: [f32; 2],
    /// `g_z·(z − z0)`, `g_z·(z − z1)`.
    pub(crate) z_terms: [f32; 2],
}

impl RowContext {
    pub(crate) fn new(y: f32, z: f32, seed: i32, quality: Quality) -> Self {
        let y0 = lower_corner(y);
        let y1 = y0.wrapping_add(1);
        let z0 = lower_corner(z);
        let z1 = z0.wrapping_add(1);

        let yv_gradient = axis_gradient(y, Y_NOISE_GEN, seed);
        let zv_gradient = axis_gradient(z, Z_NOISE_GEN, seed);

        Self {
            seed,
            quality,
            ys: quality.smooth(y - y0 as f32),
            zs: quality.smooth(z - z0 as f32),
            y_terms: [
                yv_gradient * (y - y0 as f32),
                yv_gradient * (y - y1 as f32),
            ],
            z_terms: [
                zv_gradient * (z - z0 as f32),
                zv_gradient * (z - z1 as f32),
            ],
        }
    }
}
