//! # `cnoise` Core
//!
//! Coherent 3D gradient noise with runtime-dispatched SIMD kernels.
//!
//! Rows of samples along x are evaluated with the widest instruction set the
//! host supports. Every wide kernel is bit-identical to the scalar reference,
//! so results never depend on the machine they were computed on.
//!
//! ## Features
//!
//! - **Runtime dispatch**: SSE2, SSE4.1, AVX, AVX2, AVX-512F and NEON kernels
//!   selected once by CPUID/XGETBV detection
//! - **Bit-exact parity**: every tier reproduces the scalar kernel lane by lane
//! - **Three qualities**: linear, cubic and quintic smoothing
//! - **Aligned buffers**: over-aligned output rows for downstream SIMD consumers
//!
//! ## Quick Start
//!
//! ```rust
//! use cnoise_core::{coherent_noise_3d, coherent_noise_row, detect_tier, Quality};
//!
//! fn main() -> Result<(), cnoise_core::Error> {
//!     println!("running on {}", detect_tier());
//!
//!     let point = coherent_noise_3d(0.3, 1.7, -2.2, 42, Quality::Best);
//!
//!     let xs: Vec<f32> = (0..64).map(|i| i as f32 * 0.25).collect();
//!     let row = coherent_noise_row(&xs, 1.7, -2.2, 42, Quality::Best, None)?;
//!     assert_eq!(row.len(), xs.len());
//!     assert!((-1.0..=1.0).contains(&point));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
// Clippy lints configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(
    test,
    allow(
        clippy::doc_markdown,
        clippy::uninlined_format_args,
        clippy::cast_lossless,
        clippy::manual_assert
    )
)]

pub mod aligned;
pub mod config;
pub mod cpu;
pub mod error;
pub mod interp;
pub mod noise;

#[cfg(test)]
mod aligned_tests;
#[cfg(test)]
mod config_tests;

pub use aligned::{allocate_aligned, allocate_aligned_f32, free_aligned, AlignedBuffer};
pub use config::NoiseConfig;
pub use cpu::{detect_tier, supported_tiers, supports, CpuFeatures, InstructionTier};
pub use error::{Error, Result};
pub use interp::{
    cubic_interp, linear_interp, make_int32_range, make_int32_range_slice, s_curve3, s_curve5,
    Quality,
};
pub use noise::{
    gradient_coherent_noise_3d, gradient_noise_3d, int_value_noise_3d, sample_row,
    value_noise_3d, warmup, NoiseEngine,
};

/// Resolves the engine for an optional tier override.
fn engine_for(tier_override: Option<InstructionTier>) -> Result<NoiseEngine> {
    match tier_override {
        Some(tier) => NoiseEngine::new(tier),
        None => Ok(NoiseEngine::detected()),
    }
}

/// Coherent noise at one point, computed by the scalar kernel.
#[must_use]
pub fn coherent_noise_3d(x: f32, y: f32, z: f32, seed: i32, quality: Quality) -> f32 {
    gradient_coherent_noise_3d(x, y, z, seed, quality)
}

/// Coherent noise at `(xs[i], y, z)` for every `i`.
///
/// `tier_override` forces an instruction tier; `None` uses the detected one.
///
/// # Errors
///
/// Returns [`Error::UnsupportedTier`] if the forced tier cannot run on this host.
pub fn coherent_noise_row(
    xs: &[f32],
    y: f32,
    z: f32,
    seed: i32,
    quality: Quality,
    tier_override: Option<InstructionTier>,
) -> Result<Vec<f32>> {
    Ok(engine_for(tier_override)?.sample_row(xs, y, z, seed, quality))
}

/// Like [`coherent_noise_row`], writing into a caller-provided slice.
///
/// # Errors
///
/// Returns [`Error::UnsupportedTier`] for an unusable forced tier and
/// [`Error::LengthMismatch`] if `out.len() != xs.len()`.
pub fn coherent_noise_row_into(
    xs: &[f32],
    out: &mut [f32],
    y: f32,
    z: f32,
    seed: i32,
    quality: Quality,
    tier_override: Option<InstructionTier>,
) -> Result<()> {
    engine_for(tier_override)?.sample_row_into(xs, out, y, z, seed, quality)
}

/// Like [`coherent_noise_row`], returning a buffer aligned to `alignment` bytes.
///
/// # Errors
///
/// Returns [`Error::UnsupportedTier`], [`Error::InvalidAlignment`] or
/// [`Error::Allocation`].
pub fn coherent_noise_row_aligned(
    xs: &[f32],
    y: f32,
    z: f32,
    seed: i32,
    quality: Quality,
    tier_override: Option<InstructionTier>,
    alignment: usize,
) -> Result<AlignedBuffer> {
    engine_for(tier_override)?.sample_row_aligned(xs, y, z, seed, quality, alignment)
}
