//! Runtime kernel selection and row sampling.
//!
//! This module provides:
//! - [`NoiseEngine`], a tier resolved once into a cached kernel function pointer
//! - [`sample_row`], one-shot row sampling on an explicit tier
//! - [`warmup`], which touches detection and every usable kernel

use std::fmt;

use crate::aligned::{allocate_aligned_f32, AlignedBuffer};
use crate::cpu::{detect_tier, supported_tiers, supports, InstructionTier};
use crate::error::{Error, Result};
use crate::interp::Quality;

use super::scalar::{gradient_coherent_noise_3d, RowContext};

/// Signature shared by every wide row kernel.
type RowKernelFn = unsafe fn(&[f32], &mut [f32], &RowContext);

// =============================================================================
// Kernel Table
// =============================================================================

/// Wide kernel for `tier`, or `None` when the tier runs scalar code only.
///
/// Callers must have checked `supports(tier)` before invoking the result.
fn kernel_for(tier: InstructionTier) -> Option<RowKernelFn> {
    match tier {
        #[cfg(target_arch = "x86_64")]
        InstructionTier::Sse2 => Some(super::coherent_row_sse2),
        #[cfg(target_arch = "x86_64")]
        InstructionTier::Sse41 => Some(super::coherent_row_sse41),
        #[cfg(target_arch = "x86_64")]
        InstructionTier::Avx => Some(super::coherent_row_avx),
        #[cfg(target_arch = "x86_64")]
        InstructionTier::Avx2 => Some(super::coherent_row_avx2),
        #[cfg(target_arch = "x86_64")]
        InstructionTier::Avx512 => Some(super::coherent_row_avx512),
        #[cfg(target_arch = "aarch64")]
        InstructionTier::Neon => Some(super::coherent_row_neon),
        _ => None,
    }
}

// =============================================================================
// NoiseEngine
// =============================================================================

/// Coherent noise sampler bound to one instruction tier.
///
/// The kernel is resolved at construction, so sampling does no detection
/// and no branching on the tier. Engines are `Copy` and can be shared
/// freely between threads.
#[derive(Clone, Copy)]
pub struct NoiseEngine {
    tier: InstructionTier,
    kernel: Option<RowKernelFn>,
}

impl fmt::Debug for NoiseEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseEngine")
            .field("tier", &self.tier)
            .field("lanes", &self.tier.lanes())
            .finish_non_exhaustive()
    }
}

impl NoiseEngine {
    /// Creates an engine for `tier`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedTier`] if this host cannot execute `tier`.
    pub fn new(tier: InstructionTier) -> Result<Self> {
        if !supports(tier) {
            tracing::warn!(%tier, "requested instruction tier is not supported on this host");
            return Err(Error::UnsupportedTier(tier));
        }
        tracing::debug!(%tier, lanes = tier.lanes(), "noise engine resolved");
        Ok(Self {
            tier,
            kernel: kernel_for(tier),
        })
    }

    /// Creates an engine for the best tier of this host.
    #[must_use]
    pub fn detected() -> Self {
        let tier = detect_tier();
        Self {
            tier,
            kernel: kernel_for(tier),
        }
    }

    /// Tier this engine executes.
    #[must_use]
    pub fn tier(&self) -> InstructionTier {
        self.tier
    }

    /// Samples processed per kernel step.
    #[must_use]
    pub fn lanes(&self) -> usize {
        self.tier.lanes()
    }

    /// Samples one point. Always uses the scalar kernel.
    #[must_use]
    pub fn sample(&self, x: f32, y: f32, z: f32, seed: i32, quality: Quality) -> f32 {
        gradient_coherent_noise_3d(x, y, z, seed, quality)
    }

    /// Samples `(xs[i], y, z)` into `out[i]` for every `i`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] if `out.len() != xs.len()`.
    pub fn sample_row_into(
        &self,
        xs: &[f32],
        out: &mut [f32],
        y: f32,
        z: f32,
        seed: i32,
        quality: Quality,
    ) -> Result<()> {
        if xs.len() != out.len() {
            return Err(Error::LengthMismatch {
                expected: xs.len(),
                actual: out.len(),
            });
        }

        self.fill_row(xs, out, y, z, seed, quality);
        Ok(())
    }

    /// Samples a row into a new vector.
    #[must_use]
    pub fn sample_row(&self, xs: &[f32], y: f32, z: f32, seed: i32, quality: Quality) -> Vec<f32> {
        let mut out = vec![0.0; xs.len()];
        self.fill_row(xs, &mut out, y, z, seed, quality);
        out
    }

    /// Wide chunks first, then the scalar tail. Requires `xs.len() == out.len()`.
    fn fill_row(&self, xs: &[f32], out: &mut [f32], y: f32, z: f32, seed: i32, quality: Quality) {
        debug_assert_eq!(xs.len(), out.len());
        let done = match self.kernel {
            Some(kernel) => {
                let row = RowContext::new(y, z, seed, quality);
                // SAFETY: Kernel was resolved for a tier this host supports.
                // - Condition 1: `kernel` is only set by `new`/`detected` after `supports(tier)`
                //   or `detect_tier()` confirmed the instruction set.
                // - Condition 2: `xs.len() == out.len()` is required of every caller.
                // Reason: Target-featured kernels are unsafe to call without a runtime check.
                unsafe { kernel(xs, out, &row) };
                xs.len() - xs.len() % self.lanes()
            }
            None => 0,
        };

        for (x, slot) in xs[done..].iter().zip(&mut out[done..]) {
            *slot = gradient_coherent_noise_3d(*x, y, z, seed, quality);
        }
    }

    /// Samples a row into a new buffer whose data pointer is `alignment`-aligned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAlignment`] or [`Error::Allocation`] if the
    /// buffer cannot be created.
    pub fn sample_row_aligned(
        &self,
        xs: &[f32],
        y: f32,
        z: f32,
        seed: i32,
        quality: Quality,
        alignment: usize,
    ) -> Result<AlignedBuffer> {
        let mut buffer = allocate_aligned_f32(alignment, xs.len())?;
        let out = buffer
            .as_f32_slice_mut()
            .ok_or(Error::InvalidAlignment(alignment))?;
        self.sample_row_into(xs, out, y, z, seed, quality)?;
        Ok(buffer)
    }
}

impl Default for NoiseEngine {
    fn default() -> Self {
        Self::detected()
    }
}

// =============================================================================
// One-shot API
// =============================================================================

/// Samples `(xs[i], y, z)` for every `i` on an explicit tier.
///
/// # Errors
///
/// Returns [`Error::UnsupportedTier`] if this host cannot execute `tier`.
pub fn sample_row(
    xs: &[f32],
    y: f32,
    z: f32,
    seed: i32,
    quality: Quality,
    tier: InstructionTier,
) -> Result<Vec<f32>> {
    Ok(NoiseEngine::new(tier)?.sample_row(xs, y, z, seed, quality))
}

/// Runs detection and every supported kernel once.
///
/// Call at startup so the first real row does not pay for CPUID probing
/// or cold instruction caches.
pub fn warmup() {
    let xs: Vec<f32> = (0..64u8).map(|i| f32::from(i) * 0.37 - 11.0).collect();
    for tier in supported_tiers() {
        if let Ok(engine) = NoiseEngine::new(tier) {
            for quality in Quality::ALL {
                let _ = engine.sample_row(&xs, 0.5, -2.25, 0, quality);
            }
        }
    }
    tracing::debug!(tier = %detect_tier(), "noise kernels warmed up");
}
