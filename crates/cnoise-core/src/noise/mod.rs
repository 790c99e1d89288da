//! Coherent gradient noise kernels.
//!
//! # Module Structure
//!
//! - `scalar`: reference kernel, lattice value noise, per-row context
//! - `wide`: lane-generic row kernel macro
//! - `x86_sse`: SSE2 and SSE4.1 kernels (x86_64 only)
//! - `x86_avx`: AVX kernel with split-half integer ops (x86_64 only)
//! - `x86_avx2`: AVX2 kernel (x86_64 only)
//! - `x86_avx512`: AVX-512F kernel (x86_64 only)
//! - `neon`: NEON kernel (aarch64 only)
//! - `dispatch`: [`NoiseEngine`] and runtime kernel selection
//!
//! Every wide kernel is bit-identical to [`gradient_coherent_noise_3d`] for
//! finite inputs with magnitude below `2^31`.

pub mod scalar;
mod wide;

pub use scalar::{
    gradient_coherent_noise_3d, gradient_noise_3d, int_value_noise_3d, value_noise_3d,
    SEED_NOISE_GEN, X_NOISE_GEN, Y_NOISE_GEN, Z_NOISE_GEN,
};

// =============================================================================
// Unsafe Invariants Reference
// =============================================================================
// SAFETY: Shared invariants for the wide kernels in this module tree.
// - Condition 1: Each kernel reads and writes `LANES` floats at `offset` only while
//   `offset + LANES <= xs.len() == out.len()`.
// - Condition 2: Kernels are called only through `NoiseEngine`, which holds a kernel
//   only for a tier the runtime detector reported usable.
// - Condition 3: All loads and stores use unaligned variants.
// Reason: Intrinsics need `#[target_feature]`, which makes every kernel `unsafe fn`.

// =============================================================================
// ISA kernel submodules
// =============================================================================

#[cfg(target_arch = "x86_64")]
mod x86_sse;

#[cfg(target_arch = "x86_64")]
mod x86_avx;

#[cfg(target_arch = "x86_64")]
mod x86_avx2;

#[cfg(target_arch = "x86_64")]
mod x86_avx512;

#[cfg(target_arch = "aarch64")]
mod neon;

#[cfg(target_arch = "x86_64")]
pub(crate) use x86_avx::coherent_row_avx;
#[cfg(target_arch = "x86_64")]
pub(crate) use x86_avx2::coherent_row_avx2;
#[cfg(target_arch = "x86_64")]
pub(crate) use x86_avx512::coherent_row_avx512;
#[cfg(target_arch = "x86_64")]
pub(crate) use x86_sse::{sse2::coherent_row_sse2, sse41::coherent_row_sse41};

#[cfg(target_arch = "aarch64")]
pub(crate) use neon::coherent_row_neon;

// =============================================================================
// Dispatch module (public API)
// =============================================================================

mod dispatch;

pub use dispatch::{sample_row, warmup, NoiseEngine};

// =============================================================================
// Tests (separate files per project rules)
// =============================================================================



#[cfg(test)]
mod dispatch_tests;
