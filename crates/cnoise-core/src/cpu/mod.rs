//! CPU capability detection.
//!
//! - `tier`: the [`InstructionTier`] enum
//! - `detect`: CPUID/XGETBV decoding, cached tier detection

mod detect;
mod tier;

pub use detect::{
    cpu_features, detect, detect_tier, supported_tiers, supports, CpuFeatures, XCR0_YMM_MASK,
    XCR0_ZMM_MASK,
};
pub use tier::InstructionTier;
