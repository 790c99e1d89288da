//! Instruction-set tiers a noise kernel can be compiled for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Instruction-set capability level, ordered from least to most capable.
///
/// `Fallback` is valid on every host. The x86 tiers come in pairs per lane
/// width: the older member synthesizes a 32-bit lane multiply, the newer one
/// has it natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructionTier {
    /// Scalar reference kernel.
    Fallback,
    /// 4 x 32-bit lanes, SSE2 (multiply synthesized from `pmuludq`).
    Sse2,
    /// 4 x 32-bit lanes, SSE4.1 (native `pmulld`).
    Sse41,
    /// 8 x 32-bit lanes, AVX (integer math split into 128-bit halves).
    Avx,
    /// 8 x 32-bit lanes, AVX2 (native 256-bit integer math).
    Avx2,
    /// 16 x 32-bit lanes, AVX-512F.
    Avx512,
    /// 4 x 32-bit lanes, ARM NEON.
    Neon,
}

impl InstructionTier {
    /// Every tier, in declaration order.
    pub const ALL: [InstructionTier; 7] = [
        Self::Fallback,
        Self::Sse2,
        Self::Sse41,
        Self::Avx,
        Self::Avx2,
        Self::Avx512,
        Self::Neon,
    ];

    /// Number of samples one kernel invocation computes in parallel.
    #[must_use]
    pub const fn lanes(self) -> usize {
        match self {
            Self::Fallback => 1,
            Self::Sse2 | Self::Sse41 | Self::Neon => 4,
            Self::Avx | Self::Avx2 => 8,
            Self::Avx512 => 16,
        }
    }

    /// Lowercase identifier used in configuration and the CLI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fallback => "fallback",
            Self::Sse2 => "sse2",
            Self::Sse41 => "sse41",
            Self::Avx => "avx",
            Self::Avx2 => "avx2",
            Self::Avx512 => "avx512",
            Self::Neon => "neon",
        }
    }
}

impl fmt::Display for InstructionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstructionTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['.', '_', '-'], "");
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str() == normalized)
            .or(match normalized.as_str() {
                "scalar" | "none" => Some(Self::Fallback),
                "avx512f" => Some(Self::Avx512),
                _ => None,
            })
            .ok_or_else(|| Error::Config(format!("unknown instruction tier '{s}'")))
    }
}
