//! Processor identification and tier selection.
//!
//! On x86_64 the decoded CPUID bits are combined with the XCR0 register
//! (read through XGETBV, only when the OS advertises OSXSAVE) so that a
//! tier is reported usable only when both the silicon and the operating
//! system support its register file. Other architectures never execute a
//! query instruction: aarch64 always has NEON, everything else falls back
//! to the scalar kernel.

use std::sync::OnceLock;

use serde::Serialize;

use super::InstructionTier;

/// XCR0 bits 1-2: SSE (XMM) and AVX (upper YMM) state saved by the OS.
pub const XCR0_YMM_MASK: u64 = 0x6;

/// XCR0 bits 1-2 and 5-7: XMM, YMM, opmask, ZMM_Hi256 and Hi16_ZMM state.
pub const XCR0_ZMM_MASK: u64 = 0xE6;

/// Tiers in the order detection tries them (widest/newest first).
const DETECTION_ORDER: [InstructionTier; 7] = [
    InstructionTier::Avx512,
    InstructionTier::Avx2,
    InstructionTier::Avx,
    InstructionTier::Sse41,
    InstructionTier::Sse2,
    InstructionTier::Neon,
    InstructionTier::Fallback,
];

/// Raw capability flags decoded from the processor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CpuFeatures {
    /// CPUID.1:EDX bit 26.
    pub sse2: bool,
    /// CPUID.1:ECX bit 19.
    pub sse41: bool,
    /// CPUID.1:ECX bit 28.
    pub avx: bool,
    /// CPUID.1:ECX bit 27, the OS uses XSAVE/XRSTOR and XGETBV is available.
    pub osxsave: bool,
    /// CPUID.(7,0):EBX bit 5.
    pub avx2: bool,
    /// CPUID.(7,0):EBX bit 16.
    pub avx512f: bool,
    /// XCR0 contents, zero when OSXSAVE is clear.
    pub xcr0: u64,
    /// Advanced SIMD (aarch64 only).
    pub neon: bool,
}

impl CpuFeatures {
    /// Queries the current processor. Does not cache; see [`cpu_features`].
    #[must_use]
    pub fn probe() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            probe_x86_64()
        }

        #[cfg(target_arch = "aarch64")]
        {
            Self {
                neon: true,
                ..Self::default()
            }
        }

        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            Self::default()
        }
    }

    /// The OS saves the 256-bit register file on context switch.
    #[must_use]
    pub const fn os_ymm_enabled(&self) -> bool {
        self.xcr0 & XCR0_YMM_MASK == XCR0_YMM_MASK
    }

    /// The OS saves the 512-bit and opmask register files on context switch.
    #[must_use]
    pub const fn os_zmm_enabled(&self) -> bool {
        self.xcr0 & XCR0_ZMM_MASK == XCR0_ZMM_MASK
    }

    /// Whether a kernel for `tier` may execute on a host with these features.
    #[must_use]
    pub const fn satisfies(&self, tier: InstructionTier) -> bool {
        match tier {
            InstructionTier::Fallback => true,
            InstructionTier::Sse2 => self.sse2,
            InstructionTier::Sse41 => self.sse41,
            InstructionTier::Avx => self.avx && self.sse41 && self.os_ymm_enabled(),
            InstructionTier::Avx2 => self.avx2 && self.os_ymm_enabled(),
            InstructionTier::Avx512 => self.avx512f && self.os_zmm_enabled(),
            InstructionTier::Neon => self.neon,
        }
    }

    /// First satisfied tier, widest first. Narrower tiers are assumed present
    /// once a wider one is confirmed and are not re-checked.
    #[must_use]
    pub fn best_tier(&self) -> InstructionTier {
        DETECTION_ORDER
            .into_iter()
            .find(|&tier| self.satisfies(tier))
            .unwrap_or(InstructionTier::Fallback)
    }
}

#[cfg(target_arch = "x86_64")]
// `__cpuid` is a safe fn on newer toolchains.
#[allow(unused_unsafe)]
fn probe_x86_64() -> CpuFeatures {
    use std::arch::x86_64::{__cpuid, __cpuid_count};

    // SAFETY: CPUID is part of the x86_64 baseline.
    let max_leaf = unsafe { __cpuid(0) }.eax;
    // SAFETY: leaf 1 exists on every x86_64 processor.
    let leaf1 = unsafe { __cpuid(1) };

    let osxsave = leaf1.ecx & (1 << 27) != 0;
    let xcr0 = if osxsave {
        // SAFETY: OSXSAVE set means the OS enabled XSAVE and XGETBV is legal.
        unsafe { read_xcr0() }
    } else {
        0
    };

    let (avx2, avx512f) = if max_leaf >= 7 {
        // SAFETY: leaf 7 is within the reported maximum basic leaf.
        let leaf7 = unsafe { __cpuid_count(7, 0) };
        (leaf7.ebx & (1 << 5) != 0, leaf7.ebx & (1 << 16) != 0)
    } else {
        (false, false)
    };

    CpuFeatures {
        sse2: leaf1.edx & (1 << 26) != 0,
        sse41: leaf1.ecx & (1 << 19) != 0,
        avx: leaf1.ecx & (1 << 28) != 0,
        osxsave,
        avx2,
        avx512f,
        xcr0,
        neon: false,
    }
}

/// Reads XCR0 (the XFEATURE_ENABLED_MASK).
///
/// # Safety
///
/// Caller must have checked CPUID.1:ECX.OSXSAVE.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "xsave")]
unsafe fn read_xcr0() -> u64 {
    std::arch::x86_64::_xgetbv(0)
}

static CPU_FEATURES: OnceLock<CpuFeatures> = OnceLock::new();
static DETECTED_TIER: OnceLock<InstructionTier> = OnceLock::new();

/// Cached processor features, probed on first use.
#[must_use]
pub fn cpu_features() -> CpuFeatures {
    *CPU_FEATURES.get_or_init(CpuFeatures::probe)
}

/// Probes the processor and returns the best tier. Does not cache.
#[must_use]
pub fn detect() -> InstructionTier {
    CpuFeatures::probe().best_tier()
}

/// Best supported tier for this process, detected once and cached.
///
/// A race on first use is benign: detection is deterministic for a host.
#[inline]
#[must_use]
pub fn detect_tier() -> InstructionTier {
    *DETECTED_TIER.get_or_init(|| {
        let features = cpu_features();
        let tier = features.best_tier();
        tracing::debug!(tier = %tier, ?features, "instruction tier detected");
        tier
    })
}

/// Whether a kernel for `tier` can run on this host.
#[inline]
#[must_use]
pub fn supports(tier: InstructionTier) -> bool {
    cpu_features().satisfies(tier)
}

/// Every tier usable on this host, narrowest first.
#[must_use]
pub fn supported_tiers() -> Vec<InstructionTier> {
    InstructionTier::ALL
        .into_iter()
        .filter(|&tier| supports(tier))
        .collect()
}
