//! Interpolation helpers and smoothing curves shared by every kernel.
//!
//! All helpers are plain `f32` arithmetic with no fused multiply-add; the
//! wide kernels mirror these operation sequences lane by lane.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// `2^30`, the folding boundary of [`make_int32_range`].
const INT32_RANGE_BOUND: f64 = 1_073_741_824.0;

/// Smoothing curve applied to fractional lattice offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Linear blend (identity curve).
    Fast,
    /// Cubic smoothstep `3a² − 2a³`.
    #[default]
    Standard,
    /// Quintic smoothstep `6a⁵ − 15a⁴ + 10a³`.
    Best,
}

impl Quality {
    /// Every quality level.
    pub const ALL: [Quality; 3] = [Self::Fast, Self::Standard, Self::Best];

    /// Applies this quality's curve to a fractional offset.
    #[inline]
    #[must_use]
    pub fn smooth(self, a: f32) -> f32 {
        match self {
            Self::Fast => a,
            Self::Standard => s_curve3(a),
            Self::Best => s_curve5(a),
        }
    }

    /// Lowercase identifier used in configuration and the CLI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Standard => "standard",
            Self::Best => "best",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "standard" | "std" => Ok(Self::Standard),
            "best" => Ok(Self::Best),
            _ => Err(Error::Config(format!("unknown noise quality '{s}'"))),
        }
    }
}

/// Linear interpolation `n0 + a·(n1 − n0)`.
#[inline]
#[must_use]
pub fn linear_interp(n0: f32, n1: f32, a: f32) -> f32 {
    n0 + a * (n1 - n0)
}

/// Four-point cubic interpolation between `n1` (a = 0) and `n2` (a = 1).
#[inline]
#[must_use]
pub fn cubic_interp(n0: f32, n1: f32, n2: f32, n3: f32, a: f32) -> f32 {
    let p = (n3 - n2) - (n0 - n1);
    let q = (n0 - n1) - p;
    let r = n2 - n0;
    let s = n1;
    p * a * a * a + q * a * a + r * a + s
}

/// Cubic s-curve `a²·(3 − 2a)`.
#[inline]
#[must_use]
pub fn s_curve3(a: f32) -> f32 {
    a * a * (3.0 - 2.0 * a)
}

/// Quintic s-curve `6a⁵ − 15a⁴ + 10a³`.
#[inline]
#[must_use]
pub fn s_curve5(a: f32) -> f32 {
    let a3 = a * a * a;
    let a4 = a3 * a;
    let a5 = a4 * a;
    (6.0 * a5) - (15.0 * a4) + (10.0 * a3)
}

/// Folds coordinates of magnitude `>= 2^30` back into `(-2^30, 2^30)`.
///
/// Kernels never apply this themselves: callers sampling far from the origin
/// fold their coordinates first.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // result is bounded by 2^30
pub fn make_int32_range(n: f32) -> f32 {
    let wide = f64::from(n);
    if wide >= INT32_RANGE_BOUND {
        (2.0 * (wide % INT32_RANGE_BOUND) - INT32_RANGE_BOUND) as f32
    } else if wide <= -INT32_RANGE_BOUND {
        (2.0 * (wide % INT32_RANGE_BOUND) + INT32_RANGE_BOUND) as f32
    } else {
        n
    }
}

/// Applies [`make_int32_range`] to every coordinate of a row in place.
pub fn make_int32_range_slice(values: &mut [f32]) {
    for v in values.iter_mut() {
        *v = make_int32_range(*v);
    }
}
