//! Noise configuration.
//!
//! Values are layered with `figment`, later layers overriding earlier ones:
//!
//! 1. Built-in defaults (`standard` quality, detected tier, seed 0)
//! 2. A TOML file, when a path is given
//! 3. Environment variables `CNOISE_QUALITY`, `CNOISE_TIER`, `CNOISE_SEED`
//!
//! ```toml
//! quality = "best"
//! tier = "avx2"
//! seed = 42
//! ```

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cpu::{supports, InstructionTier};
use crate::error::{Error, Result};
use crate::interp::Quality;
use crate::noise::NoiseEngine;

/// Prefix of the environment variables read by [`NoiseConfig::load`].
pub const ENV_PREFIX: &str = "CNOISE_";

/// Sampling configuration shared by the library entry points and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Smoothing curve.
    pub quality: Quality,
    /// Forced instruction tier; `None` uses the detected one.
    pub tier: Option<InstructionTier>,
    /// Default seed.
    pub seed: i32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            quality: Quality::Standard,
            tier: None,
            seed: 0,
        }
    }
}

impl NoiseConfig {
    /// Loads the layered configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `path` does not exist or any layer fails
    /// to parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::figment(path)?.extract().map_err(Error::from)
    }

    /// The layered provider stack used by [`NoiseConfig::load`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `path` does not exist.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                return Err(Error::Config(format!(
                    "configuration file '{}' not found",
                    path.display()
                )));
            }
            tracing::debug!(path = %path.display(), "loading noise configuration file");
            figment = figment.merge(Toml::file(path));
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Checks that a forced tier can run on this host.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedTier`] for a tier the host cannot execute.
    pub fn validate(&self) -> Result<()> {
        match self.tier {
            Some(tier) if !supports(tier) => Err(Error::UnsupportedTier(tier)),
            _ => Ok(()),
        }
    }

    /// Resolves the engine for this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedTier`] for a tier the host cannot execute.
    pub fn engine(&self) -> Result<NoiseEngine> {
        match self.tier {
            Some(tier) => NoiseEngine::new(tier),
            None => Ok(NoiseEngine::detected()),
        }
    }
}
