//! Error types for cnoise-core.

use thiserror::Error;

use crate::cpu::InstructionTier;

/// Noise engine error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The host allocator could not satisfy an aligned allocation.
    #[error("Allocation error: {size} bytes aligned to {alignment} could not be allocated")]
    Allocation {
        /// Requested usable size in bytes.
        size: usize,
        /// Requested alignment in bytes.
        alignment: usize,
    },

    /// Alignment is zero or not a power of two.
    #[error("Invalid alignment: {0} is not a power of two")]
    InvalidAlignment(usize),

    /// An instruction tier was explicitly requested but the host cannot execute it.
    #[error("Configuration error: instruction tier '{0}' is not supported on this host")]
    UnsupportedTier(InstructionTier),

    /// Output slice length differs from the input row length.
    #[error("Length mismatch: row has {expected} samples, output has {actual}")]
    LengthMismatch {
        /// Input row length.
        expected: usize,
        /// Output slice length.
        actual: usize,
    },

    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns true for errors caused by caller configuration rather than the host.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::UnsupportedTier(_) | Self::Config(_))
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for noise operations.
pub type Result<T> = std::result::Result<T, Error>;
