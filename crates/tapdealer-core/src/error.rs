//! Error types for dealer operations

use thiserror::Error;

/// Result type for dealer operations
pub type Result<T> = std::result::Result<T, DealerError>;

/// Errors that can occur while dealing, deriving or reconstructing keys
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DealerError {
    /// Threshold/participant pair outside `1 <= t <= n`
    #[error("Invalid parameters: threshold {threshold} must satisfy 1 <= t <= {participants}")]
    InvalidParameters { threshold: usize, participants: usize },

    /// Commitment list is empty or commits to the identity
    #[error("Invalid commitment: {0}")]
    InvalidCommitment(String),

    /// Tweaked group key is the point at infinity
    #[error("Tweaked group public key is the point at infinity")]
    InvalidGroupKey,

    /// A participant's tweaked secret share came out as zero
    #[error("Secret share for participant {participant} is zero")]
    ZeroShare { participant: u16 },

    /// Identifiers or shares do not line up
    #[error("Inconsistent input: {0}")]
    InconsistentInput(String),

    /// Attempted to invert zero
    #[error("Cannot invert the zero scalar")]
    ZeroDivisor,

    /// Hex or point/scalar decoding failed
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Public and secret share disagree. The curve arithmetic is broken;
    /// this is never caused by caller input.
    #[error("Internal consistency failure: public share for participant {participant} does not match its secret share")]
    ShareConsistency { participant: u16 },
}

impl DealerError {
    /// Whether the caller should rerun the whole ceremony with fresh randomness
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ZeroShare { .. } | Self::InvalidGroupKey)
    }

    /// Whether the error signals a defect in the arithmetic primitives
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ShareConsistency { .. })
    }
}

impl From<hex::FromHexError> for DealerError {
    fn from(e: hex::FromHexError) -> Self {
        DealerError::Encoding(e.to_string())
    }
}
