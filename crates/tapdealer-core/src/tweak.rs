//! BIP341 Taproot tweak for a key-path-only output
//!
//! The internal key `P = A_0` is committed to an empty script tree:
//!
//! ```text
//! t = H_TapTweak(xonly(P) || 0^32) mod n
//! g = +1 if P has even Y, -1 otherwise
//! Q = g * P + t * G
//! ```
//!
//! Shares are tweaked the same way, `d_i = g * f(i) + t`, so the tweaked
//! shares interpolate to the secret of `Q` directly.

use k256::{ProjectivePoint, Scalar};
use sha2::{Digest, Sha256};

use crate::curve::{has_even_y, is_identity, scalar_from_bytes_wrapping, xonly_bytes};
use crate::error::{DealerError, Result};

/// Tag for the Taproot tweak hash
pub const TAP_TWEAK_TAG: &str = "TapTweak";

/// Merkle root used for an output with no script path
pub const EMPTY_MERKLE_ROOT: [u8; 32] = [0u8; 32];

/// BIP340 tagged hash: `SHA256(SHA256(tag) || SHA256(tag) || data)`
pub fn tagged_hash(tag: &str, data: &[u8]) -> [u8; 32] {
    let tag_hash = Sha256::digest(tag.as_bytes());
    let mut hasher = Sha256::new();
    hasher.update(&tag_hash);
    hasher.update(&tag_hash);
    hasher.update(data);
    hasher.finalize().into()
}

/// Sign applied to the internal key so that it behaves as its even-Y lift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweakSign {
    /// Internal key already has even Y
    Positive,
    /// Internal key has odd Y and is negated
    Negative,
}

impl TweakSign {
    pub fn from_point(point: &ProjectivePoint) -> Self {
        if has_even_y(point) {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    /// +1 or -1
    pub fn as_i8(&self) -> i8 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
        }
    }

    pub fn apply_to_scalar(&self, s: &Scalar) -> Scalar {
        match self {
            Self::Positive => *s,
            Self::Negative => -*s,
        }
    }

    pub fn apply_to_point(&self, p: &ProjectivePoint) -> ProjectivePoint {
        match self {
            Self::Positive => *p,
            Self::Negative => -*p,
        }
    }
}

/// Taproot tweak scalar and sign derived from an internal key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaprootTweak {
    tweak: Scalar,
    sign: TweakSign,
}

impl TaprootTweak {
    /// Derive the tweak for `internal_key` with an empty script tree
    pub fn compute(internal_key: &ProjectivePoint) -> Result<Self> {
        if is_identity(internal_key) {
            return Err(DealerError::InvalidCommitment(
                "Internal key is the point at infinity".to_string(),
            ));
        }

        let mut msg = [0u8; 64];
        msg[..32].copy_from_slice(&xonly_bytes(internal_key));
        msg[32..].copy_from_slice(&EMPTY_MERKLE_ROOT);

        let tweak = scalar_from_bytes_wrapping(&tagged_hash(TAP_TWEAK_TAG, &msg));
        let sign = TweakSign::from_point(internal_key);

        Ok(Self { tweak, sign })
    }

    pub fn tweak(&self) -> Scalar {
        self.tweak
    }

    pub fn sign(&self) -> TweakSign {
        self.sign
    }

    /// `g * P + t * G`
    pub fn apply_to_point(&self, point: &ProjectivePoint) -> ProjectivePoint {
        self.sign.apply_to_point(point) + ProjectivePoint::GENERATOR * self.tweak
    }

    /// `g * s + t`
    pub fn apply_to_scalar(&self, scalar: &Scalar) -> Scalar {
        self.sign.apply_to_scalar(scalar) + self.tweak
    }
}

/// Free-function form of [`TaprootTweak::compute`]
pub fn compute_tweak(internal_key: &ProjectivePoint) -> Result<TaprootTweak> {
    TaprootTweak::compute(internal_key)
}
