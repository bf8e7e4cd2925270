//! Tweaked group public key

use k256::{elliptic_curve::sec1::ToEncodedPoint, ProjectivePoint};
use tracing::debug;

use crate::curve::{is_identity, xonly_bytes};
use crate::error::{DealerError, Result};
use crate::tweak::TaprootTweak;

/// The Taproot output key `Q = g * A_0 + t * G`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPublicKey(ProjectivePoint);

impl GroupPublicKey {
    /// Wrap a point, rejecting the identity
    pub fn from_point(point: ProjectivePoint) -> Result<Self> {
        if is_identity(&point) {
            return Err(DealerError::InvalidGroupKey);
        }
        Ok(Self(point))
    }

    pub fn point(&self) -> &ProjectivePoint {
        &self.0
    }

    /// 32-byte x-only key as placed in a P2TR output
    pub fn to_xonly_bytes(&self) -> [u8; 32] {
        xonly_bytes(&self.0)
    }

    /// 33-byte compressed SEC1 encoding
    pub fn to_compressed_bytes(&self) -> [u8; 33] {
        let encoded = self.0.to_affine().to_encoded_point(true);
        let mut bytes = [0u8; 33];
        bytes.copy_from_slice(encoded.as_bytes());
        bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed_bytes())
    }

    pub fn xonly_hex(&self) -> String {
        hex::encode(self.to_xonly_bytes())
    }
}

impl From<GroupPublicKey> for ProjectivePoint {
    fn from(key: GroupPublicKey) -> Self {
        key.0
    }
}

/// Derive the tweaked group key from the Feldman commitment alone
///
/// Only `A_0` is used; no shares are needed.
pub fn derive_group_key(commitment: &[ProjectivePoint]) -> Result<GroupPublicKey> {
    let internal_key = commitment
        .first()
        .ok_or_else(|| DealerError::InvalidCommitment("Empty commitment".to_string()))?;

    // Rejects an identity A_0
    let tweak = TaprootTweak::compute(internal_key)?;
    let key = GroupPublicKey::from_point(tweak.apply_to_point(internal_key))?;

    debug!("Derived group key {}", key.xonly_hex());
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::scalar_from_id;

    #[test]
    fn test_empty_commitment_rejected() {
        assert!(matches!(
            derive_group_key(&[]),
            Err(DealerError::InvalidCommitment(_))
        ));
    }

    #[test]
    fn test_identity_a0_rejected() {
        let commitment = [ProjectivePoint::IDENTITY, ProjectivePoint::GENERATOR];
        assert!(matches!(
            derive_group_key(&commitment),
            Err(DealerError::InvalidCommitment(_))
        ));
    }

    #[test]
    fn test_identity_a0_error_matches_tweak() {
        let commitment = [ProjectivePoint::IDENTITY];
        assert_eq!(
            derive_group_key(&commitment).unwrap_err(),
            TaprootTweak::compute(&ProjectivePoint::IDENTITY).unwrap_err()
        );
    }

    #[test]
    fn test_only_a0_matters() {
        let a0 = ProjectivePoint::GENERATOR * scalar_from_id(31);
        let a1 = ProjectivePoint::GENERATOR * scalar_from_id(5);
        let a2 = ProjectivePoint::GENERATOR * scalar_from_id(6);

        let short = derive_group_key(&[a0]).unwrap();
        let long = derive_group_key(&[a0, a1, a2]).unwrap();
        assert_eq!(short, long);
    }

    #[test]
    fn test_encodings() {
        let a0 = ProjectivePoint::GENERATOR * scalar_from_id(31);
        let key = derive_group_key(&[a0]).unwrap();

        let compressed = key.to_compressed_bytes();
        assert!(compressed[0] == 0x02 || compressed[0] == 0x03);
        assert_eq!(compressed[1..], key.to_xonly_bytes());
        assert_eq!(key.to_hex().len(), 66);
        assert_eq!(key.xonly_hex().len(), 64);
    }

    #[test]
    fn test_identity_group_key_rejected() {
        assert_eq!(
            GroupPublicKey::from_point(ProjectivePoint::IDENTITY),
            Err(DealerError::InvalidGroupKey)
        );
    }
}
