//! Hex encodings and serde records for dealer output
//!
//! Scalars are 32-byte big-endian, points 33-byte compressed SEC1 with the
//! identity written as `00`. The records here are what gets handed to each
//! participant; how they travel is up to the caller.

use k256::{ProjectivePoint, Scalar};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::curve::{decode_point, encode_point, scalar_from_bytes, scalar_to_bytes, SCALAR_SIZE};
use crate::dealer::DealerOutput;
use crate::error::{DealerError, Result};
use crate::group_key::{derive_group_key, GroupPublicKey};
use crate::verify::{verify_public_share, verify_share};

pub fn scalar_to_hex(scalar: &Scalar) -> String {
    hex::encode(scalar_to_bytes(scalar))
}

pub fn scalar_from_hex(s: &str) -> Result<Scalar> {
    let mut bytes = [0u8; SCALAR_SIZE];
    hex::decode_to_slice(s, &mut bytes)?;
    let scalar = scalar_from_bytes(&bytes);
    bytes.zeroize();
    scalar
}

pub fn point_to_hex(point: &ProjectivePoint) -> String {
    hex::encode(encode_point(point))
}

pub fn point_from_hex(s: &str) -> Result<ProjectivePoint> {
    decode_point(&hex::decode(s)?)
}

/// Serde helper for scalars as hex strings
pub mod hex_scalar {
    use k256::Scalar;
    use serde::{Deserialize, Deserializer, Serializer};
    use zeroize::Zeroizing;

    pub fn serialize<S>(scalar: &Scalar, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = Zeroizing::new(super::scalar_to_hex(scalar));
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Scalar, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Zeroizing::new(String::deserialize(deserializer)?);
        super::scalar_from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde helper for points as hex strings
pub mod hex_point {
    use k256::ProjectivePoint;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(point: &ProjectivePoint, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::point_to_hex(point))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<ProjectivePoint, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::point_from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde helper for point lists as arrays of hex strings
pub mod hex_points {
    use k256::ProjectivePoint;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(points: &[ProjectivePoint], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(points.iter().map(super::point_to_hex))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<ProjectivePoint>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|s| super::point_from_hex(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

/// Public half of a dealer run, safe to publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPackage {
    pub threshold: u16,
    pub participants: u16,
    #[serde(with = "hex_points")]
    pub commitment: Vec<ProjectivePoint>,
    #[serde(with = "hex_points")]
    pub public_shares: Vec<ProjectivePoint>,
    #[serde(with = "hex_point")]
    pub group_key: ProjectivePoint,
    /// x-only output key, for convenience
    pub group_key_xonly: String,
}

impl PublicPackage {
    pub fn from_output(output: &DealerOutput) -> Self {
        Self {
            threshold: output.threshold(),
            participants: output.participants(),
            commitment: output.commitment().to_vec(),
            public_shares: output.public_shares(),
            group_key: *output.group_key().point(),
            group_key_xonly: output.group_key().xonly_hex(),
        }
    }

    /// Re-derive `Q` from the commitment and check the package agrees with it
    ///
    /// Catches packages that were edited or truncated in transit: the
    /// commitment must have `threshold` entries, there must be one public
    /// share per participant, and every public share must verify.
    pub fn check(&self) -> Result<GroupPublicKey> {
        if self.commitment.len() != usize::from(self.threshold) {
            return Err(DealerError::InvalidCommitment(format!(
                "expected {} commitments, found {}",
                self.threshold,
                self.commitment.len()
            )));
        }
        if self.public_shares.len() != usize::from(self.participants) {
            return Err(DealerError::InconsistentInput(format!(
                "expected {} public shares, found {}",
                self.participants,
                self.public_shares.len()
            )));
        }

        let derived = derive_group_key(&self.commitment)?;
        if *derived.point() != self.group_key || derived.xonly_hex() != self.group_key_xonly {
            return Err(DealerError::InconsistentInput(
                "group key does not match the commitment".to_string(),
            ));
        }

        for (k, share) in self.public_shares.iter().enumerate() {
            let id = (k + 1) as u16;
            if !verify_public_share(id, share, &self.commitment) {
                return Err(DealerError::InconsistentInput(format!(
                    "public share {} does not match the commitment",
                    id
                )));
            }
        }

        Ok(derived)
    }

    /// Public shares for the given ids, in the same order
    pub fn select_shares(&self, ids: &[u16]) -> Result<Vec<ProjectivePoint>> {
        ids.iter()
            .map(|&id| {
                usize::from(id)
                    .checked_sub(1)
                    .and_then(|k| self.public_shares.get(k))
                    .copied()
                    .ok_or_else(|| {
                        DealerError::InconsistentInput(format!("no public share for id {}", id))
                    })
            })
            .collect()
    }
}

/// What a single participant receives from the dealer
#[derive(Clone, Serialize, Deserialize)]
pub struct SecretSharePackage {
    pub id: u16,
    #[serde(with = "hex_scalar")]
    pub secret_share: Scalar,
    #[serde(with = "hex_point")]
    pub public_share: ProjectivePoint,
    #[serde(with = "hex_points")]
    pub commitment: Vec<ProjectivePoint>,
}

impl SecretSharePackage {
    /// Package for participant `id`, if it exists in `output`
    pub fn for_participant(output: &DealerOutput, id: u16) -> Option<Self> {
        let share = output.share(id)?;
        Some(Self {
            id,
            secret_share: *share.secret_share(),
            public_share: *share.public_share(),
            commitment: output.commitment().to_vec(),
        })
    }

    /// Check the secret and public share against the bundled commitment
    pub fn verify(&self) -> bool {
        verify_share(self.id, &self.secret_share, &self.commitment)
            && ProjectivePoint::GENERATOR * self.secret_share == self.public_share
    }
}

impl std::fmt::Debug for SecretSharePackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretSharePackage")
            .field("id", &self.id)
            .field("secret_share", &"[REDACTED]")
            .field("public_share", &point_to_hex(&self.public_share))
            .field("commitment_len", &self.commitment.len())
            .finish()
    }
}

impl Drop for SecretSharePackage {
    fn drop(&mut self) {
        self.secret_share.zeroize();
    }
}
