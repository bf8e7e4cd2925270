//! Trusted-dealer key generation
//!
//! One party samples the whole polynomial, so it learns the group secret.
//! This is a stand-in for a DKG where that trust is acceptable, e.g. a
//! single operator provisioning signing devices.
//!
//! # Example
//!
//! ```
//! use rand::rngs::OsRng;
//! use tapdealer_core::{derive_group_key, reconstruct_group_key, TrustedDealer};
//!
//! let output = TrustedDealer::new(2, 3)?.generate(&mut OsRng)?;
//! let public = output.public_shares();
//!
//! let q = reconstruct_group_key(&[1, 3], &[public[0], public[2]])?;
//! assert_eq!(q, derive_group_key(output.commitment())?);
//! assert_eq!(q, *output.group_key());
//! # Ok::<(), tapdealer_core::DealerError>(())
//! ```

use k256::{ProjectivePoint, Scalar};
use rand::{CryptoRng, RngCore};
use tracing::{debug, instrument};
use zeroize::{Zeroize, Zeroizing};

use crate::curve::scalar_from_id;
use crate::error::{DealerError, Result};
use crate::group_key::GroupPublicKey;
use crate::polynomial::{eval_point_poly, SecretPolynomial};
use crate::tweak::TaprootTweak;
use crate::verify::verify_share;

/// One participant's tweaked key material
#[derive(Clone)]
pub struct ParticipantShare {
    id: u16,
    secret_share: Scalar,
    public_share: ProjectivePoint,
}

impl ParticipantShare {
    /// Participant identifier, starting at 1
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Tweaked secret share `d_i`
    pub fn secret_share(&self) -> &Scalar {
        &self.secret_share
    }

    /// Tweaked public share `P_i = d_i * G`
    pub fn public_share(&self) -> &ProjectivePoint {
        &self.public_share
    }
}

impl std::fmt::Debug for ParticipantShare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticipantShare")
            .field("id", &self.id)
            .field("secret_share", &"[REDACTED]")
            .field("public_share", &self.public_share)
            .finish()
    }
}

impl Zeroize for ParticipantShare {
    fn zeroize(&mut self) {
        self.secret_share.zeroize();
    }
}

impl Drop for ParticipantShare {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Everything a dealer run produces
///
/// Position `k - 1` of every per-participant list belongs to participant `k`.
#[derive(Debug, Clone)]
pub struct DealerOutput {
    dealer: TrustedDealer,
    commitment: Vec<ProjectivePoint>,
    shares: Vec<ParticipantShare>,
    group_key: GroupPublicKey,
}

impl DealerOutput {
    /// Feldman commitment `[A_0, ..., A_{t-1}]`
    pub fn commitment(&self) -> &[ProjectivePoint] {
        &self.commitment
    }

    pub fn shares(&self) -> &[ParticipantShare] {
        &self.shares
    }

    /// Share of participant `id`, if it exists
    pub fn share(&self, id: u16) -> Option<&ParticipantShare> {
        let index = usize::from(id).checked_sub(1)?;
        self.shares.get(index)
    }

    pub fn secret_shares(&self) -> Zeroizing<Vec<Scalar>> {
        Zeroizing::new(self.shares.iter().map(|s| s.secret_share).collect())
    }

    pub fn public_shares(&self) -> Vec<ProjectivePoint> {
        self.shares.iter().map(|s| s.public_share).collect()
    }

    pub fn group_key(&self) -> &GroupPublicKey {
        &self.group_key
    }

    /// Parameters the ceremony was run with
    pub fn dealer(&self) -> &TrustedDealer {
        &self.dealer
    }

    pub fn threshold(&self) -> u16 {
        self.dealer.threshold()
    }

    pub fn participants(&self) -> u16 {
        self.dealer.participants()
    }

    /// Run [`verify_share`] for every participant
    pub fn verify_all(&self) -> bool {
        self.shares
            .iter()
            .all(|s| verify_share(s.id, &s.secret_share, &self.commitment))
    }
}

/// Validated `(t, n)` for a trusted-dealer ceremony
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustedDealer {
    threshold: u16,
    participants: u16,
}

impl TrustedDealer {
    /// Requires `1 <= threshold <= participants`
    pub fn new(threshold: u16, participants: u16) -> Result<Self> {
        if participants < 1 || threshold < 1 || threshold > participants {
            return Err(DealerError::InvalidParameters {
                threshold: threshold as usize,
                participants: participants as usize,
            });
        }
        Ok(Self {
            threshold,
            participants,
        })
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    pub fn participants(&self) -> u16 {
        self.participants
    }

    /// Run one ceremony
    ///
    /// Any failure discards everything generated so far. `ZeroShare` and
    /// `InvalidGroupKey` are retryable with fresh randomness.
    #[instrument(skip(self, rng), fields(threshold = self.threshold, participants = self.participants))]
    pub fn generate<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<DealerOutput> {
        debug!(
            "Dealing {}-of-{} Taproot key shares",
            self.threshold, self.participants
        );

        // Dropped, and so wiped, on every return path below
        let polynomial = SecretPolynomial::random(usize::from(self.threshold), rng);
        let commitment = polynomial.commit();

        let internal_key = &commitment[0];

        // Rejects an identity A_0
        let tweak = TaprootTweak::compute(internal_key)?;
        let group_key = GroupPublicKey::from_point(tweak.apply_to_point(internal_key))?;

        let mut shares = Vec::with_capacity(usize::from(self.participants));
        for id in 1..=self.participants {
            let x = scalar_from_id(id);

            let mut untweaked = polynomial.evaluate(&x);
            let secret_share = tweak.apply_to_scalar(&untweaked);
            untweaked.zeroize();

            if secret_share == Scalar::ZERO {
                return Err(DealerError::ZeroShare { participant: id });
            }

            let public_share = tweak.apply_to_point(&eval_point_poly(&commitment, &x));
            if public_share != ProjectivePoint::GENERATOR * secret_share {
                return Err(DealerError::ShareConsistency { participant: id });
            }

            shares.push(ParticipantShare {
                id,
                secret_share,
                public_share,
            });
        }

        debug!(
            "Dealt {} shares, group key {}",
            shares.len(),
            group_key.xonly_hex()
        );

        Ok(DealerOutput {
            dealer: *self,
            commitment,
            shares,
            group_key,
        })
    }
}

/// One-shot trusted-dealer key generation
pub fn trusted_dealer_keygen<R: RngCore + CryptoRng>(
    threshold: u16,
    participants: u16,
    rng: &mut R,
) -> Result<DealerOutput> {
    TrustedDealer::new(threshold, participants)?.generate(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group_key::derive_group_key;
    use crate::curve::scalar_to_bytes;
    use crate::lagrange::{reconstruct_group_key, reconstruct_group_secret};
    use crate::tweak::TaprootTweak;
    use rand::rngs::OsRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::VecDeque;

    /// Serves scripted 32-byte draws first, then falls back to ChaCha
    struct ScriptedRng {
        script: VecDeque<[u8; 32]>,
        inner: ChaCha20Rng,
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            match self.script.pop_front() {
                Some(bytes) if dest.len() == bytes.len() => dest.copy_from_slice(&bytes),
                _ => self.inner.fill_bytes(dest),
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for ScriptedRng {}

    /// Coefficients a_0, a_1 with g * (a_0 + a_1) + t = 0, so d_1 = 0
    fn zero_share_rng() -> ScriptedRng {
        let a0 = Scalar::from(5u64);
        let tweak = TaprootTweak::compute(&(ProjectivePoint::GENERATOR * a0)).unwrap();
        let a1 = -tweak.sign().apply_to_scalar(&tweak.tweak()) - a0;

        ScriptedRng {
            script: VecDeque::from([scalar_to_bytes(&a0), scalar_to_bytes(&a1)]),
            inner: ChaCha20Rng::seed_from_u64(17),
        }
    }

    #[test]
    fn test_invalid_parameters() {
        for (t, n) in [(0u16, 5u16), (3, 2), (0, 0), (1, 0)] {
            assert_eq!(
                TrustedDealer::new(t, n),
                Err(DealerError::InvalidParameters {
                    threshold: t as usize,
                    participants: n as usize,
                })
            );
        }
    }

    #[test]
    fn test_keygen_2of3() {
        let mut rng = OsRng;
        let output = trusted_dealer_keygen(2, 3, &mut rng).unwrap();

        assert_eq!(output.threshold(), 2);
        assert_eq!(output.participants(), 3);
        assert_eq!(output.commitment().len(), 2);
        assert!(output.verify_all());

        let public = output.public_shares();
        let q12 = reconstruct_group_key(&[1, 2], &public[0..2]).unwrap();
        let q23 = reconstruct_group_key(&[2, 3], &public[1..3]).unwrap();
        assert_eq!(q12, q23);
        assert_eq!(q12, derive_group_key(output.commitment()).unwrap());
        assert_eq!(q12, *output.group_key());
    }

    #[test]
    fn test_shares_indexed_by_id() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let output = trusted_dealer_keygen(3, 5, &mut rng).unwrap();

        for (k, share) in output.shares().iter().enumerate() {
            assert_eq!(usize::from(share.id()), k + 1);
            assert_eq!(
                *share.public_share(),
                ProjectivePoint::GENERATOR * share.secret_share()
            );
            assert_eq!(output.share(share.id()).unwrap().id(), share.id());
        }
        assert!(output.share(0).is_none());
        assert!(output.share(6).is_none());
    }

    #[test]
    fn test_reconstructed_secret_matches_group_key() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let output = trusted_dealer_keygen(3, 4, &mut rng).unwrap();
        let secrets = output.secret_shares();

        let d = reconstruct_group_secret(&[1, 2, 4], &[secrets[0], secrets[1], secrets[3]])
            .unwrap();
        assert_eq!(ProjectivePoint::GENERATOR * *d, *output.group_key().point());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let a = trusted_dealer_keygen(2, 4, &mut ChaCha20Rng::seed_from_u64(99)).unwrap();
        let b = trusted_dealer_keygen(2, 4, &mut ChaCha20Rng::seed_from_u64(99)).unwrap();
        assert_eq!(a.commitment(), b.commitment());
        assert_eq!(a.public_shares(), b.public_shares());
        assert_eq!(*a.secret_shares(), *b.secret_shares());
    }

    #[test]
    fn test_threshold_one_gives_identical_shares() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let output = trusted_dealer_keygen(1, 3, &mut rng).unwrap();
        let public = output.public_shares();
        assert!(public.iter().all(|p| *p == public[0]));
        assert_eq!(public[0], *output.group_key().point());
    }

    #[test]
    fn test_zero_share_aborts_ceremony() {
        let mut rng = zero_share_rng();
        let result = trusted_dealer_keygen(2, 3, &mut rng);
        assert_eq!(result.unwrap_err(), DealerError::ZeroShare { participant: 1 });
        assert!(rng.script.is_empty());

        // Fresh randomness from the same source succeeds
        let output = trusted_dealer_keygen(2, 3, &mut rng).unwrap();
        assert!(output.verify_all());
    }

    #[test]
    fn test_output_keeps_dealer_parameters() {
        let dealer = TrustedDealer::new(3, 7).unwrap();
        let output = dealer.generate(&mut ChaCha20Rng::seed_from_u64(4)).unwrap();
        assert_eq!(*output.dealer(), dealer);
        assert_eq!(output.threshold(), 3);
        assert_eq!(output.participants(), 7);
        assert_eq!(usize::from(output.threshold()), output.commitment().len());
        assert_eq!(usize::from(output.participants()), output.shares().len());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let output = trusted_dealer_keygen(2, 2, &mut rng).unwrap();
        let dbg = format!("{:?}", output.share(1).unwrap());
        assert!(dbg.contains("REDACTED"));
    }
}
