//! Share verification against a Feldman commitment
//!
//! These are predicates over data received from untrusted peers. Malformed
//! input (zero share, id 0, empty commitment, identity `A_0`) is reported
//! as `false`, the same as a share that fails the check.

use k256::{ProjectivePoint, Scalar};

use crate::curve::{is_identity, scalar_from_id};
use crate::polynomial::eval_point_poly;
use crate::tweak::TaprootTweak;

/// `g * E(id) + t * G` for a well-formed commitment
fn expected_public_share(id: u16, commitment: &[ProjectivePoint]) -> Option<ProjectivePoint> {
    if id == 0 {
        return None;
    }
    let internal_key = commitment.first()?;
    let tweak = TaprootTweak::compute(internal_key).ok()?;
    let evaluated = eval_point_poly(commitment, &scalar_from_id(id));
    Some(tweak.apply_to_point(&evaluated))
}

/// Check a tweaked secret share `d_id` against the commitment
pub fn verify_share(id: u16, secret_share: &Scalar, commitment: &[ProjectivePoint]) -> bool {
    if *secret_share == Scalar::ZERO {
        return false;
    }
    match expected_public_share(id, commitment) {
        Some(expected) => ProjectivePoint::GENERATOR * secret_share == expected,
        None => false,
    }
}

/// Check a tweaked public share `P_id` against the commitment
pub fn verify_public_share(
    id: u16,
    public_share: &ProjectivePoint,
    commitment: &[ProjectivePoint],
) -> bool {
    if is_identity(public_share) {
        return false;
    }
    expected_public_share(id, commitment).is_some_and(|expected| expected == *public_share)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polynomial::SecretPolynomial;

    fn s(v: u64) -> Scalar {
        Scalar::from(v)
    }

    fn fixture() -> (SecretPolynomial, Vec<ProjectivePoint>, TaprootTweak) {
        let poly = SecretPolynomial::from_coefficients(vec![s(1001), s(17), s(4)]);
        let commitment = poly.commit();
        let tweak = TaprootTweak::compute(&commitment[0]).unwrap();
        (poly, commitment, tweak)
    }

    #[test]
    fn test_valid_share_accepted() {
        let (poly, commitment, tweak) = fixture();
        for id in 1..=5u16 {
            let d = tweak.apply_to_scalar(&poly.evaluate(&scalar_from_id(id)));
            assert!(verify_share(id, &d, &commitment));
            assert!(verify_public_share(
                id,
                &(ProjectivePoint::GENERATOR * d),
                &commitment
            ));
        }
    }

    #[test]
    fn test_tampered_share_rejected() {
        let (poly, commitment, tweak) = fixture();
        let d = tweak.apply_to_scalar(&poly.evaluate(&scalar_from_id(2)));
        assert!(!verify_share(2, &(d + Scalar::ONE), &commitment));
        // Right share, wrong participant
        assert!(!verify_share(3, &d, &commitment));
    }

    #[test]
    fn test_untweaked_share_rejected() {
        let (poly, commitment, _) = fixture();
        let raw = poly.evaluate(&scalar_from_id(1));
        assert!(!verify_share(1, &raw, &commitment));
    }

    #[test]
    fn test_malformed_inputs_are_false() {
        let (poly, commitment, tweak) = fixture();
        let d = tweak.apply_to_scalar(&poly.evaluate(&scalar_from_id(1)));

        assert!(!verify_share(1, &Scalar::ZERO, &commitment));
        assert!(!verify_share(0, &d, &commitment));
        assert!(!verify_share(1, &d, &[]));

        let mut bad = commitment.clone();
        bad[0] = ProjectivePoint::IDENTITY;
        assert!(!verify_share(1, &d, &bad));

        assert!(!verify_public_share(1, &ProjectivePoint::IDENTITY, &commitment));
        assert!(!verify_public_share(0, &(ProjectivePoint::GENERATOR * d), &commitment));
    }
}
