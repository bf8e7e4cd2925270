//! Lagrange interpolation at zero and group key reconstruction

use std::collections::BTreeSet;

use k256::{ProjectivePoint, Scalar};
use zeroize::Zeroizing;

use crate::curve::scalar_from_id;
use crate::error::{DealerError, Result};
use crate::group_key::GroupPublicKey;

/// Multiplicative inverse modulo the curve order
pub fn mod_inverse(x: &Scalar) -> Result<Scalar> {
    Option::<Scalar>::from(x.invert()).ok_or(DealerError::ZeroDivisor)
}

fn check_distinct_ids(ids: &[u16]) -> Result<()> {
    if ids.contains(&0) {
        return Err(DealerError::InconsistentInput(
            "participant id 0 is not allowed".to_string(),
        ));
    }
    let unique: BTreeSet<u16> = ids.iter().copied().collect();
    if unique.len() != ids.len() {
        return Err(DealerError::InconsistentInput(
            "duplicate participant ids".to_string(),
        ));
    }
    Ok(())
}

/// Lagrange coefficient of `target` for interpolation at X = 0
///
/// `lambda = prod_{j != target} j / (j - target) mod n`
pub fn lagrange_at_zero(ids: &[u16], target: u16) -> Result<Scalar> {
    if !ids.contains(&target) {
        return Err(DealerError::InconsistentInput(format!(
            "target id {} is not among the participants",
            target
        )));
    }
    check_distinct_ids(ids)?;

    let x = scalar_from_id(target);
    let mut num = Scalar::ONE;
    let mut denom = Scalar::ONE;

    for &j in ids.iter().filter(|&&j| j != target) {
        let j = scalar_from_id(j);
        num *= j;
        denom *= j - x;
    }

    Ok(num * mod_inverse(&denom)?)
}

fn check_share_inputs(ids: &[u16], shares: usize) -> Result<()> {
    if ids.len() != shares {
        return Err(DealerError::InconsistentInput(format!(
            "{} ids but {} shares",
            ids.len(),
            shares
        )));
    }
    if ids.is_empty() {
        return Err(DealerError::InconsistentInput(
            "need at least one share".to_string(),
        ));
    }
    check_distinct_ids(ids)
}

/// Reconstruct `Q` from tweaked public shares
///
/// Uses public material only. The caller is responsible for supplying at
/// least `t` shares; fewer interpolate to an unrelated point.
pub fn reconstruct_group_key(
    ids: &[u16],
    public_shares: &[ProjectivePoint],
) -> Result<GroupPublicKey> {
    check_share_inputs(ids, public_shares.len())?;

    let mut q = ProjectivePoint::IDENTITY;
    for (&id, share) in ids.iter().zip(public_shares) {
        q += share * &lagrange_at_zero(ids, id)?;
    }

    // Rejects an identity result
    GroupPublicKey::from_point(q)
}

/// Reconstruct the tweaked group secret `d` with `d * G = Q`
///
/// This undoes the threshold split and should only run in a recovery setting.
pub fn reconstruct_group_secret(
    ids: &[u16],
    secret_shares: &[Scalar],
) -> Result<Zeroizing<Scalar>> {
    check_share_inputs(ids, secret_shares.len())?;

    let mut secret = Zeroizing::new(Scalar::ZERO);
    for (&id, share) in ids.iter().zip(secret_shares) {
        *secret += share * &lagrange_at_zero(ids, id)?;
    }

    if *secret == Scalar::ZERO {
        return Err(DealerError::InvalidGroupKey);
    }
    Ok(secret)
}
