//! Scalar and point polynomial evaluation
//!
//! A dealer polynomial `f(X) = a_0 + a_1 X + ... + a_{t-1} X^{t-1}` is kept
//! in a [`SecretPolynomial`], which wipes its coefficients when dropped. Its
//! Feldman commitment `[a_0 G, ..., a_{t-1} G]` is evaluated with
//! [`eval_point_poly`] by anyone, no secrets needed.

use k256::{ProjectivePoint, Scalar};
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::random::{sample_nonzero_scalar, sample_scalar};

/// Evaluate `sum_j coeffs[j] * x^j`
pub fn eval_scalar_poly(coeffs: &[Scalar], x: &Scalar) -> Scalar {
    let mut result = Scalar::ZERO;
    let mut power = Scalar::ONE;

    for c in coeffs {
        result += c * &power;
        power *= x;
    }

    result
}

/// Evaluate `sum_j commitments[j] * x^j`
///
/// With `commitments[j] = a_j * G` this equals `f(x) * G`.
pub fn eval_point_poly(commitments: &[ProjectivePoint], x: &Scalar) -> ProjectivePoint {
    let mut result = ProjectivePoint::IDENTITY;
    let mut power = Scalar::ONE;

    for commitment in commitments {
        result += commitment * &power;
        power *= x;
    }

    result
}

/// The dealer's secret sharing polynomial
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretPolynomial {
    coefficients: Vec<Scalar>,
}

impl SecretPolynomial {
    /// Sample a random polynomial of degree `threshold - 1`
    ///
    /// The constant term is the group secret and is drawn nonzero; the other
    /// coefficients only mask it and may be zero.
    pub fn random<R: RngCore + CryptoRng>(threshold: usize, rng: &mut R) -> Self {
        let mut coefficients = Vec::with_capacity(threshold);
        if threshold > 0 {
            coefficients.push(sample_nonzero_scalar(rng));
        }
        for _ in 1..threshold {
            coefficients.push(sample_scalar(rng));
        }
        Self { coefficients }
    }

    /// Build from explicit coefficients, lowest degree first
    pub fn from_coefficients(coefficients: Vec<Scalar>) -> Self {
        Self { coefficients }
    }

    /// Number of coefficients, i.e. the reconstruction threshold
    pub fn threshold(&self) -> usize {
        self.coefficients.len()
    }

    pub fn evaluate(&self, x: &Scalar) -> Scalar {
        eval_scalar_poly(&self.coefficients, x)
    }

    /// Feldman commitment `A_j = a_j * G`
    pub fn commit(&self) -> Vec<ProjectivePoint> {
        self.coefficients
            .iter()
            .map(|a| ProjectivePoint::GENERATOR * a)
            .collect()
    }
}

impl std::fmt::Debug for SecretPolynomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretPolynomial")
            .field("threshold", &self.coefficients.len())
            .field("coefficients", &"[REDACTED]")
            .finish()
    }
}
