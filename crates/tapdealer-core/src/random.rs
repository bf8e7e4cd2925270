//! Uniform scalar sampling

use k256::Scalar;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::curve::{scalar_from_bytes_wrapping, SCALAR_SIZE};

/// Sample a scalar in `[0, n-1]` by reducing 256 random bits modulo n
pub fn sample_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    let mut bytes = Zeroizing::new([0u8; SCALAR_SIZE]);
    rng.fill_bytes(bytes.as_mut_slice());
    scalar_from_bytes_wrapping(&bytes)
}

/// Sample a scalar in `[1, n-1]`
///
/// Zero is rejected and resampled; a second draw happens with probability
/// around 2^-256.
pub fn sample_nonzero_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    loop {
        let s = sample_scalar(rng);
        if s != Scalar::ZERO {
            return s;
        }
    }
}
