//! secp256k1 helpers on top of `k256`
//!
//! Thin wrappers that pin down the handful of scalar and point operations the
//! dealer relies on: wrapping reduction, x-only encoding, parity and the
//! compressed point codec (with an explicit encoding for the identity).

use k256::{
    elliptic_curve::{
        group::Group, ops::Reduce, point::AffineCoordinates, sec1::ToEncodedPoint, PrimeField,
    },
    FieldBytes, ProjectivePoint, Scalar, U256,
};

use crate::error::{DealerError, Result};

/// Size of a serialized scalar in bytes
pub const SCALAR_SIZE: usize = 32;

/// Size of a compressed SEC1 point in bytes
pub const COMPRESSED_POINT_SIZE: usize = 33;

/// Encoding used for the point at infinity
pub const IDENTITY_ENCODING: [u8; 1] = [0x00];

/// Participant identifier as a scalar
pub fn scalar_from_id(id: u16) -> Scalar {
    Scalar::from(u64::from(id))
}

/// Reduce 32 big-endian bytes modulo the curve order
pub fn scalar_from_bytes_wrapping(bytes: &[u8; SCALAR_SIZE]) -> Scalar {
    let field_bytes = FieldBytes::from(*bytes);
    <Scalar as Reduce<U256>>::reduce_bytes(&field_bytes)
}

/// Decode a canonical scalar, rejecting values >= n
pub fn scalar_from_bytes(bytes: &[u8; SCALAR_SIZE]) -> Result<Scalar> {
    Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(*bytes)))
        .ok_or_else(|| DealerError::Encoding("Scalar is not reduced modulo n".to_string()))
}

/// Big-endian encoding of a scalar
pub fn scalar_to_bytes(scalar: &Scalar) -> [u8; SCALAR_SIZE] {
    scalar.to_bytes().into()
}

pub fn is_identity(point: &ProjectivePoint) -> bool {
    bool::from(point.is_identity())
}

/// True if the affine Y coordinate is even
///
/// The identity has no affine coordinates; callers reject it before asking.
pub fn has_even_y(point: &ProjectivePoint) -> bool {
    !bool::from(point.to_affine().y_is_odd())
}

/// 32-byte x-only (BIP340) encoding
pub fn xonly_bytes(point: &ProjectivePoint) -> [u8; 32] {
    point.to_affine().x().into()
}

/// Compressed SEC1 encoding; the identity encodes as a single zero byte
pub fn encode_point(point: &ProjectivePoint) -> Vec<u8> {
    if is_identity(point) {
        return IDENTITY_ENCODING.to_vec();
    }
    point.to_affine().to_encoded_point(true).as_bytes().to_vec()
}

/// Inverse of [`encode_point`]
pub fn decode_point(bytes: &[u8]) -> Result<ProjectivePoint> {
    if bytes == IDENTITY_ENCODING {
        return Ok(ProjectivePoint::IDENTITY);
    }
    if bytes.len() != COMPRESSED_POINT_SIZE {
        return Err(DealerError::Encoding(format!(
            "Expected {} byte compressed point, got {} bytes",
            COMPRESSED_POINT_SIZE,
            bytes.len()
        )));
    }
    k256::PublicKey::from_sec1_bytes(bytes)
        .map(|pk| pk.to_projective())
        .map_err(|e| DealerError::Encoding(format!("Invalid point: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapping_reduction_of_order() {
        // n itself reduces to zero, n + 1 to one
        let n = hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141")
            .unwrap();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&n);
        assert_eq!(scalar_from_bytes_wrapping(&bytes), Scalar::ZERO);
        assert!(scalar_from_bytes(&bytes).is_err());

        bytes[31] = 0x42;
        assert_eq!(scalar_from_bytes_wrapping(&bytes), Scalar::ONE);
    }

    #[test]
    fn test_scalar_bytes_roundtrip() {
        let s = scalar_from_id(0x1234);
        let bytes = scalar_to_bytes(&s);
        assert_eq!(&bytes[30..], &[0x12u8, 0x34][..]);
        assert_eq!(scalar_from_bytes(&bytes).unwrap(), s);
    }

    #[test]
    fn test_generator_parity_and_xonly() {
        let g = ProjectivePoint::GENERATOR;
        // G.y = 0x483ada77...b10d4b8 is even
        assert!(has_even_y(&g));
        assert!(!has_even_y(&-g));
        assert_eq!(
            hex::encode(xonly_bytes(&g)),
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
        assert_eq!(xonly_bytes(&g), xonly_bytes(&-g));
    }

    #[test]
    fn test_point_codec() {
        let p = ProjectivePoint::GENERATOR * scalar_from_id(5);
        let encoded = encode_point(&p);
        assert_eq!(encoded.len(), COMPRESSED_POINT_SIZE);
        assert_eq!(decode_point(&encoded).unwrap(), p);

        let identity = encode_point(&ProjectivePoint::IDENTITY);
        assert_eq!(identity, vec![0u8]);
        assert!(is_identity(&decode_point(&identity).unwrap()));

        assert!(decode_point(&[0x02; 10]).is_err());
    }
}
