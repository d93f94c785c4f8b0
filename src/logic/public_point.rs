use der::asn1::ObjectIdentifier;
use der::Decode;
use spki::SubjectPublicKeyInfoRef;

use crate::error::{SigningError, SigningResult};
use crate::model::{PublicKeyPoint, CURVE_NAME};

/// `id-ecPublicKey` (RFC 5480)
pub const ID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// `secp256r1` named curve (RFC 5480)
pub const SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");

/// Extract the 65-byte uncompressed point from a DER SubjectPublicKeyInfo
///
/// # Errors
///
/// Returns `SigningError::InvalidData` if the input is not an EC P-256
/// SubjectPublicKeyInfo, the bit string has unused bits, or the payload is
/// not an uncompressed point.
pub fn extract_public_point(spki_der: &[u8]) -> SigningResult<PublicKeyPoint> {
    let spki = SubjectPublicKeyInfoRef::from_der(spki_der)?;

    spki.algorithm.assert_algorithm_oid(ID_EC_PUBLIC_KEY)?;
    let curve = spki.algorithm.parameters_oid()?;
    if curve != SECP256R1 {
        return Err(SigningError::invalid_data(
            "UnsupportedCurve",
            format!("expected {CURVE_NAME} ({SECP256R1}), got {curve}"),
        ));
    }

    let point = spki.subject_public_key.as_bytes().ok_or_else(|| {
        SigningError::invalid_data("BitString", "public key bit string has unused bits")
    })?;

    Ok(PublicKeyPoint::from_slice(point)?)
}
