//! DER to IEEE P1363 transcoding of ECDSA signatures
//!
//! A signing primitive emits `SEQUENCE { INTEGER r, INTEGER s }` with
//! variable-length, sign-padded integers. Callers want `r ‖ s` with each
//! half exactly [`FIELD_BYTE_LENGTH`] bytes.

use der::asn1::UintRef;
use der::{Decode, Sequence};
use tracing::debug;

use crate::error::{SigningError, SigningResult};
use crate::model::{FixedSignature, FIELD_BYTE_LENGTH};

/// Order n of the P-256 group, big-endian
pub const CURVE_ORDER: [u8; FIELD_BYTE_LENGTH] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xBC, 0xE6, 0xFA, 0xAD, 0xA7, 0x17, 0x9E, 0x84, 0xF3, 0xB9, 0xCA, 0xC2, 0xFC, 0x63, 0x25, 0x51,
];

/// `Ecdsa-Sig-Value` from RFC 3279
#[derive(Sequence)]
struct EcdsaSigValue<'a> {
    r: UintRef<'a>,
    s: UintRef<'a>,
}

/// Convert a DER ECDSA signature into its fixed 64-byte P1363 form
///
/// Decoding is strict DER: a third element, trailing bytes, negative or
/// non-minimally encoded integers are rejected. Each integer must lie in
/// `[1, n-1]`.
///
/// # Errors
///
/// Returns `SigningError::InvalidData` for any malformed or out of range input.
pub fn der_to_p1363(der: &[u8]) -> SigningResult<FixedSignature> {
    let value = EcdsaSigValue::from_der(der)?;

    let r = to_field_bytes(value.r.as_bytes(), "r")?;
    let s = to_field_bytes(value.s.as_bytes(), "s")?;

    debug!("Converted {} byte DER signature to P1363", der.len());
    Ok(FixedSignature::from_parts(&r, &s))
}

/// Left-pad an unsigned big-endian integer to the field width and range check it
fn to_field_bytes(value: &[u8], name: &str) -> SigningResult<[u8; FIELD_BYTE_LENGTH]> {
    let first_digit = value
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(value.len());
    let digits = &value[first_digit..];

    if digits.is_empty() {
        return Err(SigningError::invalid_data(
            "SignatureRange",
            format!("{name} is zero"),
        ));
    }
    if digits.len() > FIELD_BYTE_LENGTH {
        return Err(SigningError::invalid_data(
            "SignatureRange",
            format!(
                "{name} is {} bytes, wider than the {FIELD_BYTE_LENGTH} byte field",
                digits.len()
            ),
        ));
    }

    let mut out = [0u8; FIELD_BYTE_LENGTH];
    out[FIELD_BYTE_LENGTH - digits.len()..].copy_from_slice(digits);

    // Fixed-width big-endian arrays compare like the integers they encode.
    if out >= CURVE_ORDER {
        return Err(SigningError::invalid_data(
            "SignatureRange",
            format!("{name} is not below the curve order"),
        ));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use p256::ecdsa::{signature::Signer, Signature, SigningKey};

    fn der_int(content: &[u8]) -> Vec<u8> {
        let mut out = vec![0x02, content.len() as u8];
        out.extend_from_slice(content);
        out
    }

    fn der_seq(parts: &[Vec<u8>]) -> Vec<u8> {
        let body = parts.concat();
        let mut out = vec![0x30, body.len() as u8];
        out.extend(body);
        out
    }

    fn assert_invalid(der: &[u8]) {
        let err = der_to_p1363(der).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData, "{err}");
    }

    #[test]
    fn test_full_width_integers() {
        let der = der_seq(&[der_int(&[0x01; 32]), der_int(&[0x02; 32])]);
        let sig = der_to_p1363(&der).unwrap();
        assert_eq!(sig.r(), &[0x01; 32]);
        assert_eq!(sig.s(), &[0x02; 32]);
    }

    #[test]
    fn test_short_r_is_left_padded() {
        let der = der_seq(&[der_int(&[0x01; 31]), der_int(&[0x02; 32])]);
        let sig = der_to_p1363(&der).unwrap();

        assert_eq!(sig.as_bytes().len(), 64);
        assert_eq!(sig.r()[0], 0x00);
        assert_eq!(&sig.r()[1..], &[0x01; 31]);
    }

    #[test]
    fn test_very_short_s_is_left_padded() {
        let der = der_seq(&[der_int(&[0x01; 32]), der_int(&[0x05])]);
        let sig = der_to_p1363(&der).unwrap();

        let mut expected = [0u8; 32];
        expected[31] = 0x05;
        assert_eq!(sig.s(), &expected);
    }

    #[test]
    fn test_guard_byte_is_stripped() {
        let mut r = vec![0x00];
        r.extend_from_slice(&[0x80; 32]);
        let der = der_seq(&[der_int(&r), der_int(&[0x02; 32])]);

        let sig = der_to_p1363(&der).unwrap();
        assert_eq!(sig.r(), &[0x80; 32]);
    }

    #[test]
    fn test_deterministic() {
        let der = der_seq(&[der_int(&[0x01; 31]), der_int(&[0x7f; 30])]);
        assert_eq!(der_to_p1363(&der).unwrap(), der_to_p1363(&der).unwrap());
    }

    #[test]
    fn test_order_minus_one_accepted() {
        let mut r = vec![0x00];
        r.extend_from_slice(&CURVE_ORDER);
        *r.last_mut().unwrap() -= 1;
        let der = der_seq(&[der_int(&r), der_int(&[0x02; 32])]);

        let sig = der_to_p1363(&der).unwrap();
        assert_eq!(&sig.r()[..31], &CURVE_ORDER[..31]);
        assert_eq!(sig.r()[31], 0x50);
    }

    #[test]
    fn test_r_equal_to_order_rejected() {
        let mut r = vec![0x00];
        r.extend_from_slice(&CURVE_ORDER);
        assert_invalid(&der_seq(&[der_int(&r), der_int(&[0x02; 32])]));
    }

    #[test]
    fn test_s_above_order_rejected() {
        let mut s = vec![0x00];
        s.extend_from_slice(&[0xFF; 32]);
        assert_invalid(&der_seq(&[der_int(&[0x01; 32]), der_int(&s)]));
    }

    #[test]
    fn test_zero_rejected() {
        assert_invalid(&der_seq(&[der_int(&[0x00]), der_int(&[0x02; 32])]));
        assert_invalid(&der_seq(&[der_int(&[0x01; 32]), der_int(&[0x00])]));
    }

    #[test]
    fn test_wider_than_field_rejected() {
        let mut r = vec![0x01];
        r.extend_from_slice(&[0x00; 32]);
        assert_invalid(&der_seq(&[der_int(&r), der_int(&[0x02; 32])]));
    }

    #[test]
    fn test_three_elements_rejected() {
        assert_invalid(&der_seq(&[
            der_int(&[0x01; 32]),
            der_int(&[0x02; 32]),
            der_int(&[0x03; 32]),
        ]));
    }

    #[test]
    fn test_one_element_rejected() {
        assert_invalid(&der_seq(&[der_int(&[0x01; 32])]));
    }

    #[test]
    fn test_negative_integer_rejected() {
        assert_invalid(&der_seq(&[der_int(&[0x80; 32]), der_int(&[0x02; 32])]));
    }

    #[test]
    fn test_non_minimal_integer_rejected() {
        assert_invalid(&der_seq(&[der_int(&[0x00, 0x01]), der_int(&[0x02; 32])]));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut der = der_seq(&[der_int(&[0x01; 32]), der_int(&[0x02; 32])]);
        der.push(0x00);
        assert_invalid(&der);
    }

    #[test]
    fn test_wrong_outer_tag_rejected() {
        let mut der = der_seq(&[der_int(&[0x01; 32]), der_int(&[0x02; 32])]);
        der[0] = 0x31;
        assert_invalid(&der);
    }

    #[test]
    fn test_truncated_and_empty_rejected() {
        let der = der_seq(&[der_int(&[0x01; 32]), der_int(&[0x02; 32])]);
        assert_invalid(&der[..der.len() - 1]);
        assert_invalid(&[]);
    }

    #[test]
    fn test_matches_p256_fixed_encoding() {
        let signing_key = SigningKey::from_slice(&[0x42; 32]).unwrap();

        for i in 0..64u32 {
            let message = format!("message {i}");
            let signature: Signature = signing_key.sign(message.as_bytes());
            let der = signature.to_der();

            let fixed = der_to_p1363(der.as_bytes()).unwrap();
            assert_eq!(fixed.as_bytes(), signature.to_bytes().as_slice());
        }
    }
}
