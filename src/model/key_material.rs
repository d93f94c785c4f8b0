use std::fmt;

use thiserror::Error;

use super::algorithm::{FIELD_BYTE_LENGTH, PUBLIC_POINT_LENGTH, SIGNATURE_LENGTH};

/// SEC1 tag of an uncompressed point
pub const UNCOMPRESSED_POINT_TAG: u8 = 0x04;

/// Uncompressed P-256 public point, `0x04 ‖ X ‖ Y`
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKeyPoint([u8; PUBLIC_POINT_LENGTH]);

impl PublicKeyPoint {
    pub fn from_slice(point: &[u8]) -> Result<Self, KeyMaterialError> {
        if point.len() != PUBLIC_POINT_LENGTH {
            return Err(KeyMaterialError::InvalidLength {
                expected: PUBLIC_POINT_LENGTH,
                actual: point.len(),
            });
        }
        if point[0] != UNCOMPRESSED_POINT_TAG {
            return Err(KeyMaterialError::NotUncompressed { tag: point[0] });
        }
        let mut bytes = [0u8; PUBLIC_POINT_LENGTH];
        bytes.copy_from_slice(point);
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_array(&self) -> &[u8; PUBLIC_POINT_LENGTH] {
        &self.0
    }

    pub fn x(&self) -> &[u8] {
        &self.0[1..1 + FIELD_BYTE_LENGTH]
    }

    pub fn y(&self) -> &[u8] {
        &self.0[1 + FIELD_BYTE_LENGTH..]
    }
}

impl fmt::Debug for PublicKeyPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKeyPoint({})", hex::encode(&self.0[..9]))
    }
}

impl AsRef<[u8]> for PublicKeyPoint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// ECDSA signature in IEEE P1363 form, `r ‖ s`, each 32 bytes big-endian
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FixedSignature([u8; SIGNATURE_LENGTH]);

impl FixedSignature {
    pub fn from_parts(r: &[u8; FIELD_BYTE_LENGTH], s: &[u8; FIELD_BYTE_LENGTH]) -> Self {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..FIELD_BYTE_LENGTH].copy_from_slice(r);
        bytes[FIELD_BYTE_LENGTH..].copy_from_slice(s);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_array(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    pub fn r(&self) -> &[u8] {
        &self.0[..FIELD_BYTE_LENGTH]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[FIELD_BYTE_LENGTH..]
    }
}

impl fmt::Debug for FixedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedSignature({})", hex::encode(self.0))
    }
}

impl AsRef<[u8]> for FixedSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyMaterialError {
    #[error("Public point must be exactly {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Public point must be uncompressed (0x04), got tag {tag:#04x}")]
    NotUncompressed { tag: u8 },
}
