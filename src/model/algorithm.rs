//! Signature algorithm and curve parameters

/// Name of the only supported curve (NIST P-256)
pub const CURVE_NAME: &str = "secp256r1";

/// Byte length of a P-256 field element and of each signature integer
pub const FIELD_BYTE_LENGTH: usize = 32;

/// Byte length of an uncompressed P-256 point (`0x04 ‖ X ‖ Y`)
pub const PUBLIC_POINT_LENGTH: usize = 1 + 2 * FIELD_BYTE_LENGTH;

/// Byte length of a P1363 signature (`r ‖ s`)
pub const SIGNATURE_LENGTH: usize = 2 * FIELD_BYTE_LENGTH;

/// Message digest a key may be used with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Digest {
    Sha256,
    Sha512,
}

impl Digest {
    pub fn name(self) -> &'static str {
        match self {
            Digest::Sha256 => "SHA-256",
            Digest::Sha512 => "SHA-512",
        }
    }
}

/// Algorithm the store is asked to sign with
///
/// The store hashes the message itself; callers pass the raw message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// ECDSA over P-256 with SHA-256
    EcdsaP256Sha256,
}

impl SignatureAlgorithm {
    pub fn name(self) -> &'static str {
        match self {
            SignatureAlgorithm::EcdsaP256Sha256 => "SHA256withECDSA",
        }
    }

    pub fn digest(self) -> Digest {
        match self {
            SignatureAlgorithm::EcdsaP256Sha256 => Digest::Sha256,
        }
    }
}

impl Default for SignatureAlgorithm {
    fn default() -> Self {
        Self::EcdsaP256Sha256
    }
}
