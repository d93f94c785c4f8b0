use std::fmt;

use super::key_id::KeyId;
use super::key_material::PublicKeyPoint;
use crate::error::SigningResult;
use crate::logic::extract_public_point;

/// Opaque capability to ask a store for signatures with one private key
///
/// Holds no key material. The serial is assigned by the store on generation,
/// so a ref issued before a delete (or a re-generation under the same id)
/// no longer matches and the store rejects it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PrivateKeyRef {
    alias: KeyId,
    serial: u64,
}

impl PrivateKeyRef {
    pub fn new(alias: KeyId, serial: u64) -> Self {
        Self { alias, serial }
    }

    pub fn alias(&self) -> &KeyId {
        &self.alias
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }
}

impl fmt::Debug for PrivateKeyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKeyRef({}#{}, [NON-EXTRACTABLE])", self.alias, self.serial)
    }
}

/// Transient handle on a stored key pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPairHandle {
    id: KeyId,
    public_key_der: Vec<u8>,
    private_key: PrivateKeyRef,
}

impl KeyPairHandle {
    /// `public_key_der` is the DER SubjectPublicKeyInfo the store reports
    pub fn new(id: KeyId, public_key_der: Vec<u8>, private_key: PrivateKeyRef) -> Self {
        Self {
            id,
            public_key_der,
            private_key,
        }
    }

    pub fn id(&self) -> &KeyId {
        &self.id
    }

    pub fn public_key_der(&self) -> &[u8] {
        &self.public_key_der
    }

    pub fn private_key(&self) -> &PrivateKeyRef {
        &self.private_key
    }

    /// Uncompressed point of the public key
    pub fn public_point(&self) -> SigningResult<PublicKeyPoint> {
        extract_public_point(&self.public_key_der)
    }
}

/// What a store holds under an alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEntry {
    PrivateKey(KeyPairHandle),
    SecretKey,
    TrustedCertificate,
}

impl StoreEntry {
    pub fn into_key_pair(self) -> Option<KeyPairHandle> {
        match self {
            StoreEntry::PrivateKey(handle) => Some(handle),
            StoreEntry::SecretKey | StoreEntry::TrustedCertificate => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            StoreEntry::PrivateKey(_) => "PrivateKeyEntry",
            StoreEntry::SecretKey => "SecretKeyEntry",
            StoreEntry::TrustedCertificate => "TrustedCertificateEntry",
        }
    }
}

/// Result of a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteOutcome::Deleted => f.write_str("deleted"),
            DeleteOutcome::NotFound => f.write_str("notFound"),
        }
    }
}

impl From<bool> for DeleteOutcome {
    fn from(was_present: bool) -> Self {
        if was_present {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::NotFound
        }
    }
}
