//! RawSigner trait - capability to sign with a stored private key

use crate::error::StoreResult;
use crate::model::{PrivateKeyRef, SignatureAlgorithm};

/// Capability to sign data with a key that never leaves the store
pub trait RawSigner {
    /// Sign `message` with the referenced private key
    ///
    /// The store hashes the message as `algorithm` prescribes.
    ///
    /// # Returns
    ///
    /// The signature as emitted by the signing primitive (ASN.1 DER)
    ///
    /// # Errors
    ///
    /// Returns a fault if:
    /// - The ref is stale or the key is not bound to `algorithm`
    /// - The key requires a user authentication that has not happened
    /// - The signing primitive fails
    fn sign_raw(
        &self,
        key: &PrivateKeyRef,
        algorithm: SignatureAlgorithm,
        message: &[u8],
    ) -> StoreResult<Vec<u8>>;
}
