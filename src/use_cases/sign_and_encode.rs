//! Sign use case
//!
//! Asks the store for a DER signature bound to the handle's private key and
//! transcodes it into the fixed 64-byte form.

use tracing::debug;

use crate::error::{SigningResult, StoreOperation};
use crate::logic::der_to_p1363;
use crate::model::{FixedSignature, KeyPairHandle, SignatureAlgorithm};
use crate::ports::RawSigner;

/// Sign `message` with the key behind `handle`
///
/// The store hashes with SHA-256 and signs with ECDSA over P-256. The
/// returned signature is `r ‖ s`, each half 32 bytes.
///
/// # Errors
///
/// - `InvalidData` if the store rejects the key or its signing primitive
///   fails, or if the DER it returns is malformed
/// - `UserNotAuthenticated` if the key needs a fresh user authentication
/// - `StoreError` for other store access faults
pub fn sign_and_encode<S>(
    store: &S,
    handle: &KeyPairHandle,
    message: &[u8],
) -> SigningResult<FixedSignature>
where
    S: RawSigner + ?Sized,
{
    let der = store
        .sign_raw(
            handle.private_key(),
            SignatureAlgorithm::EcdsaP256Sha256,
            message,
        )
        .map_err(|fault| fault.classify(StoreOperation::Sign))?;

    debug!("Store returned {} byte signature for {}", der.len(), handle.id());

    der_to_p1363(&der)
}
