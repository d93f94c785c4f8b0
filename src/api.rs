use crate::adapters::MemoryKeyStore;
use crate::error::SigningResult;
use crate::logic;
use crate::use_cases::KeyLifecycleManager;

pub use crate::logic::{CURVE_ORDER, ID_EC_PUBLIC_KEY, SECP256R1};
pub use crate::model::*;

/// Convert a DER `SEQUENCE { INTEGER r, INTEGER s }` into `r ‖ s`
pub fn der_to_p1363(der: &[u8]) -> SigningResult<FixedSignature> {
    logic::der_to_p1363(der)
}

/// Extract the uncompressed P-256 point from a DER SubjectPublicKeyInfo
pub fn extract_public_point(spki_der: &[u8]) -> SigningResult<PublicKeyPoint> {
    logic::extract_public_point(spki_der)
}

/// Lifecycle manager over a fresh in-memory software store
pub fn software_key_manager(policy: KeyPolicy) -> KeyLifecycleManager<MemoryKeyStore> {
    KeyLifecycleManager::with_policy(MemoryKeyStore::new(), policy)
}
