//! KeyGenerator trait - capability to create key pairs inside the store

use crate::error::StoreResult;
use crate::model::{KeyId, KeyPairHandle, KeyPolicy};

/// Capability to generate non-extractable P-256 key pairs
pub trait KeyGenerator {
    /// Generate a new key pair under `id`
    ///
    /// An existing entry under the same alias is replaced; the store decides
    /// what happens to concurrent generations.
    ///
    /// # Errors
    ///
    /// Returns a fault if:
    /// - The algorithm or provider is unavailable
    /// - The policy is rejected (e.g. no secure lock screen)
    fn generate_key(&self, id: &KeyId, policy: &KeyPolicy) -> StoreResult<KeyPairHandle>;
}
