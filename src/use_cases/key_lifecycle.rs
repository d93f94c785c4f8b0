//! Key lifecycle use case
//!
//! Maps a caller-chosen key identifier onto store operations. Every
//! operation is idempotent for sequential callers; no lock is taken
//! against concurrent callers using the same identifier.

use tracing::{debug, info};

use super::sign_and_encode;
use crate::error::{SigningError, SigningResult, StoreOperation};
use crate::model::{DeleteOutcome, FixedSignature, KeyId, KeyPairHandle, KeyPolicy, StoreEntry};
use crate::ports::SecureKeyStore;

/// Creates, looks up, deletes and signs with named P-256 key pairs
#[derive(Debug)]
pub struct KeyLifecycleManager<S> {
    store: S,
    policy: KeyPolicy,
}

impl<S: SecureKeyStore> KeyLifecycleManager<S> {
    /// Manager generating keys under `KeyPolicy::default()`
    pub fn new(store: S) -> Self {
        Self::with_policy(store, KeyPolicy::default())
    }

    pub fn with_policy(store: S, policy: KeyPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> &KeyPolicy {
        &self.policy
    }

    /// Generate a new key pair under `id`, replacing any existing entry
    ///
    /// # Errors
    ///
    /// - `KeyGenerationError` if the store refuses the policy or lacks the
    ///   algorithm
    /// - `SecureLockScreenDisabled` if the policy needs user authentication
    ///   on a device without a secure lock screen
    /// - `StoreError` if the store cannot be accessed
    pub fn generate(&self, id: &KeyId) -> SigningResult<KeyPairHandle> {
        let handle = self
            .store
            .generate_key(id, &self.policy)
            .map_err(|fault| fault.classify(StoreOperation::Generate))?;
        info!("Generated key pair {}", id);
        Ok(handle)
    }

    /// Whether any entry exists under `id`
    pub fn exists(&self, id: &KeyId) -> SigningResult<bool> {
        self.store
            .contains(id)
            .map_err(|fault| fault.classify(StoreOperation::Lookup))
    }

    /// Return the key pair under `id`, generating it when absent
    ///
    /// # Errors
    ///
    /// - `MissingKey` if the entry under `id` is not a key pair
    /// - any error of [`Self::generate`] when the key is absent
    pub fn fetch_or_create(&self, id: &KeyId) -> SigningResult<KeyPairHandle> {
        match self.lookup(id)? {
            Some(entry) => key_pair(id, entry),
            None => {
                debug!("No entry under {}, generating", id);
                self.generate(id)
            }
        }
    }

    /// Return the key pair under `id`
    ///
    /// # Errors
    ///
    /// `MissingKey` if nothing is stored under `id` or the entry is not a key
    /// pair.
    pub fn fetch(&self, id: &KeyId) -> SigningResult<KeyPairHandle> {
        match self.lookup(id)? {
            Some(entry) => key_pair(id, entry),
            None => Err(SigningError::missing_key(
                "KeyNotFound",
                format!("no entry under {id}"),
            )),
        }
    }

    /// Delete the entry under `id`; absence is reported, not an error
    pub fn delete(&self, id: &KeyId) -> SigningResult<DeleteOutcome> {
        let outcome: DeleteOutcome = self
            .store
            .delete_key(id)
            .map_err(|fault| fault.classify(StoreOperation::Delete))?
            .into();
        info!("Delete {}: {}", id, outcome);
        Ok(outcome)
    }

    /// Sign `message` with the key behind `handle` using this manager's store
    pub fn sign(&self, handle: &KeyPairHandle, message: &[u8]) -> SigningResult<FixedSignature> {
        sign_and_encode(&self.store, handle, message)
    }

    fn lookup(&self, id: &KeyId) -> SigningResult<Option<StoreEntry>> {
        self.store
            .entry(id)
            .map_err(|fault| fault.classify(StoreOperation::Lookup))
    }
}

fn key_pair(id: &KeyId, entry: StoreEntry) -> SigningResult<KeyPairHandle> {
    let found = entry.type_name();
    entry.into_key_pair().ok_or_else(|| {
        SigningError::missing_key(
            "WrongEntryType",
            format!("entry under {id} is a {found}, not a key pair"),
        )
    })
}
