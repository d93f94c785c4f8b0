//! In-memory software implementation of the key store ports
//!
//! Keys live in process memory and sign with the `p256` crate. The store
//! behaves like a hardware keystore where it matters to the core: policies
//! are enforced at signing time, refs go stale on delete or re-generation,
//! authentication-gated keys need a secure lock screen and an open
//! authentication window. Nothing is persisted.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey};
use p256::elliptic_curve::rand_core::OsRng;
use p256::pkcs8::EncodePublicKey;
use tracing::{debug, info, warn};

use crate::error::{FaultDetail, StoreFault, StoreResult};
use crate::model::{
    KeyId, KeyPairHandle, KeyPolicy, PrivateKeyRef, SignatureAlgorithm, StoreEntry,
};
use crate::ports::{KeyDirectory, KeyGenerator, KeyRemover, RawSigner};

const PROVIDER: &str = "MemoryKeyStore";

fn fault(message: impl Into<String>) -> FaultDetail {
    FaultDetail::new(PROVIDER, message)
}

struct StoredKeyPair {
    serial: u64,
    signing_key: SigningKey,
    public_key_der: Vec<u8>,
    policy: KeyPolicy,
}

impl StoredKeyPair {
    fn handle(&self, id: &KeyId) -> KeyPairHandle {
        KeyPairHandle::new(
            id.clone(),
            self.public_key_der.clone(),
            PrivateKeyRef::new(id.clone(), self.serial),
        )
    }
}

enum StoredEntry {
    KeyPair(StoredKeyPair),
    Secret,
}

struct StoreState {
    entries: HashMap<KeyId, StoredEntry>,
    next_serial: u64,
    secure_lock_screen: bool,
    last_authentication: Option<Instant>,
}

/// Software key store holding P-256 key pairs in memory
///
/// Safe to share between threads; every call takes the internal lock once.
pub struct MemoryKeyStore {
    state: Mutex<StoreState>,
}

impl MemoryKeyStore {
    /// Empty store on a device with a secure lock screen
    pub fn new() -> Self {
        Self::with_lock_screen(true)
    }

    /// Empty store on a device without a secure lock screen
    ///
    /// Generating authentication-gated keys fails on such a device.
    pub fn without_secure_lock_screen() -> Self {
        Self::with_lock_screen(false)
    }

    fn with_lock_screen(secure_lock_screen: bool) -> Self {
        Self {
            state: Mutex::new(StoreState {
                entries: HashMap::new(),
                next_serial: 1,
                secure_lock_screen,
                last_authentication: None,
            }),
        }
    }

    /// Record a successful user authentication, opening the validity window
    /// of authentication-gated keys
    pub fn authenticate_user(&self) -> StoreResult<()> {
        let mut state = self.lock()?;
        state.last_authentication = Some(Instant::now());
        debug!("User authenticated");
        Ok(())
    }

    /// Store a secret (non key-pair) entry under `id`
    pub fn insert_secret_entry(&self, id: &KeyId) -> StoreResult<()> {
        let mut state = self.lock()?;
        state.entries.insert(id.clone(), StoredEntry::Secret);
        Ok(())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|_| StoreFault::Unavailable(fault("store state lock poisoned")))
    }
}

impl Default for MemoryKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryKeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryKeyStore").finish_non_exhaustive()
    }
}

impl KeyGenerator for MemoryKeyStore {
    fn generate_key(&self, id: &KeyId, policy: &KeyPolicy) -> StoreResult<KeyPairHandle> {
        if policy.purposes.is_empty() || policy.digests.is_empty() {
            return Err(StoreFault::InvalidParameters(fault(
                "policy must name at least one purpose and one digest",
            )));
        }

        let mut state = self.lock()?;

        if policy.requires_authentication() && !state.secure_lock_screen {
            warn!("Refusing authentication-gated key {} without lock screen", id);
            return Err(StoreFault::LockScreenDisabled(fault(
                "secure lock screen must be enabled to create keys requiring user authentication",
            )));
        }

        let signing_key = SigningKey::random(&mut OsRng);
        let public_key_der = signing_key
            .verifying_key()
            .to_public_key_der()
            .map_err(|e| StoreFault::Other(FaultDetail::new("spki::Error", e.to_string())))?
            .as_bytes()
            .to_vec();

        let serial = state.next_serial;
        state.next_serial += 1;

        let stored = StoredKeyPair {
            serial,
            signing_key,
            public_key_der,
            policy: policy.clone(),
        };
        let handle = stored.handle(id);

        if state
            .entries
            .insert(id.clone(), StoredEntry::KeyPair(stored))
            .is_some()
        {
            debug!("Replaced existing entry {}", id);
        }

        info!("Key pair {} generated (serial {})", id, serial);
        Ok(handle)
    }
}

impl KeyDirectory for MemoryKeyStore {
    fn entry(&self, id: &KeyId) -> StoreResult<Option<StoreEntry>> {
        let state = self.lock()?;
        Ok(state.entries.get(id).map(|entry| match entry {
            StoredEntry::KeyPair(stored) => StoreEntry::PrivateKey(stored.handle(id)),
            StoredEntry::Secret => StoreEntry::SecretKey,
        }))
    }

    fn contains(&self, id: &KeyId) -> StoreResult<bool> {
        let state = self.lock()?;
        Ok(state.entries.contains_key(id))
    }
}

impl KeyRemover for MemoryKeyStore {
    fn delete_key(&self, id: &KeyId) -> StoreResult<bool> {
        let mut state = self.lock()?;
        let was_present = state.entries.remove(id).is_some();
        debug!("Delete {}: present={}", id, was_present);
        Ok(was_present)
    }
}

impl RawSigner for MemoryKeyStore {
    fn sign_raw(
        &self,
        key: &PrivateKeyRef,
        algorithm: SignatureAlgorithm,
        message: &[u8],
    ) -> StoreResult<Vec<u8>> {
        let state = self.lock()?;

        let stored = match state.entries.get(key.alias()) {
            Some(StoredEntry::KeyPair(stored)) if stored.serial == key.serial() => stored,
            _ => {
                return Err(StoreFault::InvalidKey(fault(format!(
                    "key {} is no longer in the store",
                    key.alias()
                ))))
            }
        };

        if !stored.policy.allows_signing(algorithm) {
            return Err(StoreFault::InvalidKey(fault(format!(
                "key {} is not authorized for {}",
                key.alias(),
                algorithm.name()
            ))));
        }

        if let Some(authentication) = &stored.policy.authentication {
            let authenticated = state
                .last_authentication
                .map(|at| at.elapsed() <= authentication.validity)
                .unwrap_or(false);
            if !authenticated {
                return Err(StoreFault::UserNotAuthenticated(fault(format!(
                    "key {} requires user authentication",
                    key.alias()
                ))));
            }
        }

        let signature: Signature = stored
            .signing_key
            .try_sign(message)
            .map_err(|e| StoreFault::SignatureFailed(FaultDetail::new("signature::Error", e.to_string())))?;

        debug!(
            "Signed {} bytes with {} using {}",
            message.len(),
            key.alias(),
            algorithm.name()
        );
        Ok(signature.to_der().as_bytes().to_vec())
    }
}
