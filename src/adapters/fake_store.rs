#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(test)]
use super::MemoryKeyStore;
#[cfg(test)]
use crate::error::{StoreFault, StoreResult};
#[cfg(test)]
use crate::model::{KeyId, KeyPairHandle, KeyPolicy, PrivateKeyRef, SignatureAlgorithm, StoreEntry};
#[cfg(test)]
use crate::ports::{KeyDirectory, KeyGenerator, KeyRemover, RawSigner};

/// Store wrapper that fails on demand
///
/// Each operation returns its injected fault when one is set and otherwise
/// delegates to the wrapped `MemoryKeyStore`. `raw_signature` replaces the
/// DER a successful signing call returns.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FaultyKeyStore {
    pub inner: MemoryKeyStore,
    pub generate_fault: Option<StoreFault>,
    pub lookup_fault: Option<StoreFault>,
    pub delete_fault: Option<StoreFault>,
    pub sign_fault: Option<StoreFault>,
    pub raw_signature: Option<Vec<u8>>,
    generate_calls: AtomicUsize,
}

#[cfg(test)]
impl FaultyKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_generate(fault: StoreFault) -> Self {
        Self {
            generate_fault: Some(fault),
            ..Self::default()
        }
    }

    pub fn failing_lookup(fault: StoreFault) -> Self {
        Self {
            lookup_fault: Some(fault),
            ..Self::default()
        }
    }

    pub fn failing_delete(fault: StoreFault) -> Self {
        Self {
            delete_fault: Some(fault),
            ..Self::default()
        }
    }

    pub fn failing_sign(fault: StoreFault) -> Self {
        Self {
            sign_fault: Some(fault),
            ..Self::default()
        }
    }

    /// Number of `generate_key` calls that reached the store
    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
fn injected(fault: &Option<StoreFault>) -> StoreResult<()> {
    match fault {
        Some(fault) => Err(fault.clone()),
        None => Ok(()),
    }
}

#[cfg(test)]
impl KeyGenerator for FaultyKeyStore {
    fn generate_key(&self, id: &KeyId, policy: &KeyPolicy) -> StoreResult<KeyPairHandle> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        injected(&self.generate_fault)?;
        self.inner.generate_key(id, policy)
    }
}

#[cfg(test)]
impl KeyDirectory for FaultyKeyStore {
    fn entry(&self, id: &KeyId) -> StoreResult<Option<StoreEntry>> {
        injected(&self.lookup_fault)?;
        self.inner.entry(id)
    }

    fn contains(&self, id: &KeyId) -> StoreResult<bool> {
        injected(&self.lookup_fault)?;
        self.inner.contains(id)
    }
}

#[cfg(test)]
impl KeyRemover for FaultyKeyStore {
    fn delete_key(&self, id: &KeyId) -> StoreResult<bool> {
        injected(&self.delete_fault)?;
        self.inner.delete_key(id)
    }
}

#[cfg(test)]
impl RawSigner for FaultyKeyStore {
    fn sign_raw(
        &self,
        key: &PrivateKeyRef,
        algorithm: SignatureAlgorithm,
        message: &[u8],
    ) -> StoreResult<Vec<u8>> {
        injected(&self.sign_fault)?;
        let der = self.inner.sign_raw(key, algorithm, message)?;
        Ok(self.raw_signature.clone().unwrap_or(der))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract_tests_for;
    use crate::error::FaultDetail;
    use crate::ports::contract_tests::key_store_contract;

    contract_tests_for!(
        faulty_store_contract,
        make = FaultyKeyStore::new,
        tests = {
            test_entry_absent_is_none => key_store_contract::test_entry_absent_is_none,
            test_generate_then_entry_is_key_pair => key_store_contract::test_generate_then_entry_is_key_pair,
            test_delete_reports_presence => key_store_contract::test_delete_reports_presence,
            test_sign_returns_verifiable_der => key_store_contract::test_sign_returns_verifiable_der,
            test_sign_with_deleted_ref_fails => key_store_contract::test_sign_with_deleted_ref_fails,
            test_regenerate_replaces_key => key_store_contract::test_regenerate_replaces_key,
            test_sign_forbidden_by_policy => key_store_contract::test_sign_forbidden_by_policy,
        }
    );

    #[test]
    fn test_injected_fault_is_returned() {
        let fault = StoreFault::Unavailable(FaultDetail::new("KeyStoreException", "locked"));
        let store = FaultyKeyStore::failing_lookup(fault.clone());

        assert_eq!(
            store.contains(&KeyId::new("k1").unwrap()).unwrap_err(),
            fault
        );
    }

    #[test]
    fn test_generate_calls_are_counted() {
        let store = FaultyKeyStore::new();
        let id = KeyId::new("k1").unwrap();
        store.generate_key(&id, &KeyPolicy::default()).unwrap();
        store.generate_key(&id, &KeyPolicy::default()).unwrap();

        assert_eq!(store.generate_calls(), 2);
    }
}
