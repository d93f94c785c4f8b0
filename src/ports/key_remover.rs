use crate::error::StoreResult;
use crate::model::KeyId;

/// Capability to delete entries
pub trait KeyRemover {
    /// Delete the entry under `id`, returning whether one was present
    fn delete_key(&self, id: &KeyId) -> StoreResult<bool>;
}
