use crate::error::StoreResult;
use crate::model::{KeyId, StoreEntry};

/// Capability to look up entries by alias
pub trait KeyDirectory {
    /// Entry stored under `id`, `None` when nothing is there
    fn entry(&self, id: &KeyId) -> StoreResult<Option<StoreEntry>>;

    fn contains(&self, id: &KeyId) -> StoreResult<bool>;
}
