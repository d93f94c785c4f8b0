//! Adapters - concrete implementations of ports (traits)

mod memory_store;

#[cfg(test)]
pub mod fake_store;

// Re-export for convenience
pub use memory_store::MemoryKeyStore;
