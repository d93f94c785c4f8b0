//! Ports (traits) for the secure key store
//!
//! The core depends on these abstractions, never on a concrete store.
//! A hardware keystore binding, the in-memory software store and the test
//! fakes all plug in here.

mod key_directory;
mod key_generator;
mod key_remover;
mod raw_signer;

pub use key_directory::KeyDirectory;
pub use key_generator::KeyGenerator;
pub use key_remover::KeyRemover;
pub use raw_signer::RawSigner;

/// Combined trait for all store operations
pub trait SecureKeyStore: KeyGenerator + KeyDirectory + KeyRemover + RawSigner {}

// Blanket implementation for types that implement all operation traits
impl<T> SecureKeyStore for T where T: KeyGenerator + KeyDirectory + KeyRemover + RawSigner {}
