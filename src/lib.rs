//! Named, non-extractable P-256 key pairs behind a secure key store
//!
//! The crate drives the key lifecycle (create if absent, look up, delete)
//! over store ports, asks the store for ECDSA signatures and turns the DER
//! it returns into the fixed 64-byte `r ‖ s` form. It also extracts the
//! 65-byte uncompressed point from the public key the store reports.

mod adapters;
pub mod api;
pub mod error;
mod logic;
pub mod model;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use adapters::MemoryKeyStore;
pub use error::{ErrorKind, FaultDetail, SigningError, SigningResult, StoreFault, StoreOperation, StoreResult};
pub use use_cases::{sign_and_encode, KeyLifecycleManager};

// Re-export public API
pub use api::{der_to_p1363, extract_public_point, software_key_manager};
