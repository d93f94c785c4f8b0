//! Key generation policy handed to the store
//!
//! The authentication part is opaque to this crate: it is forwarded to the
//! store as-is and only stores give it meaning.

use std::time::Duration;

use super::algorithm::{Digest, SignatureAlgorithm};

/// Operation a generated key may be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPurpose {
    Sign,
    Verify,
}

/// Way a user can prove presence to unlock an authentication-gated key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Authenticator {
    BiometricStrong,
    DeviceCredential,
}

/// User authentication requirement attached to a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationPolicy {
    /// How long one successful authentication keeps the key usable
    pub validity: Duration,
    /// Accepted authenticators
    pub authenticators: Vec<Authenticator>,
}

impl AuthenticationPolicy {
    pub const DEFAULT_VALIDITY: Duration = Duration::from_secs(15 * 60);
}

impl Default for AuthenticationPolicy {
    fn default() -> Self {
        Self {
            validity: Self::DEFAULT_VALIDITY,
            authenticators: vec![Authenticator::BiometricStrong, Authenticator::DeviceCredential],
        }
    }
}

/// Policy under which the store generates a non-extractable P-256 key pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPolicy {
    pub purposes: Vec<KeyPurpose>,
    pub digests: Vec<Digest>,
    /// `None` means the key is usable without user authentication
    pub authentication: Option<AuthenticationPolicy>,
}

impl KeyPolicy {
    /// Sign/verify key gated by a 15 minute biometric or device credential window
    pub fn recommended() -> Self {
        Self {
            authentication: Some(AuthenticationPolicy::default()),
            ..Self::default()
        }
    }

    pub fn with_authentication(mut self, authentication: AuthenticationPolicy) -> Self {
        self.authentication = Some(authentication);
        self
    }

    pub fn requires_authentication(&self) -> bool {
        self.authentication.is_some()
    }

    /// Whether a key generated under this policy may sign with `algorithm`
    pub fn allows_signing(&self, algorithm: SignatureAlgorithm) -> bool {
        self.purposes.contains(&KeyPurpose::Sign) && self.digests.contains(&algorithm.digest())
    }
}

impl Default for KeyPolicy {
    fn default() -> Self {
        Self {
            purposes: vec![KeyPurpose::Sign, KeyPurpose::Verify],
            digests: vec![Digest::Sha256, Digest::Sha512],
            authentication: None,
        }
    }
}
