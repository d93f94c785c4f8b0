//! Error types for securesign
//!
//! Every failure surfaced by the lifecycle manager or the signature codec is
//! a [`SigningError`], a closed set of kinds. Stores report their own
//! failures as [`StoreFault`], which is classified onto a kind depending on
//! the operation that was running.

use std::fmt;

use thiserror::Error;

/// Result type alias for securesign operations
pub type SigningResult<T> = Result<T, SigningError>;

/// Result type alias for store port calls
pub type StoreResult<T> = Result<T, StoreFault>;

/// Name and message of an underlying platform fault
///
/// Carried for diagnostics only. Nothing in this crate branches on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultDetail {
    pub name: String,
    pub message: String,
}

impl FaultDetail {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FaultDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

fn with_cause(cause: &Option<FaultDetail>) -> String {
    match cause {
        Some(detail) => format!(" ({detail})"),
        None => String::new(),
    }
}

/// Top-level error type for all securesign operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// The key store could not be accessed
    #[error("KeyStore related error{}", with_cause(.cause))]
    StoreError { cause: Option<FaultDetail> },

    /// No usable key pair under the identifier, or the identifier is empty
    #[error("Empty key or missing key pair{}", with_cause(.cause))]
    MissingKey { cause: Option<FaultDetail> },

    /// Malformed signature or key encoding, or a key the store refused to use
    #[error("The data is in an invalid format{}", with_cause(.cause))]
    InvalidData { cause: Option<FaultDetail> },

    /// The store refused to generate the key pair
    #[error("Error while generating the key{}", with_cause(.cause))]
    KeyGenerationError { cause: Option<FaultDetail> },

    /// Authentication-gated keys need a secure lock screen
    #[error(
        "Secure lock screen must be enabled to create keys requiring user authentication{}",
        with_cause(.cause)
    )]
    SecureLockScreenDisabled { cause: Option<FaultDetail> },

    /// The store wants a user authentication that has not happened yet
    #[error("User must be authenticated to use the key{}", with_cause(.cause))]
    UserNotAuthenticated { cause: Option<FaultDetail> },

    /// Unclassified failure
    #[error("Unknown error{}", with_cause(.cause))]
    UnknownError { cause: Option<FaultDetail> },
}

/// The closed set of failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    StoreError,
    MissingKey,
    InvalidData,
    KeyGenerationError,
    SecureLockScreenDisabled,
    UserNotAuthenticated,
    UnknownError,
}

impl ErrorKind {
    /// Stable code used when the error crosses a transport boundary
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::StoreError => "keystoreError",
            ErrorKind::MissingKey => "missingKey",
            ErrorKind::InvalidData => "invalidData",
            ErrorKind::KeyGenerationError => "keyGenerationError",
            ErrorKind::SecureLockScreenDisabled => "secureLockScreenDisabled",
            ErrorKind::UserNotAuthenticated => "userNotAuthenticated",
            ErrorKind::UnknownError => "unknownError",
        }
    }

    /// Whether repeating the same call can succeed once the caller acts
    ///
    /// Only an authentication prompt changes the outcome of a repeated call.
    /// Malformed input never does.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::UserNotAuthenticated)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl SigningError {
    /// Build the error of the given kind
    pub fn new(kind: ErrorKind, cause: Option<FaultDetail>) -> Self {
        match kind {
            ErrorKind::StoreError => SigningError::StoreError { cause },
            ErrorKind::MissingKey => SigningError::MissingKey { cause },
            ErrorKind::InvalidData => SigningError::InvalidData { cause },
            ErrorKind::KeyGenerationError => SigningError::KeyGenerationError { cause },
            ErrorKind::SecureLockScreenDisabled => {
                SigningError::SecureLockScreenDisabled { cause }
            }
            ErrorKind::UserNotAuthenticated => SigningError::UserNotAuthenticated { cause },
            ErrorKind::UnknownError => SigningError::UnknownError { cause },
        }
    }

    pub fn invalid_data(name: impl Into<String>, message: impl Into<String>) -> Self {
        SigningError::InvalidData {
            cause: Some(FaultDetail::new(name, message)),
        }
    }

    pub fn missing_key(name: impl Into<String>, message: impl Into<String>) -> Self {
        SigningError::MissingKey {
            cause: Some(FaultDetail::new(name, message)),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SigningError::StoreError { .. } => ErrorKind::StoreError,
            SigningError::MissingKey { .. } => ErrorKind::MissingKey,
            SigningError::InvalidData { .. } => ErrorKind::InvalidData,
            SigningError::KeyGenerationError { .. } => ErrorKind::KeyGenerationError,
            SigningError::SecureLockScreenDisabled { .. } => ErrorKind::SecureLockScreenDisabled,
            SigningError::UserNotAuthenticated { .. } => ErrorKind::UserNotAuthenticated,
            SigningError::UnknownError { .. } => ErrorKind::UnknownError,
        }
    }

    pub fn cause(&self) -> Option<&FaultDetail> {
        match self {
            SigningError::StoreError { cause }
            | SigningError::MissingKey { cause }
            | SigningError::InvalidData { cause }
            | SigningError::KeyGenerationError { cause }
            | SigningError::SecureLockScreenDisabled { cause }
            | SigningError::UserNotAuthenticated { cause }
            | SigningError::UnknownError { cause } => cause.as_ref(),
        }
    }
}

/// Store operation in progress when a fault happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Generate,
    Lookup,
    Delete,
    Sign,
}

/// Failure reported by a key store adapter
///
/// Adapters translate their platform errors into one of these variants.
/// The set is closed so that no platform error type leaks past a port.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreFault {
    /// The store could not be opened, loaded or queried
    #[error("key store unavailable: {0}")]
    Unavailable(FaultDetail),

    /// Requested key algorithm or provider does not exist
    #[error("algorithm or provider unavailable: {0}")]
    AlgorithmUnavailable(FaultDetail),

    /// Key parameters were refused
    #[error("key parameters rejected: {0}")]
    InvalidParameters(FaultDetail),

    /// The device has no secure lock screen configured
    #[error("secure lock screen disabled: {0}")]
    LockScreenDisabled(FaultDetail),

    /// The key requires a user authentication that has not happened
    #[error("user not authenticated: {0}")]
    UserNotAuthenticated(FaultDetail),

    /// The key cannot be used for the request (stale ref, wrong binding)
    #[error("key rejected: {0}")]
    InvalidKey(FaultDetail),

    /// The signing primitive failed
    #[error("signature operation failed: {0}")]
    SignatureFailed(FaultDetail),

    /// Anything the adapter could not classify
    #[error("unexpected store fault: {0}")]
    Other(FaultDetail),
}

impl StoreFault {
    pub fn detail(&self) -> &FaultDetail {
        match self {
            StoreFault::Unavailable(detail)
            | StoreFault::AlgorithmUnavailable(detail)
            | StoreFault::InvalidParameters(detail)
            | StoreFault::LockScreenDisabled(detail)
            | StoreFault::UserNotAuthenticated(detail)
            | StoreFault::InvalidKey(detail)
            | StoreFault::SignatureFailed(detail)
            | StoreFault::Other(detail) => detail,
        }
    }

    /// Kind this fault maps to while running `operation`
    pub fn kind_for(&self, operation: StoreOperation) -> ErrorKind {
        use StoreOperation::*;

        match (self, operation) {
            (StoreFault::LockScreenDisabled(_), _) => ErrorKind::SecureLockScreenDisabled,
            (StoreFault::UserNotAuthenticated(_), _) => ErrorKind::UserNotAuthenticated,
            (StoreFault::Other(_), _) => ErrorKind::UnknownError,
            (StoreFault::Unavailable(_), _) => ErrorKind::StoreError,

            (
                StoreFault::AlgorithmUnavailable(_)
                | StoreFault::InvalidParameters(_)
                | StoreFault::InvalidKey(_)
                | StoreFault::SignatureFailed(_),
                Generate,
            ) => ErrorKind::KeyGenerationError,

            (
                StoreFault::InvalidParameters(_)
                | StoreFault::InvalidKey(_)
                | StoreFault::SignatureFailed(_),
                Sign,
            ) => ErrorKind::InvalidData,
            (StoreFault::AlgorithmUnavailable(_), Sign) => ErrorKind::StoreError,

            (
                StoreFault::AlgorithmUnavailable(_)
                | StoreFault::InvalidParameters(_)
                | StoreFault::InvalidKey(_)
                | StoreFault::SignatureFailed(_),
                Lookup | Delete,
            ) => ErrorKind::StoreError,
        }
    }

    /// Classify the fault into a [`SigningError`], keeping its detail
    pub fn classify(self, operation: StoreOperation) -> SigningError {
        let kind = self.kind_for(operation);
        SigningError::new(kind, Some(self.detail().clone()))
    }
}

impl From<crate::model::KeyIdError> for SigningError {
    fn from(err: crate::model::KeyIdError) -> Self {
        SigningError::missing_key("KeyIdError", err.to_string())
    }
}

impl From<crate::model::KeyMaterialError> for SigningError {
    fn from(err: crate::model::KeyMaterialError) -> Self {
        SigningError::invalid_data("KeyMaterialError", err.to_string())
    }
}

/// Convert ASN.1 decoding errors
impl From<der::Error> for SigningError {
    fn from(err: der::Error) -> Self {
        SigningError::invalid_data("der::Error", err.to_string())
    }
}

/// Convert SubjectPublicKeyInfo errors
impl From<spki::Error> for SigningError {
    fn from(err: spki::Error) -> Self {
        SigningError::invalid_data("spki::Error", err.to_string())
    }
}
