/*!
Error handling for the provider framework.

Every local failure is reported through a distinct code so callers can tell
a bad key from a bad buffer from a type mismatch. Failures are never retried
here; retry policy belongs to whoever drives the algorithm.
*/

use thiserror::Error;

use crate::core::provider::ops::Operation;

/// Result type for the provider framework
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the provider framework
#[derive(Error, Debug)]
pub enum Error {
    /// A zero (sentinel) key was used where a real key is required
    #[error("invalid parameter key (zero is reserved)")]
    InvalidKey,

    /// A size or argument constraint was violated
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Key found, but its bound type disagrees with the requested type
    #[error("parameter type mismatch for key {key}")]
    Mismatch {
        key: i32,
    },

    /// A value type outside the set the operation supports
    #[error("unsupported parameter type")]
    UnsupportedType,

    /// Key absent from the parameter array
    #[error("parameter key {0} not found")]
    NotFound(i32),

    /// Malformed provider registration
    #[error("provider registration error: {0}")]
    ProviderStructural(String),

    /// No active provider offers the requested algorithm for the category
    #[error("no provider implements algorithm {alg_id} for {operation:?}")]
    AlgorithmNotFound {
        operation: Operation,
        alg_id: i32,
    },

    /// The implementation does not support the requested operation or command
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Cryptographic error (limited details for security)
    #[error("cryptographic operation failed")]
    Crypto(#[source] CryptoError),
}

/// Cryptographic errors with limited details to prevent leaking information
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Generic encryption error
    #[error("encryption failed")]
    EncryptionFailed,

    /// Generic decryption error
    #[error("decryption failed")]
    DecryptionFailed,

    /// Key derivation error
    #[error("key derivation failed")]
    KeyDerivationFailed,

    /// Signature verification failed
    #[error("signature verification failed")]
    SignatureVerificationFailed,

    /// Invalid key format
    #[error("invalid key format")]
    InvalidKeyFormat,

    /// Entropy source failed to deliver
    #[error("entropy source failure")]
    EntropyFailure,

    /// DRBG used before instantiation or after teardown
    #[error("random state not instantiated")]
    NotInstantiated,
}

/// Push an error to the diagnostic sink and hand it back.
///
/// Mirrors the error-stack push the callers expect on every failure path:
/// the status code still travels through `Result`, the sink only gets a
/// debug record.
pub(crate) fn push(err: Error) -> Error {
    log::debug!(target: "crypt_provider", "{err}");
    err
}

/// Shorthand for `Err(push(...))` on local failure paths.
macro_rules! reject {
    ($err:expr) => {
        return Err($crate::core::error::push($err))
    };
}

pub(crate) use reject;
