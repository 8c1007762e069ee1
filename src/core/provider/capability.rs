/*!
Framework capabilities handed to providers at init time.

The entropy and nonce accessors of the original surface are get/clean
pairs; here the clean half is `Drop` of the returned buffer. Sources are
shared read-mostly by every context a provider mints, so they must be
`Send + Sync`.
*/

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rand::RngCore;

use crate::core::error::{reject, Error, CryptoError, Result};

/// Supplies seed entropy to DRBG implementations
pub trait EntropySource: Send + Sync {
    /// Return `len` bytes of entropy
    fn entropy(&self, len: usize) -> Result<Vec<u8>>;
}

/// Supplies instantiation nonces to DRBG implementations
pub trait NonceSource: Send + Sync {
    /// Return a `len`-byte nonce, never repeated for this source
    fn nonce(&self, len: usize) -> Result<Vec<u8>>;
}

/// The capability set passed through provider init
#[derive(Clone)]
pub struct Capabilities {
    pub entropy: Arc<dyn EntropySource>,
    pub nonce: Arc<dyn NonceSource>,
}

impl Capabilities {
    /// Assemble from explicit sources
    pub fn new(entropy: Arc<dyn EntropySource>, nonce: Arc<dyn NonceSource>) -> Self {
        Self { entropy, nonce }
    }

    /// OS-backed defaults
    pub fn system() -> Self {
        Self {
            entropy: Arc::new(SystemEntropy),
            nonce: Arc::new(SystemNonce::new()),
        }
    }
}

/// Entropy from the operating system RNG
pub struct SystemEntropy;

impl EntropySource for SystemEntropy {
    fn entropy(&self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        rand::rng().fill_bytes(&mut buf);
        Ok(buf)
    }
}

/// Random nonces with a counter folded in so two draws can never collide
pub struct SystemNonce {
    counter: AtomicU64,
}

impl SystemNonce {
    pub fn new() -> Self {
        Self { counter: AtomicU64::new(1) }
    }
}

impl Default for SystemNonce {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceSource for SystemNonce {
    fn nonce(&self, len: usize) -> Result<Vec<u8>> {
        if len == 0 {
            reject!(Error::Crypto(CryptoError::EntropyFailure));
        }
        let mut buf = vec![0u8; len];
        rand::rng().fill_bytes(&mut buf);
        let count = self.counter.fetch_add(1, Ordering::Relaxed);
        for (slot, byte) in buf.iter_mut().zip(count.to_be_bytes()) {
            *slot ^= byte;
        }
        Ok(buf)
    }
}
