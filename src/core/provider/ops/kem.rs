//! Key encapsulation (KEM) operation table.

use crate::core::error::Result;
use crate::core::params::Params;

/// Command codes for the KEM table
pub mod cmd {
    pub const ENCAPSULATE: i32 = 1;
    pub const DECAPSULATE: i32 = 2;
    pub const CTRL: i32 = 3;
}

/// Factory for KEM contexts
pub trait Kem: Send + Sync {
    fn new_ctx(&self, alg_id: i32) -> Result<Box<dyn KemCtx>>;
}

/// One encapsulation/decapsulation lifecycle.
///
/// The peer public key (`PKEY_PUBKEY`) or own private key (`PKEY_PRVKEY`)
/// arrives through `set_params`. Output lengths can be queried through
/// ctrl before sizing buffers.
pub trait KemCtx: Send {
    fn set_params(&mut self, params: &Params<'_>) -> Result<()>;

    /// Produce a shared secret and its encapsulation; returns
    /// `(secret_len, ciphertext_len)`
    fn encapsulate(&mut self, secret: &mut [u8], out: &mut [u8]) -> Result<(usize, usize)>;

    /// Recover the shared secret from `data`; returns its length
    fn decapsulate(&mut self, data: &[u8], out: &mut [u8]) -> Result<usize>;

    fn ctrl(&mut self, cmd: i32, params: &mut Params<'_>) -> Result<()>;
}

/// Ctrl commands understood by KEM contexts
pub mod ctrl {
    /// Write shared-secret and ciphertext lengths through
    /// `CTRL_SECRET_LEN`/`CTRL_CIPHERTEXT_LEN` bindings
    pub const GET_LEN: i32 = 1;
}
