//! Asymmetric cipher operation table.

use crate::core::error::Result;
use crate::core::params::Params;

/// Command codes for the asymmetric-cipher table
pub mod cmd {
    pub const ENCRYPT: i32 = 1;
    pub const DECRYPT: i32 = 2;
    pub const CTRL: i32 = 3;
}

/// Factory for asymmetric cipher contexts
pub trait AsymCipher: Send + Sync {
    fn new_ctx(&self, alg_id: i32) -> Result<Box<dyn AsymCipherCtx>>;
}

/// One public-key encryption lifecycle; key material arrives through
/// `set_params` before the primary operations run
pub trait AsymCipherCtx: Send {
    fn set_params(&mut self, params: &Params<'_>) -> Result<()>;

    /// Encrypt `data` under the bound public key; returns the output length
    fn encrypt(&mut self, data: &[u8], out: &mut [u8]) -> Result<usize>;

    /// Decrypt `data` under the bound private key; returns the output length
    fn decrypt(&mut self, data: &[u8], out: &mut [u8]) -> Result<usize>;

    fn ctrl(&mut self, cmd: i32, params: &mut Params<'_>) -> Result<()>;
}
