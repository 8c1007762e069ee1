/*!
Symmetric cipher operation table.

Streaming shape: init binds key, IV and mode, update feeds data, final
flushes whatever the mode buffers (for AEAD modes the tag appears here).
*/

use crate::core::error::Result;
use crate::core::params::Params;

/// Command codes for the symmetric-cipher table
pub mod cmd {
    pub const NEWCTX: i32 = 1;
    pub const INITCTX: i32 = 2;
    pub const UPDATE: i32 = 3;
    pub const FINAL: i32 = 4;
    pub const DEINITCTX: i32 = 5;
    pub const CTRL: i32 = 6;
    pub const FREECTX: i32 = 7;
}

/// Factory for symmetric cipher contexts
pub trait SymmetricCipher: Send + Sync {
    /// Allocate fresh state for `alg_id`; borrows nothing from the caller
    fn new_ctx(&self, alg_id: i32) -> Result<Box<dyn SymmetricCipherCtx>>;
}

/// One streaming cipher lifecycle; exclusively owned by its driver
pub trait SymmetricCipherCtx: Send {
    /// Bind key and IV and select direction; algorithm-specific extras
    /// (such as AEAD additional data) travel in `params`
    fn init(&mut self, key: &[u8], iv: &[u8], params: &Params<'_>, encrypt: bool) -> Result<()>;

    /// Feed input, producing zero or more output bytes
    fn update(&mut self, input: &[u8], out: &mut [u8]) -> Result<usize>;

    /// Flush buffered state; returns the number of bytes written
    fn finish(&mut self, out: &mut [u8]) -> Result<usize>;

    /// Wipe key material; the context may be re-initialized afterwards
    fn deinit(&mut self) -> Result<()>;

    /// Auxiliary get/set not covered by the main path
    fn ctrl(&mut self, cmd: i32, params: &mut Params<'_>) -> Result<()>;
}
