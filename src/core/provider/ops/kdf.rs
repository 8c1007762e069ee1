//! KDF operation table.

use crate::core::error::Result;
use crate::core::params::Params;

/// Command codes for the KDF table
pub mod cmd {
    pub const NEWCTX: i32 = 1;
    pub const SETPARAM: i32 = 2;
    pub const DERIVE: i32 = 3;
    pub const DEINITCTX: i32 = 4;
    pub const CTRL: i32 = 5;
    pub const FREECTX: i32 = 6;
}

/// Factory for KDF contexts
pub trait KdfAlgorithm: Send + Sync {
    fn new_ctx(&self, alg_id: i32) -> Result<Box<dyn KdfCtx>>;
}

/// One derivation lifecycle: set inputs, then derive
pub trait KdfCtx: Send {
    /// Record derivation inputs (keying material, salt, info). Parameter
    /// arrays are borrowed for this call only, so implementations copy
    /// what they need.
    fn set_params(&mut self, params: &Params<'_>) -> Result<()>;

    /// Fill `out` with derived key material
    fn derive(&mut self, out: &mut [u8]) -> Result<()>;

    /// Wipe recorded inputs
    fn deinit(&mut self) -> Result<()>;

    fn ctrl(&mut self, cmd: i32, params: &mut Params<'_>) -> Result<()>;
}
