//! MAC operation table.

use crate::core::error::Result;
use crate::core::params::Params;

/// Command codes for the MAC table
pub mod cmd {
    pub const NEWCTX: i32 = 1;
    pub const INIT: i32 = 2;
    pub const UPDATE: i32 = 3;
    pub const FINAL: i32 = 4;
    pub const REINITCTX: i32 = 5;
    pub const CTRL: i32 = 6;
    pub const FREECTX: i32 = 7;
}

/// Factory for MAC contexts
pub trait MacAlgorithm: Send + Sync {
    fn new_ctx(&self, alg_id: i32) -> Result<Box<dyn MacCtx>>;
}

/// One keyed MAC lifecycle
pub trait MacCtx: Send {
    /// Bind the key; `params` carries algorithm-specific extras
    fn init(&mut self, key: &[u8], params: &Params<'_>) -> Result<()>;

    fn update(&mut self, input: &[u8]) -> Result<()>;

    /// Produce the tag; returns its length
    fn finish(&mut self, out: &mut [u8]) -> Result<usize>;

    /// Restart with the key bound at init, discarding absorbed input
    fn reinit(&mut self) -> Result<()>;

    fn ctrl(&mut self, cmd: i32, params: &mut Params<'_>) -> Result<()>;
}

/// Ctrl commands understood by MAC contexts
pub mod ctrl {
    /// Write the tag length through a `CTRL_OUTPUT_LEN` binding
    pub const GET_TAG_LEN: i32 = 1;
}
