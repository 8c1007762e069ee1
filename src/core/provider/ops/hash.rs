//! Hash (message digest) operation table.

use crate::core::error::Result;
use crate::core::params::Params;

/// Command codes for the hash table
pub mod cmd {
    pub const NEWCTX: i32 = 1;
    pub const INITCTX: i32 = 2;
    pub const UPDATE: i32 = 3;
    pub const FINAL: i32 = 4;
    pub const DEINITCTX: i32 = 5;
    pub const DUPCTX: i32 = 6;
    pub const CTRL: i32 = 7;
    pub const FREECTX: i32 = 8;
}

/// Factory for hash contexts
pub trait HashAlgorithm: Send + Sync {
    fn new_ctx(&self, alg_id: i32) -> Result<Box<dyn HashCtx>>;
}

/// One streaming digest lifecycle
pub trait HashCtx: Send {
    /// Reset to the initial state
    fn init(&mut self, params: &Params<'_>) -> Result<()>;

    /// Absorb input
    fn update(&mut self, input: &[u8]) -> Result<()>;

    /// Produce the digest; returns its length, `out` must be large enough
    fn finish(&mut self, out: &mut [u8]) -> Result<usize>;

    /// Drop accumulated state without producing a digest
    fn deinit(&mut self) -> Result<()>;

    /// Clone the running state, mid-stream forks included
    fn dup(&self) -> Result<Box<dyn HashCtx>>;

    fn ctrl(&mut self, cmd: i32, params: &mut Params<'_>) -> Result<()>;
}

/// Ctrl commands understood by hash contexts
pub mod ctrl {
    /// Write the digest length through a `CTRL_OUTPUT_LEN` binding
    pub const GET_DIGEST_LEN: i32 = 1;
}
