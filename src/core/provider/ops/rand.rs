//! Random-generation (DRBG) operation table.

use crate::core::error::Result;
use crate::core::params::Params;

/// Command codes for the random table
pub mod cmd {
    pub const DRBGNEWCTX: i32 = 1;
    pub const DRBGINST: i32 = 2;
    pub const DRBGUNINST: i32 = 3;
    pub const DRBGGEN: i32 = 4;
    pub const DRBGRESEED: i32 = 5;
    pub const DRBGCTRL: i32 = 6;
    pub const DRBGFREECTX: i32 = 7;
}

/// Factory for DRBG contexts
pub trait RandAlgorithm: Send + Sync {
    /// `params` may carry construction options such as a reseed interval
    fn new_ctx(&self, alg_id: i32, params: &Params<'_>) -> Result<Box<dyn RandCtx>>;
}

/// One DRBG lifecycle: instantiate, generate, reseed, uninstantiate
pub trait RandCtx: Send {
    /// Seed from the provider's entropy and nonce sources, mixing in the
    /// caller's personalization string
    fn instantiate(&mut self, personalization: &[u8], params: &Params<'_>) -> Result<()>;

    /// Tear down the working state; generation fails until re-instantiated
    fn uninstantiate(&mut self) -> Result<()>;

    /// Fill `out`, mixing in `additional_input` when non-empty
    fn generate(&mut self, out: &mut [u8], additional_input: &[u8], params: &Params<'_>)
        -> Result<()>;

    /// Pull fresh entropy, mixing in `additional_input`
    fn reseed(&mut self, additional_input: &[u8], params: &Params<'_>) -> Result<()>;

    fn ctrl(&mut self, cmd: i32, params: &mut Params<'_>) -> Result<()>;
}

/// Ctrl commands understood by DRBG contexts
pub mod ctrl {
    /// Write the reseed interval through a `CTRL_OUTPUT_LEN` binding
    pub const GET_RESEED_INTERVAL: i32 = 1;
}
