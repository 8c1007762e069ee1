//! Key exchange operation table.

use crate::core::error::Result;
use crate::core::params::Params;

/// Command codes for the key-exchange table
pub mod cmd {
    pub const EXCH: i32 = 1;
    pub const CTRL: i32 = 2;
}

/// Factory for key-exchange contexts
pub trait KeyExchange: Send + Sync {
    fn new_ctx(&self, alg_id: i32) -> Result<Box<dyn KeyExchangeCtx>>;
}

/// One exchange lifecycle: bind the local private key via `set_params`,
/// then combine with the peer's public value
pub trait KeyExchangeCtx: Send {
    fn set_params(&mut self, params: &Params<'_>) -> Result<()>;

    /// Compute the shared value from `peer`; returns its length
    fn exchange(&mut self, peer: &[u8], out: &mut [u8]) -> Result<usize>;

    fn ctrl(&mut self, cmd: i32, params: &mut Params<'_>) -> Result<()>;
}
