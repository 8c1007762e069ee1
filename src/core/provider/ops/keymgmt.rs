/*!
Key management operation table.

Owns key material for the public-key algorithm families: generation,
import/export through parameter arrays, duplication and consistency
checks. The sign/KEM/exchange tables consume the exported material.
*/

use crate::core::error::Result;
use crate::core::params::Params;

/// Command codes for the key-management table.
///
/// The numbering is sparse at the tail so the table can grow between
/// `COMPARE` and `CTRL` without renumbering.
pub mod cmd {
    pub const NEWCTX: i32 = 1;
    pub const SETPARAM: i32 = 2;
    pub const GETPARAM: i32 = 3;
    pub const GENKEY: i32 = 4;
    pub const SETPRV: i32 = 5;
    pub const SETPUB: i32 = 6;
    pub const GETPRV: i32 = 7;
    pub const GETPUB: i32 = 8;
    pub const DUPCTX: i32 = 9;
    pub const CHECK: i32 = 10;
    pub const COMPARE: i32 = 11;
    pub const CTRL: i32 = 15;
    pub const FREECTX: i32 = 16;
}

/// Factory for key-management contexts
pub trait KeyManagement: Send + Sync {
    fn new_ctx(&self, alg_id: i32) -> Result<Box<dyn KeyMgmtCtx>>;
}

/// One key lifecycle
pub trait KeyMgmtCtx: Send {
    /// Record generation/usage parameters
    fn set_params(&mut self, params: &Params<'_>) -> Result<()>;

    /// Report parameters through the caller's output bindings
    fn get_params(&self, params: &mut Params<'_>) -> Result<()>;

    /// Generate a fresh key pair
    fn gen_key(&mut self) -> Result<()>;

    /// Import the private key from a `PKEY_PRVKEY` parameter
    fn set_prv(&mut self, params: &Params<'_>) -> Result<()>;

    /// Import the public key from a `PKEY_PUBKEY` parameter
    fn set_pub(&mut self, params: &Params<'_>) -> Result<()>;

    /// Export the private key into the caller's `PKEY_PRVKEY` buffer
    fn get_prv(&self, params: &mut Params<'_>) -> Result<()>;

    /// Export the public key into the caller's `PKEY_PUBKEY` buffer
    fn get_pub(&self, params: &mut Params<'_>) -> Result<()>;

    /// Deep-copy the context and its key material
    fn dup(&self) -> Result<Box<dyn KeyMgmtCtx>>;

    /// Verify the held public/private halves belong together
    fn check(&self) -> Result<()>;

    /// Succeeds iff `other` holds the same public key
    fn compare(&self, other: &dyn KeyMgmtCtx) -> Result<()>;

    fn ctrl(&mut self, cmd: i32, params: &mut Params<'_>) -> Result<()>;
}

/// Ctrl commands understood by key-management contexts
pub mod ctrl {
    /// Write encoded key lengths through `CTRL_PUBKEY_LEN`/`CTRL_PRVKEY_LEN`
    /// bindings
    pub const GET_KEY_LEN: i32 = 1;
}
