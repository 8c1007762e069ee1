//! Signature operation table.

use crate::core::error::{push, Error, Result};
use crate::core::params::Params;

/// Command codes for the signature table
pub mod cmd {
    pub const SIGN: i32 = 1;
    pub const SIGNDATA: i32 = 2;
    pub const VERIFY: i32 = 3;
    pub const VERIFYDATA: i32 = 4;
    pub const RECOVER: i32 = 5;
    pub const CTRL: i32 = 6;
}

/// Factory for signature contexts
pub trait Signer: Send + Sync {
    fn new_ctx(&self, alg_id: i32) -> Result<Box<dyn SignCtx>>;
}

/// One signing/verification lifecycle.
///
/// Key material arrives through `set_params` (`PKEY_PRVKEY` to sign,
/// `PKEY_PUBKEY` to verify) before the primary operations run.
pub trait SignCtx: Send {
    /// Record key material and options; inputs are copied, not retained
    fn set_params(&mut self, params: &Params<'_>) -> Result<()>;

    /// Hash `data` with `md_alg_id`, then sign the digest; returns the
    /// signature length
    fn sign(&mut self, md_alg_id: i32, data: &[u8], sig: &mut [u8]) -> Result<usize>;

    /// Sign `data` directly; returns the signature length
    fn sign_data(&mut self, data: &[u8], sig: &mut [u8]) -> Result<usize>;

    /// Hash `data` with `md_alg_id`, then verify `sig` over the digest
    fn verify(&mut self, md_alg_id: i32, data: &[u8], sig: &[u8]) -> Result<()>;

    /// Verify `sig` over `data` directly
    fn verify_data(&mut self, data: &[u8], sig: &[u8]) -> Result<()>;

    /// Recover the message from a signature, for schemes that support it
    fn recover(&mut self, _sig: &[u8], _out: &mut [u8]) -> Result<usize> {
        Err(push(Error::Unsupported(
            "message recovery not supported by this scheme".into(),
        )))
    }

    fn ctrl(&mut self, cmd: i32, params: &mut Params<'_>) -> Result<()>;
}

/// Ctrl commands understood by signature contexts
pub mod ctrl {
    /// Write the maximum signature length through a `CTRL_SIG_LEN` binding
    pub const GET_SIG_LEN: i32 = 1;
}
