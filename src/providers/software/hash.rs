//! SHA-2 hash implementations.

use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::core::algid;
use crate::core::error::{push, reject, Error, Result};
use crate::core::params::{keys, Params};
use crate::core::provider::ops::hash::{ctrl, HashAlgorithm, HashCtx};
use crate::core::provider::ops::Operation;

/// Factory covering the SHA-2 family
pub struct Sha2Hash;

impl HashAlgorithm for Sha2Hash {
    fn new_ctx(&self, alg_id: i32) -> Result<Box<dyn HashCtx>> {
        Ok(Box::new(Sha2Ctx {
            alg_id,
            state: State::fresh(alg_id)?,
        }))
    }
}

#[derive(Clone)]
enum State {
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
}

impl State {
    fn fresh(alg_id: i32) -> Result<Self> {
        match alg_id {
            algid::HASH_SHA256 => Ok(State::Sha256(Sha256::new())),
            algid::HASH_SHA384 => Ok(State::Sha384(Sha384::new())),
            algid::HASH_SHA512 => Ok(State::Sha512(Sha512::new())),
            _ => Err(push(Error::AlgorithmNotFound {
                operation: Operation::Hash,
                alg_id,
            })),
        }
    }

    fn digest_len(&self) -> usize {
        match self {
            State::Sha256(_) => 32,
            State::Sha384(_) => 48,
            State::Sha512(_) => 64,
        }
    }
}

struct Sha2Ctx {
    alg_id: i32,
    state: State,
}

impl HashCtx for Sha2Ctx {
    fn init(&mut self, _params: &Params<'_>) -> Result<()> {
        self.state = State::fresh(self.alg_id)?;
        Ok(())
    }

    fn update(&mut self, input: &[u8]) -> Result<()> {
        match &mut self.state {
            State::Sha256(h) => h.update(input),
            State::Sha384(h) => h.update(input),
            State::Sha512(h) => h.update(input),
        }
        Ok(())
    }

    fn finish(&mut self, out: &mut [u8]) -> Result<usize> {
        let n = self.state.digest_len();
        if out.len() < n {
            reject!(Error::InvalidArgument(format!(
                "digest needs {n} bytes, buffer holds {}",
                out.len()
            )));
        }
        match &mut self.state {
            State::Sha256(h) => out[..n].copy_from_slice(&h.finalize_reset()),
            State::Sha384(h) => out[..n].copy_from_slice(&h.finalize_reset()),
            State::Sha512(h) => out[..n].copy_from_slice(&h.finalize_reset()),
        }
        Ok(n)
    }

    fn deinit(&mut self) -> Result<()> {
        self.state = State::fresh(self.alg_id)?;
        Ok(())
    }

    fn dup(&self) -> Result<Box<dyn HashCtx>> {
        Ok(Box::new(Sha2Ctx {
            alg_id: self.alg_id,
            state: self.state.clone(),
        }))
    }

    fn ctrl(&mut self, cmd: i32, params: &mut Params<'_>) -> Result<()> {
        match cmd {
            ctrl::GET_DIGEST_LEN => {
                params.set_uint32_out(keys::CTRL_OUTPUT_LEN, self.state.digest_len() as u32)
            }
            _ => reject!(Error::Unsupported(format!("hash ctrl command {cmd}"))),
        }
    }
}
