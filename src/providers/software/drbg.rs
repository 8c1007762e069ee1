/*!
A seeded DRBG over the framework entropy and nonce capabilities.

Seed material is entropy plus nonce plus caller input, condensed through
SHA-256 into a generator seed. Reseeding happens on demand, after the
configured request interval, or on every request when prediction
resistance is on. With deterministic capability sources the whole
generator is deterministic, which is what test rigs want.
*/

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use sha2::{Digest, Sha256};

use crate::core::algid;
use crate::core::error::{push, reject, CryptoError, Error, Result};
use crate::core::params::{keys, Params};
use crate::core::provider::ops::rand::{ctrl, RandAlgorithm, RandCtx};
use crate::core::provider::ops::Operation;
use crate::core::provider::Capabilities;
use crate::providers::software::optional_uint32;

const ENTROPY_LEN: usize = 32;
const NONCE_LEN: usize = 16;
const DEFAULT_RESEED_INTERVAL: u32 = 1024;

/// Factory for DRBG contexts, holding the capability set
pub struct SeededDrbg {
    caps: Capabilities,
}

impl SeededDrbg {
    pub fn new(caps: Capabilities) -> Self {
        Self { caps }
    }
}

impl RandAlgorithm for SeededDrbg {
    fn new_ctx(&self, alg_id: i32, params: &Params<'_>) -> Result<Box<dyn RandCtx>> {
        if alg_id != algid::RAND_DRBG {
            return Err(push(Error::AlgorithmNotFound {
                operation: Operation::Rand,
                alg_id,
            }));
        }
        let reseed_interval =
            optional_uint32(params, keys::RAND_RESEED_INTERVAL)?.unwrap_or(DEFAULT_RESEED_INTERVAL);
        if reseed_interval == 0 {
            reject!(Error::InvalidArgument("reseed interval must be nonzero".into()));
        }
        let prediction_resistance = optional_uint32(params, keys::RAND_PR)?.unwrap_or(0) != 0;
        Ok(Box::new(DrbgCtx {
            caps: self.caps.clone(),
            rng: None,
            reseed_interval,
            requests: 0,
            prediction_resistance,
        }))
    }
}

struct DrbgCtx {
    caps: Capabilities,
    rng: Option<StdRng>,
    reseed_interval: u32,
    requests: u32,
    prediction_resistance: bool,
}

impl DrbgCtx {
    /// Fresh entropy and nonce condensed with the extra inputs
    fn seed_material(&self, extras: &[&[u8]]) -> Result<[u8; 32]> {
        let entropy = self.caps.entropy.entropy(ENTROPY_LEN)?;
        let nonce = self.caps.nonce.nonce(NONCE_LEN)?;
        let mut hasher = Sha256::new();
        hasher.update(&entropy);
        hasher.update(&nonce);
        for extra in extras {
            hasher.update(extra);
        }
        Ok(hasher.finalize().into())
    }

    fn rng(&mut self) -> Result<&mut StdRng> {
        self.rng
            .as_mut()
            .ok_or_else(|| push(Error::Crypto(CryptoError::NotInstantiated)))
    }
}

impl RandCtx for DrbgCtx {
    fn instantiate(&mut self, personalization: &[u8], _params: &Params<'_>) -> Result<()> {
        let seed = self.seed_material(&[personalization])?;
        self.rng = Some(StdRng::from_seed(seed));
        self.requests = 0;
        Ok(())
    }

    fn uninstantiate(&mut self) -> Result<()> {
        self.rng = None;
        self.requests = 0;
        Ok(())
    }

    fn generate(
        &mut self,
        out: &mut [u8],
        additional_input: &[u8],
        params: &Params<'_>,
    ) -> Result<()> {
        self.rng()?;
        if self.prediction_resistance || self.requests >= self.reseed_interval {
            self.reseed(additional_input, params)?;
        } else if !additional_input.is_empty() {
            // fold the additional input into the running state
            let mut current = [0u8; 32];
            self.rng()?.fill_bytes(&mut current);
            let mut hasher = Sha256::new();
            hasher.update(current);
            hasher.update(additional_input);
            self.rng = Some(StdRng::from_seed(hasher.finalize().into()));
        }
        self.rng()?.fill_bytes(out);
        self.requests += 1;
        Ok(())
    }

    fn reseed(&mut self, additional_input: &[u8], _params: &Params<'_>) -> Result<()> {
        let mut current = [0u8; 32];
        self.rng()?.fill_bytes(&mut current);
        let seed = self.seed_material(&[&current, additional_input])?;
        self.rng = Some(StdRng::from_seed(seed));
        self.requests = 0;
        Ok(())
    }

    fn ctrl(&mut self, cmd: i32, params: &mut Params<'_>) -> Result<()> {
        match cmd {
            ctrl::GET_RESEED_INTERVAL => {
                params.set_uint32_out(keys::CTRL_OUTPUT_LEN, self.reseed_interval)
            }
            _ => reject!(Error::Unsupported(format!("DRBG ctrl command {cmd}"))),
        }
    }
}
