/*!
HKDF (RFC 5869) over SHA-2.

Inputs arrive through parameter arrays and are copied out, since the
arrays only borrow caller memory for the duration of the call. Either
full extract-then-expand (keying material plus optional salt) or
expand-only from a caller-supplied PRK.
*/

use hkdf::Hkdf;
use sha2::{Sha256, Sha384, Sha512};

use crate::core::algid;
use crate::core::error::{push, reject, CryptoError, Error, Result};
use crate::core::params::{keys, Params};
use crate::core::provider::ops::kdf::{KdfAlgorithm, KdfCtx};
use crate::core::provider::ops::Operation;
use crate::providers::software::{optional_octets, optional_uint32};

/// Factory for HKDF contexts
pub struct HkdfKdf;

impl KdfAlgorithm for HkdfKdf {
    fn new_ctx(&self, alg_id: i32) -> Result<Box<dyn KdfCtx>> {
        if alg_id != algid::KDF_HKDF {
            return Err(push(Error::AlgorithmNotFound {
                operation: Operation::Kdf,
                alg_id,
            }));
        }
        Ok(Box::new(HkdfCtx::default()))
    }
}

#[derive(Default)]
struct HkdfCtx {
    mac_id: Option<i32>,
    ikm: Option<Vec<u8>>,
    salt: Option<Vec<u8>>,
    info: Vec<u8>,
    prk: Option<Vec<u8>>,
}

impl HkdfCtx {
    fn wipe(&mut self) {
        for buf in [&mut self.ikm, &mut self.salt, &mut self.prk]
            .into_iter()
            .flatten()
        {
            for b in buf.iter_mut() {
                *b = 0;
            }
        }
        self.ikm = None;
        self.salt = None;
        self.prk = None;
        self.info.clear();
        self.mac_id = None;
    }

}

macro_rules! run_hkdf {
    ($hash:ty, $ctx:expr, $out:expr) => {{
        let kdf = match (&$ctx.prk, &$ctx.ikm) {
            (Some(prk), _) => Hkdf::<$hash>::from_prk(prk)
                .map_err(|_| push(Error::Crypto(CryptoError::KeyDerivationFailed)))?,
            (None, Some(ikm)) => Hkdf::<$hash>::new($ctx.salt.as_deref(), ikm),
            (None, None) => {
                reject!(Error::InvalidArgument(
                    "HKDF needs keying material or a PRK".into()
                ));
            }
        };
        kdf.expand(&$ctx.info, $out)
            .map_err(|_| push(Error::Crypto(CryptoError::KeyDerivationFailed)))
    }};
}

impl KdfCtx for HkdfCtx {
    fn set_params(&mut self, params: &Params<'_>) -> Result<()> {
        if let Some(id) = optional_uint32(params, keys::KDF_MAC_ID)? {
            self.mac_id = Some(id as i32);
        }
        if let Some(ikm) = optional_octets(params, keys::KDF_KEY)? {
            self.ikm = Some(ikm);
        }
        if let Some(salt) = optional_octets(params, keys::KDF_SALT)? {
            self.salt = Some(salt);
        }
        if let Some(info) = optional_octets(params, keys::KDF_INFO)? {
            self.info = info;
        }
        if let Some(prk) = optional_octets(params, keys::KDF_PRK)? {
            self.prk = Some(prk);
        }
        Ok(())
    }

    fn derive(&mut self, out: &mut [u8]) -> Result<()> {
        match self.mac_id.unwrap_or(algid::MAC_HMAC_SHA256) {
            algid::MAC_HMAC_SHA256 => run_hkdf!(Sha256, self, out),
            algid::MAC_HMAC_SHA384 => run_hkdf!(Sha384, self, out),
            algid::MAC_HMAC_SHA512 => run_hkdf!(Sha512, self, out),
            other => Err(push(Error::InvalidArgument(format!(
                "HKDF cannot run over MAC algorithm {other}"
            )))),
        }
    }

    fn deinit(&mut self) -> Result<()> {
        self.wipe();
        Ok(())
    }

    fn ctrl(&mut self, cmd: i32, _params: &mut Params<'_>) -> Result<()> {
        Err(push(Error::Unsupported(format!("KDF ctrl command {cmd}"))))
    }
}

impl Drop for HkdfCtx {
    fn drop(&mut self) {
        self.wipe();
    }
}
