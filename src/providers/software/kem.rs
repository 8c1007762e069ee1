/*!
CRYSTALS-Kyber key encapsulation.

Key material arrives through `PKEY_PUBKEY`/`PKEY_PRVKEY` parameters and
is validated against the parameter set's encoded sizes on import.
*/

use pqcrypto_kyber::{kyber1024, kyber512, kyber768};
use pqcrypto_traits::kem::{Ciphertext, PublicKey, SecretKey, SharedSecret};

use crate::core::algid;
use crate::core::error::{push, reject, CryptoError, Error, Result};
use crate::core::params::{keys, Params};
use crate::core::provider::ops::kem::{ctrl, Kem, KemCtx};
use crate::core::provider::ops::Operation;
use crate::providers::software::optional_octets;

/// Factory covering the three Kyber parameter sets
pub struct KyberKem;

impl Kem for KyberKem {
    fn new_ctx(&self, alg_id: i32) -> Result<Box<dyn KemCtx>> {
        match alg_id {
            algid::PKEY_KYBER512 | algid::PKEY_KYBER768 | algid::PKEY_KYBER1024 => {
                Ok(Box::new(KyberCtx {
                    alg_id,
                    pubkey: None,
                    prvkey: None,
                }))
            }
            _ => Err(push(Error::AlgorithmNotFound {
                operation: Operation::Kem,
                alg_id,
            })),
        }
    }
}

struct KyberCtx {
    alg_id: i32,
    pubkey: Option<Vec<u8>>,
    prvkey: Option<Vec<u8>>,
}

macro_rules! kyber_encapsulate {
    ($module:ident, $pk_bytes:expr, $secret:expr, $out:expr) => {{
        let pk = $module::PublicKey::from_bytes($pk_bytes)
            .map_err(|_| push(Error::Crypto(CryptoError::InvalidKeyFormat)))?;
        let (ss, ct) = $module::encapsulate(&pk);
        copy_pair(ss.as_bytes(), ct.as_bytes(), $secret, $out)
    }};
}

macro_rules! kyber_decapsulate {
    ($module:ident, $sk_bytes:expr, $data:expr, $out:expr) => {{
        let sk = $module::SecretKey::from_bytes($sk_bytes)
            .map_err(|_| push(Error::Crypto(CryptoError::InvalidKeyFormat)))?;
        let ct = $module::Ciphertext::from_bytes($data)
            .map_err(|_| push(Error::Crypto(CryptoError::DecryptionFailed)))?;
        let ss = $module::decapsulate(&ct, &sk);
        copy_out(ss.as_bytes(), $out)
    }};
}

fn copy_out(src: &[u8], out: &mut [u8]) -> Result<usize> {
    if out.len() < src.len() {
        reject!(Error::InvalidArgument(format!(
            "output needs {} bytes, buffer holds {}",
            src.len(),
            out.len()
        )));
    }
    out[..src.len()].copy_from_slice(src);
    Ok(src.len())
}

fn copy_pair(
    secret_src: &[u8],
    ct_src: &[u8],
    secret: &mut [u8],
    out: &mut [u8],
) -> Result<(usize, usize)> {
    let secret_len = copy_out(secret_src, secret)?;
    let ct_len = copy_out(ct_src, out)?;
    Ok((secret_len, ct_len))
}

/// `(shared_secret_len, ciphertext_len)` for a parameter set
pub(crate) fn kem_lens(alg_id: i32) -> Result<(usize, usize)> {
    match alg_id {
        algid::PKEY_KYBER512 => Ok((kyber512::shared_secret_bytes(), kyber512::ciphertext_bytes())),
        algid::PKEY_KYBER768 => Ok((kyber768::shared_secret_bytes(), kyber768::ciphertext_bytes())),
        algid::PKEY_KYBER1024 => Ok((
            kyber1024::shared_secret_bytes(),
            kyber1024::ciphertext_bytes(),
        )),
        _ => Err(push(Error::AlgorithmNotFound {
            operation: Operation::Kem,
            alg_id,
        })),
    }
}

impl KemCtx for KyberCtx {
    fn set_params(&mut self, params: &Params<'_>) -> Result<()> {
        if let Some(pk) = optional_octets(params, keys::PKEY_PUBKEY)? {
            self.pubkey = Some(pk);
        }
        if let Some(sk) = optional_octets(params, keys::PKEY_PRVKEY)? {
            self.prvkey = Some(sk);
        }
        Ok(())
    }

    fn encapsulate(&mut self, secret: &mut [u8], out: &mut [u8]) -> Result<(usize, usize)> {
        let pk = self
            .pubkey
            .as_deref()
            .ok_or_else(|| push(Error::InvalidArgument("no peer public key set".into())))?;
        match self.alg_id {
            algid::PKEY_KYBER512 => kyber_encapsulate!(kyber512, pk, secret, out),
            algid::PKEY_KYBER768 => kyber_encapsulate!(kyber768, pk, secret, out),
            _ => kyber_encapsulate!(kyber1024, pk, secret, out),
        }
    }

    fn decapsulate(&mut self, data: &[u8], out: &mut [u8]) -> Result<usize> {
        let sk = self
            .prvkey
            .as_deref()
            .ok_or_else(|| push(Error::InvalidArgument("no private key set".into())))?;
        match self.alg_id {
            algid::PKEY_KYBER512 => kyber_decapsulate!(kyber512, sk, data, out),
            algid::PKEY_KYBER768 => kyber_decapsulate!(kyber768, sk, data, out),
            _ => kyber_decapsulate!(kyber1024, sk, data, out),
        }
    }

    fn ctrl(&mut self, cmd: i32, params: &mut Params<'_>) -> Result<()> {
        match cmd {
            ctrl::GET_LEN => {
                let (secret_len, ct_len) = kem_lens(self.alg_id)?;
                let mut wrote = false;
                if params.find(keys::CTRL_SECRET_LEN).is_ok() {
                    params.set_uint32_out(keys::CTRL_SECRET_LEN, secret_len as u32)?;
                    wrote = true;
                }
                if params.find(keys::CTRL_CIPHERTEXT_LEN).is_ok() {
                    params.set_uint32_out(keys::CTRL_CIPHERTEXT_LEN, ct_len as u32)?;
                    wrote = true;
                }
                if !wrote {
                    reject!(Error::InvalidArgument(
                        "no length binding supplied for KEM ctrl".into()
                    ));
                }
                Ok(())
            }
            _ => reject!(Error::Unsupported(format!("KEM ctrl command {cmd}"))),
        }
    }
}

impl Drop for KyberCtx {
    fn drop(&mut self) {
        if let Some(sk) = &mut self.prvkey {
            for b in sk.iter_mut() {
                *b = 0;
            }
        }
    }
}
