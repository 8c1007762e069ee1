/*!
CRYSTALS-Dilithium signatures.

Detached signatures over the message directly, or hash-then-sign when
the caller routes through the digesting entry points with a SHA-2
algorithm id.
*/

use pqcrypto_dilithium::{dilithium2, dilithium3, dilithium5};
use pqcrypto_traits::sign::{DetachedSignature, PublicKey, SecretKey};
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::core::algid;
use crate::core::error::{push, reject, CryptoError, Error, Result};
use crate::core::params::{keys, Params};
use crate::core::provider::ops::sign::{ctrl, SignCtx, Signer};
use crate::core::provider::ops::Operation;
use crate::providers::software::optional_octets;

/// Factory covering the three Dilithium parameter sets
pub struct DilithiumSigner;

impl Signer for DilithiumSigner {
    fn new_ctx(&self, alg_id: i32) -> Result<Box<dyn SignCtx>> {
        match alg_id {
            algid::PKEY_DILITHIUM2 | algid::PKEY_DILITHIUM3 | algid::PKEY_DILITHIUM5 => {
                Ok(Box::new(DilithiumCtx {
                    alg_id,
                    pubkey: None,
                    prvkey: None,
                }))
            }
            _ => Err(push(Error::AlgorithmNotFound {
                operation: Operation::Sign,
                alg_id,
            })),
        }
    }
}

struct DilithiumCtx {
    alg_id: i32,
    pubkey: Option<Vec<u8>>,
    prvkey: Option<Vec<u8>>,
}

/// Maximum encoded signature length for a parameter set
pub(crate) fn signature_len(alg_id: i32) -> Result<usize> {
    match alg_id {
        algid::PKEY_DILITHIUM2 => Ok(dilithium2::signature_bytes()),
        algid::PKEY_DILITHIUM3 => Ok(dilithium3::signature_bytes()),
        algid::PKEY_DILITHIUM5 => Ok(dilithium5::signature_bytes()),
        _ => Err(push(Error::AlgorithmNotFound {
            operation: Operation::Sign,
            alg_id,
        })),
    }
}

fn digest(md_alg_id: i32, data: &[u8]) -> Result<Vec<u8>> {
    match md_alg_id {
        algid::HASH_SHA256 => Ok(Sha256::digest(data).to_vec()),
        algid::HASH_SHA384 => Ok(Sha384::digest(data).to_vec()),
        algid::HASH_SHA512 => Ok(Sha512::digest(data).to_vec()),
        _ => Err(push(Error::AlgorithmNotFound {
            operation: Operation::Hash,
            alg_id: md_alg_id,
        })),
    }
}

macro_rules! dilithium_sign {
    ($module:ident, $sk_bytes:expr, $data:expr, $sig:expr) => {{
        let sk = $module::SecretKey::from_bytes($sk_bytes)
            .map_err(|_| push(Error::Crypto(CryptoError::InvalidKeyFormat)))?;
        let produced = $module::detached_sign($data, &sk);
        let bytes = produced.as_bytes();
        if $sig.len() < bytes.len() {
            reject!(Error::InvalidArgument(format!(
                "signature needs {} bytes, buffer holds {}",
                bytes.len(),
                $sig.len()
            )));
        }
        $sig[..bytes.len()].copy_from_slice(bytes);
        Ok(bytes.len())
    }};
}

macro_rules! dilithium_verify {
    ($module:ident, $pk_bytes:expr, $data:expr, $sig:expr) => {{
        let pk = $module::PublicKey::from_bytes($pk_bytes)
            .map_err(|_| push(Error::Crypto(CryptoError::InvalidKeyFormat)))?;
        let sig = $module::DetachedSignature::from_bytes($sig)
            .map_err(|_| push(Error::Crypto(CryptoError::SignatureVerificationFailed)))?;
        $module::verify_detached_signature(&sig, $data, &pk)
            .map_err(|_| push(Error::Crypto(CryptoError::SignatureVerificationFailed)))
    }};
}

impl SignCtx for DilithiumCtx {
    fn set_params(&mut self, params: &Params<'_>) -> Result<()> {
        if let Some(pk) = optional_octets(params, keys::PKEY_PUBKEY)? {
            self.pubkey = Some(pk);
        }
        if let Some(sk) = optional_octets(params, keys::PKEY_PRVKEY)? {
            self.prvkey = Some(sk);
        }
        Ok(())
    }

    fn sign(&mut self, md_alg_id: i32, data: &[u8], sig: &mut [u8]) -> Result<usize> {
        let md = digest(md_alg_id, data)?;
        self.sign_data(&md, sig)
    }

    fn sign_data(&mut self, data: &[u8], sig: &mut [u8]) -> Result<usize> {
        let sk = self
            .prvkey
            .as_deref()
            .ok_or_else(|| push(Error::InvalidArgument("no private key set".into())))?;
        match self.alg_id {
            algid::PKEY_DILITHIUM2 => dilithium_sign!(dilithium2, sk, data, sig),
            algid::PKEY_DILITHIUM3 => dilithium_sign!(dilithium3, sk, data, sig),
            _ => dilithium_sign!(dilithium5, sk, data, sig),
        }
    }

    fn verify(&mut self, md_alg_id: i32, data: &[u8], sig: &[u8]) -> Result<()> {
        let md = digest(md_alg_id, data)?;
        self.verify_data(&md, sig)
    }

    fn verify_data(&mut self, data: &[u8], sig: &[u8]) -> Result<()> {
        let pk = self
            .pubkey
            .as_deref()
            .ok_or_else(|| push(Error::InvalidArgument("no public key set".into())))?;
        match self.alg_id {
            algid::PKEY_DILITHIUM2 => dilithium_verify!(dilithium2, pk, data, sig),
            algid::PKEY_DILITHIUM3 => dilithium_verify!(dilithium3, pk, data, sig),
            _ => dilithium_verify!(dilithium5, pk, data, sig),
        }
    }

    fn ctrl(&mut self, cmd: i32, params: &mut Params<'_>) -> Result<()> {
        match cmd {
            ctrl::GET_SIG_LEN => {
                params.set_uint32_out(keys::CTRL_SIG_LEN, signature_len(self.alg_id)? as u32)
            }
            _ => reject!(Error::Unsupported(format!(
                "signature ctrl command {cmd}"
            ))),
        }
    }
}

impl Drop for DilithiumCtx {
    fn drop(&mut self) {
        if let Some(sk) = &mut self.prvkey {
            for b in sk.iter_mut() {
                *b = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::Param;

    fn keyed_ctx(alg_id: i32) -> (Box<dyn SignCtx>, Box<dyn SignCtx>) {
        let (pk, sk) = match alg_id {
            algid::PKEY_DILITHIUM2 => {
                let (pk, sk) = dilithium2::keypair();
                (pk.as_bytes().to_vec(), sk.as_bytes().to_vec())
            }
            algid::PKEY_DILITHIUM3 => {
                let (pk, sk) = dilithium3::keypair();
                (pk.as_bytes().to_vec(), sk.as_bytes().to_vec())
            }
            _ => {
                let (pk, sk) = dilithium5::keypair();
                (pk.as_bytes().to_vec(), sk.as_bytes().to_vec())
            }
        };

        let mut signer = DilithiumSigner.new_ctx(alg_id).unwrap();
        {
            let mut params = Params::new();
            params
                .push(Param::octets_ref(keys::PKEY_PRVKEY, &sk).unwrap())
                .unwrap();
            signer.set_params(&params).unwrap();
        }
        let mut verifier = DilithiumSigner.new_ctx(alg_id).unwrap();
        {
            let mut params = Params::new();
            params
                .push(Param::octets_ref(keys::PKEY_PUBKEY, &pk).unwrap())
                .unwrap();
            verifier.set_params(&params).unwrap();
        }
        (signer, verifier)
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let (mut signer, mut verifier) = keyed_ctx(algid::PKEY_DILITHIUM3);
        let msg = b"signed message";
        let mut sig = vec![0u8; signature_len(algid::PKEY_DILITHIUM3).unwrap()];
        let n = signer.sign_data(msg, &mut sig).unwrap();
        verifier.verify_data(msg, &sig[..n]).unwrap();
    }

    #[test]
    fn test_tampered_message_fails() {
        let (mut signer, mut verifier) = keyed_ctx(algid::PKEY_DILITHIUM2);
        let mut sig = vec![0u8; signature_len(algid::PKEY_DILITHIUM2).unwrap()];
        let n = signer.sign_data(b"original", &mut sig).unwrap();
        assert!(matches!(
            verifier.verify_data(b"tampered", &sig[..n]),
            Err(Error::Crypto(CryptoError::SignatureVerificationFailed))
        ));
    }

    #[test]
    fn test_hash_then_sign_roundtrip() {
        let (mut signer, mut verifier) = keyed_ctx(algid::PKEY_DILITHIUM2);
        let msg = b"hash me first";
        let mut sig = vec![0u8; signature_len(algid::PKEY_DILITHIUM2).unwrap()];
        let n = signer.sign(algid::HASH_SHA256, msg, &mut sig).unwrap();
        verifier.verify(algid::HASH_SHA256, msg, &sig[..n]).unwrap();

        // a different digest binds a different message
        assert!(verifier.verify(algid::HASH_SHA512, msg, &sig[..n]).is_err());
    }

    #[test]
    fn test_sign_without_key_rejected() {
        let mut ctx = DilithiumSigner.new_ctx(algid::PKEY_DILITHIUM2).unwrap();
        let mut sig = [0u8; 4096];
        assert!(ctx.sign_data(b"msg", &mut sig).is_err());
    }

    #[test]
    fn test_recover_unsupported() {
        let (mut signer, _) = keyed_ctx(algid::PKEY_DILITHIUM2);
        let mut out = [0u8; 64];
        assert!(matches!(
            signer.recover(&[], &mut out),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_sig_len_ctrl() {
        let mut ctx = DilithiumSigner.new_ctx(algid::PKEY_DILITHIUM5).unwrap();
        let mut len = 0u32;
        {
            let mut params = Params::new();
            params
                .push(Param::uint32_out(keys::CTRL_SIG_LEN, &mut len).unwrap())
                .unwrap();
            ctx.ctrl(ctrl::GET_SIG_LEN, &mut params).unwrap();
        }
        assert_eq!(len as usize, dilithium5::signature_bytes());
    }
}
