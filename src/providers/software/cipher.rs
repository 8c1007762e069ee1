/*!
ChaCha20-Poly1305 AEAD.

The streaming cipher table is honored with a buffering shape: update
accumulates plaintext or ciphertext, finish runs the single-shot AEAD.
The tag rides at the end of the ciphertext, so encrypt output is input
length plus 16 and decrypt output is input length minus 16.
*/

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};

use crate::core::algid;
use crate::core::error::{push, reject, CryptoError, Error, Result};
use crate::core::params::{keys, Params};
use crate::core::provider::ops::cipher::{SymmetricCipher, SymmetricCipherCtx};
use crate::core::provider::ops::Operation;
use crate::providers::software::optional_octets;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Factory for ChaCha20-Poly1305 contexts
pub struct ChaCha20Poly1305Cipher;

impl SymmetricCipher for ChaCha20Poly1305Cipher {
    fn new_ctx(&self, alg_id: i32) -> Result<Box<dyn SymmetricCipherCtx>> {
        if alg_id != algid::CIPHER_CHACHA20_POLY1305 {
            return Err(push(Error::AlgorithmNotFound {
                operation: Operation::SymmetricCipher,
                alg_id,
            }));
        }
        Ok(Box::new(ChaChaCtx::default()))
    }
}

#[derive(Default)]
struct ChaChaCtx {
    cipher: Option<ChaCha20Poly1305>,
    nonce: [u8; NONCE_LEN],
    aad: Vec<u8>,
    encrypt: bool,
    buffer: Vec<u8>,
}

impl ChaChaCtx {
    fn bound(&self) -> Result<&ChaCha20Poly1305> {
        self.cipher
            .as_ref()
            .ok_or_else(|| push(Error::InvalidArgument("cipher context has no key".into())))
    }
}

impl SymmetricCipherCtx for ChaChaCtx {
    fn init(&mut self, key: &[u8], iv: &[u8], params: &Params<'_>, encrypt: bool) -> Result<()> {
        if key.len() != KEY_LEN {
            reject!(Error::InvalidArgument(format!(
                "ChaCha20-Poly1305 key must be {KEY_LEN} bytes, got {}",
                key.len()
            )));
        }
        if iv.len() != NONCE_LEN {
            reject!(Error::InvalidArgument(format!(
                "ChaCha20-Poly1305 nonce must be {NONCE_LEN} bytes, got {}",
                iv.len()
            )));
        }
        self.cipher = Some(ChaCha20Poly1305::new(Key::from_slice(key)));
        self.nonce.copy_from_slice(iv);
        self.aad = optional_octets(params, keys::CIPHER_AAD)?.unwrap_or_default();
        self.encrypt = encrypt;
        self.buffer.clear();
        Ok(())
    }

    fn update(&mut self, input: &[u8], _out: &mut [u8]) -> Result<usize> {
        self.bound()?;
        self.buffer.extend_from_slice(input);
        Ok(0)
    }

    fn finish(&mut self, out: &mut [u8]) -> Result<usize> {
        let cipher = self.bound()?;
        let payload = Payload {
            msg: &self.buffer,
            aad: &self.aad,
        };
        let result = if self.encrypt {
            cipher
                .encrypt(Nonce::from_slice(&self.nonce), payload)
                .map_err(|_| push(Error::Crypto(CryptoError::EncryptionFailed)))?
        } else {
            cipher
                .decrypt(Nonce::from_slice(&self.nonce), payload)
                .map_err(|_| push(Error::Crypto(CryptoError::DecryptionFailed)))?
        };
        if out.len() < result.len() {
            reject!(Error::InvalidArgument(format!(
                "cipher output needs {} bytes, buffer holds {}",
                result.len(),
                out.len()
            )));
        }
        out[..result.len()].copy_from_slice(&result);
        self.buffer.clear();
        Ok(result.len())
    }

    fn deinit(&mut self) -> Result<()> {
        self.cipher = None;
        for b in &mut self.buffer {
            *b = 0;
        }
        self.buffer.clear();
        self.aad.clear();
        Ok(())
    }

    fn ctrl(&mut self, cmd: i32, _params: &mut Params<'_>) -> Result<()> {
        Err(push(Error::Unsupported(format!(
            "cipher ctrl command {cmd}"
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::Param;

    const KEY: [u8; 32] = [0x42; 32];
    const NONCE: [u8; 12] = [0x24; 12];

    fn ctx() -> Box<dyn SymmetricCipherCtx> {
        ChaCha20Poly1305Cipher
            .new_ctx(algid::CIPHER_CHACHA20_POLY1305)
            .unwrap()
    }

    #[test]
    fn test_seal_and_open() {
        let plaintext = b"attack at dawn";

        let mut enc = ctx();
        enc.init(&KEY, &NONCE, &Params::new(), true).unwrap();
        enc.update(plaintext, &mut []).unwrap();
        let mut sealed = vec![0u8; plaintext.len() + 16];
        let n = enc.finish(&mut sealed).unwrap();
        assert_eq!(n, plaintext.len() + 16);

        let mut dec = ctx();
        dec.init(&KEY, &NONCE, &Params::new(), false).unwrap();
        dec.update(&sealed[..n], &mut []).unwrap();
        let mut opened = vec![0u8; plaintext.len()];
        let m = dec.finish(&mut opened).unwrap();
        assert_eq!(&opened[..m], plaintext);
    }

    #[test]
    fn test_aad_mismatch_fails_open() {
        let mut aad_params = Params::new();
        aad_params
            .push(Param::octets_ref(keys::CIPHER_AAD, b"header-v1").unwrap())
            .unwrap();

        let mut enc = ctx();
        enc.init(&KEY, &NONCE, &aad_params, true).unwrap();
        enc.update(b"payload", &mut []).unwrap();
        let mut sealed = vec![0u8; 7 + 16];
        let n = enc.finish(&mut sealed).unwrap();

        let mut dec = ctx();
        dec.init(&KEY, &NONCE, &Params::new(), false).unwrap();
        dec.update(&sealed[..n], &mut []).unwrap();
        let mut opened = vec![0u8; 7];
        assert!(matches!(
            dec.finish(&mut opened),
            Err(Error::Crypto(CryptoError::DecryptionFailed))
        ));
    }

    #[test]
    fn test_tampered_ciphertext_fails_open() {
        let mut enc = ctx();
        enc.init(&KEY, &NONCE, &Params::new(), true).unwrap();
        enc.update(b"payload", &mut []).unwrap();
        let mut sealed = vec![0u8; 7 + 16];
        let n = enc.finish(&mut sealed).unwrap();
        sealed[0] ^= 1;

        let mut dec = ctx();
        dec.init(&KEY, &NONCE, &Params::new(), false).unwrap();
        dec.update(&sealed[..n], &mut []).unwrap();
        let mut opened = vec![0u8; 7];
        assert!(dec.finish(&mut opened).is_err());
    }

    #[test]
    fn test_bad_key_length_rejected() {
        let mut c = ctx();
        assert!(c.init(&KEY[..16], &NONCE, &Params::new(), true).is_err());
    }

    #[test]
    fn test_uninitialized_context_rejected() {
        let mut c = ctx();
        let mut out = [0u8; 16];
        assert!(c.finish(&mut out).is_err());
    }
}
