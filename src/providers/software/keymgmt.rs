/*!
Key management for the Kyber and Dilithium families.

Owns encoded key material: generation, import and export through
parameter arrays, duplication, pairwise consistency checks and public
key comparison. The KEM and signature tables consume what this one
exports.
*/

use pqcrypto_dilithium::{dilithium2, dilithium3, dilithium5};
use pqcrypto_kyber::{kyber1024, kyber512, kyber768};

use crate::core::algid;
use crate::core::error::{push, reject, CryptoError, Error, Result};
use crate::core::params::{keys, Params};
use crate::core::provider::ops::keymgmt::{ctrl, KeyManagement, KeyMgmtCtx};
use crate::core::provider::ops::Operation;
use crate::providers::software::optional_octets;

/// Factory covering all six public-key parameter sets
pub struct PkeyManagement;

impl KeyManagement for PkeyManagement {
    fn new_ctx(&self, alg_id: i32) -> Result<Box<dyn KeyMgmtCtx>> {
        key_lens(alg_id)?;
        Ok(Box::new(PkeyCtx {
            alg_id,
            pubkey: None,
            prvkey: None,
        }))
    }
}

/// `(public_key_len, secret_key_len)` for a parameter set
pub(crate) fn key_lens(alg_id: i32) -> Result<(usize, usize)> {
    match alg_id {
        algid::PKEY_KYBER512 => Ok((kyber512::public_key_bytes(), kyber512::secret_key_bytes())),
        algid::PKEY_KYBER768 => Ok((kyber768::public_key_bytes(), kyber768::secret_key_bytes())),
        algid::PKEY_KYBER1024 => Ok((
            kyber1024::public_key_bytes(),
            kyber1024::secret_key_bytes(),
        )),
        algid::PKEY_DILITHIUM2 => Ok((
            dilithium2::public_key_bytes(),
            dilithium2::secret_key_bytes(),
        )),
        algid::PKEY_DILITHIUM3 => Ok((
            dilithium3::public_key_bytes(),
            dilithium3::secret_key_bytes(),
        )),
        algid::PKEY_DILITHIUM5 => Ok((
            dilithium5::public_key_bytes(),
            dilithium5::secret_key_bytes(),
        )),
        _ => Err(push(Error::AlgorithmNotFound {
            operation: Operation::KeyManagement,
            alg_id,
        })),
    }
}

fn generate(alg_id: i32) -> Result<(Vec<u8>, Vec<u8>)> {
    use pqcrypto_traits::kem::{PublicKey as _, SecretKey as _};
    use pqcrypto_traits::sign::{PublicKey as _, SecretKey as _};
    match alg_id {
        algid::PKEY_KYBER512 => {
            let (pk, sk) = kyber512::keypair();
            Ok((pk.as_bytes().to_vec(), sk.as_bytes().to_vec()))
        }
        algid::PKEY_KYBER768 => {
            let (pk, sk) = kyber768::keypair();
            Ok((pk.as_bytes().to_vec(), sk.as_bytes().to_vec()))
        }
        algid::PKEY_KYBER1024 => {
            let (pk, sk) = kyber1024::keypair();
            Ok((pk.as_bytes().to_vec(), sk.as_bytes().to_vec()))
        }
        algid::PKEY_DILITHIUM2 => {
            let (pk, sk) = dilithium2::keypair();
            Ok((pk.as_bytes().to_vec(), sk.as_bytes().to_vec()))
        }
        algid::PKEY_DILITHIUM3 => {
            let (pk, sk) = dilithium3::keypair();
            Ok((pk.as_bytes().to_vec(), sk.as_bytes().to_vec()))
        }
        algid::PKEY_DILITHIUM5 => {
            let (pk, sk) = dilithium5::keypair();
            Ok((pk.as_bytes().to_vec(), sk.as_bytes().to_vec()))
        }
        _ => Err(push(Error::AlgorithmNotFound {
            operation: Operation::KeyManagement,
            alg_id,
        })),
    }
}

/// Pairwise consistency: a KEM round trip for Kyber, a sign/verify round
/// trip for Dilithium.
fn check_pair(alg_id: i32, pk: &[u8], sk: &[u8]) -> Result<()> {
    const PROBE: &[u8] = b"pairwise consistency probe";
    let failed = || push(Error::Crypto(CryptoError::InvalidKeyFormat));

    macro_rules! kem_check {
        ($module:ident) => {{
            use pqcrypto_traits::kem::{PublicKey as _, SecretKey as _, SharedSecret as _};
            let pk = $module::PublicKey::from_bytes(pk).map_err(|_| failed())?;
            let sk = $module::SecretKey::from_bytes(sk).map_err(|_| failed())?;
            let (ss, ct) = $module::encapsulate(&pk);
            let recovered = $module::decapsulate(&ct, &sk);
            if ss.as_bytes() != recovered.as_bytes() {
                return Err(failed());
            }
            Ok(())
        }};
    }
    macro_rules! sign_check {
        ($module:ident) => {{
            use pqcrypto_traits::sign::{PublicKey as _, SecretKey as _};
            let pk = $module::PublicKey::from_bytes(pk).map_err(|_| failed())?;
            let sk = $module::SecretKey::from_bytes(sk).map_err(|_| failed())?;
            let sig = $module::detached_sign(PROBE, &sk);
            $module::verify_detached_signature(&sig, PROBE, &pk).map_err(|_| failed())
        }};
    }

    match alg_id {
        algid::PKEY_KYBER512 => kem_check!(kyber512),
        algid::PKEY_KYBER768 => kem_check!(kyber768),
        algid::PKEY_KYBER1024 => kem_check!(kyber1024),
        algid::PKEY_DILITHIUM2 => sign_check!(dilithium2),
        algid::PKEY_DILITHIUM3 => sign_check!(dilithium3),
        algid::PKEY_DILITHIUM5 => sign_check!(dilithium5),
        _ => Err(push(Error::AlgorithmNotFound {
            operation: Operation::KeyManagement,
            alg_id,
        })),
    }
}

struct PkeyCtx {
    alg_id: i32,
    pubkey: Option<Vec<u8>>,
    prvkey: Option<Vec<u8>>,
}

impl PkeyCtx {
    fn import_pub(&mut self, bytes: Vec<u8>) -> Result<()> {
        let (pub_len, _) = key_lens(self.alg_id)?;
        if bytes.len() != pub_len {
            reject!(Error::Crypto(CryptoError::InvalidKeyFormat));
        }
        self.pubkey = Some(bytes);
        Ok(())
    }

    fn import_prv(&mut self, bytes: Vec<u8>) -> Result<()> {
        let (_, prv_len) = key_lens(self.alg_id)?;
        if bytes.len() != prv_len {
            reject!(Error::Crypto(CryptoError::InvalidKeyFormat));
        }
        self.prvkey = Some(bytes);
        Ok(())
    }
}

impl KeyMgmtCtx for PkeyCtx {
    fn set_params(&mut self, params: &Params<'_>) -> Result<()> {
        if let Some(pk) = optional_octets(params, keys::PKEY_PUBKEY)? {
            self.import_pub(pk)?;
        }
        if let Some(sk) = optional_octets(params, keys::PKEY_PRVKEY)? {
            self.import_prv(sk)?;
        }
        Ok(())
    }

    fn get_params(&self, params: &mut Params<'_>) -> Result<()> {
        let (pub_len, prv_len) = key_lens(self.alg_id)?;
        if params.find(keys::CTRL_PUBKEY_LEN).is_ok() {
            params.set_uint32_out(keys::CTRL_PUBKEY_LEN, pub_len as u32)?;
        }
        if params.find(keys::CTRL_PRVKEY_LEN).is_ok() {
            params.set_uint32_out(keys::CTRL_PRVKEY_LEN, prv_len as u32)?;
        }
        Ok(())
    }

    fn gen_key(&mut self) -> Result<()> {
        let (pk, sk) = generate(self.alg_id)?;
        self.pubkey = Some(pk);
        self.prvkey = Some(sk);
        Ok(())
    }

    fn set_prv(&mut self, params: &Params<'_>) -> Result<()> {
        let bytes = optional_octets(params, keys::PKEY_PRVKEY)?
            .ok_or_else(|| push(Error::NotFound(keys::PKEY_PRVKEY)))?;
        self.import_prv(bytes)
    }

    fn set_pub(&mut self, params: &Params<'_>) -> Result<()> {
        let bytes = optional_octets(params, keys::PKEY_PUBKEY)?
            .ok_or_else(|| push(Error::NotFound(keys::PKEY_PUBKEY)))?;
        self.import_pub(bytes)
    }

    fn get_prv(&self, params: &mut Params<'_>) -> Result<()> {
        let sk = self
            .prvkey
            .as_deref()
            .ok_or_else(|| push(Error::InvalidArgument("no private key held".into())))?;
        params.set_octets(keys::PKEY_PRVKEY, sk)
    }

    fn get_pub(&self, params: &mut Params<'_>) -> Result<()> {
        let pk = self
            .pubkey
            .as_deref()
            .ok_or_else(|| push(Error::InvalidArgument("no public key held".into())))?;
        params.set_octets(keys::PKEY_PUBKEY, pk)
    }

    fn dup(&self) -> Result<Box<dyn KeyMgmtCtx>> {
        Ok(Box::new(PkeyCtx {
            alg_id: self.alg_id,
            pubkey: self.pubkey.clone(),
            prvkey: self.prvkey.clone(),
        }))
    }

    fn check(&self) -> Result<()> {
        let pk = self
            .pubkey
            .as_deref()
            .ok_or_else(|| push(Error::InvalidArgument("no public key held".into())))?;
        let sk = self
            .prvkey
            .as_deref()
            .ok_or_else(|| push(Error::InvalidArgument("no private key held".into())))?;
        check_pair(self.alg_id, pk, sk)
    }

    fn compare(&self, other: &dyn KeyMgmtCtx) -> Result<()> {
        let mine = self
            .pubkey
            .as_deref()
            .ok_or_else(|| push(Error::InvalidArgument("no public key held".into())))?;
        let mut theirs = vec![0u8; mine.len()];
        let n;
        {
            let mut params = Params::new();
            params.push(crate::core::params::Param::octets(
                keys::PKEY_PUBKEY,
                &mut theirs,
            )?)?;
            other.get_pub(&mut params)?;
            n = params.find(keys::PKEY_PUBKEY)?.use_len();
        }
        if mine != &theirs[..n] {
            reject!(Error::InvalidArgument("public keys differ".into()));
        }
        Ok(())
    }

    fn ctrl(&mut self, cmd: i32, params: &mut Params<'_>) -> Result<()> {
        match cmd {
            ctrl::GET_KEY_LEN => self.get_params(params),
            _ => reject!(Error::Unsupported(format!(
                "key management ctrl command {cmd}"
            ))),
        }
    }
}

impl Drop for PkeyCtx {
    fn drop(&mut self) {
        if let Some(sk) = &mut self.prvkey {
            for b in sk.iter_mut() {
                *b = 0;
            }
        }
    }
}
