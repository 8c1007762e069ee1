/*!
The built-in software provider.

Backs eight of the ten operation categories with pure-software
implementations: SHA-2 hashing, HMAC, HKDF, ChaCha20-Poly1305, a seeded
DRBG, Kyber KEM, Dilithium signatures and key management for both
public-key families. Asymmetric cipher and key exchange advertise empty
lists.

Load-time parameters may carry a `PROV_ATTR` octet string overriding the
attribute tokens the provider advertises with every algorithm.
*/

pub mod cipher;
pub mod drbg;
pub mod hash;
pub mod kdf;
pub mod kem;
pub mod keymgmt;
pub mod mac;
pub mod sign;

use std::sync::Arc;

use crate::core::algid;
use crate::core::error::{reject, Error, Result};
use crate::core::params::{keys, Param, ParamType, Params};
use crate::core::provider::ops::{AlgImpl, AlgInfo, Operation};
use crate::core::provider::{ctrl, Capabilities, Provider};

/// Version reported through provider ctrl
pub const PROVIDER_VERSION: u32 = 1;

const DEFAULT_ATTR: &str = "provider=software,impl=pure-rust";

/// Provider initialization entry point for the software provider
pub fn provider_init(params: &Params<'_>, caps: &Capabilities) -> Result<Box<dyn Provider>> {
    let attr = match params.find(keys::PROV_ATTR) {
        Ok(param) => {
            let bytes = octet_bytes(param)?;
            let text = String::from_utf8(bytes).map_err(|_| {
                Error::InvalidArgument("provider attribute string is not UTF-8".into())
            })?;
            Some(text)
        }
        Err(Error::NotFound(_)) => None,
        Err(e) => return Err(e),
    };
    Ok(Box::new(SoftwareProvider::new(attr, caps.clone())))
}

/// Copy the octet payload out of a parameter, whichever octet shape it
/// was bound with.
pub(crate) fn octet_bytes(param: &Param<'_>) -> Result<Vec<u8>> {
    match param.param_type() {
        ParamType::OctetsRef => Ok(param.get_octets_ref()?.to_vec()),
        ParamType::Octets => {
            let mut buf = vec![0u8; param.capacity()];
            let n = param.get_octets(&mut buf)?;
            buf.truncate(n);
            Ok(buf)
        }
        _ => Err(Error::Mismatch { key: param.key() }),
    }
}

/// Fetch an optional octet parameter as an owned copy
pub(crate) fn optional_octets(params: &Params<'_>, key: i32) -> Result<Option<Vec<u8>>> {
    match params.find(key) {
        Ok(param) => Ok(Some(octet_bytes(param)?)),
        Err(Error::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Fetch an optional scalar parameter
pub(crate) fn optional_uint32(params: &Params<'_>, key: i32) -> Result<Option<u32>> {
    match params.find(key) {
        Ok(param) => Ok(Some(param.get_uint32()?)),
        Err(Error::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

struct SoftwareProvider {
    attr: String,
    hash: Arc<hash::Sha2Hash>,
    mac: Arc<mac::HmacSha2>,
    kdf: Arc<kdf::HkdfKdf>,
    cipher: Arc<cipher::ChaCha20Poly1305Cipher>,
    rand: Arc<drbg::SeededDrbg>,
    kem: Arc<kem::KyberKem>,
    sign: Arc<sign::DilithiumSigner>,
    keymgmt: Arc<keymgmt::PkeyManagement>,
}

impl SoftwareProvider {
    fn new(attr: Option<String>, caps: Capabilities) -> Self {
        Self {
            attr: attr.unwrap_or_else(|| DEFAULT_ATTR.to_string()),
            hash: Arc::new(hash::Sha2Hash),
            mac: Arc::new(mac::HmacSha2),
            kdf: Arc::new(kdf::HkdfKdf),
            cipher: Arc::new(cipher::ChaCha20Poly1305Cipher),
            rand: Arc::new(drbg::SeededDrbg::new(caps)),
            kem: Arc::new(kem::KyberKem),
            sign: Arc::new(sign::DilithiumSigner),
            keymgmt: Arc::new(keymgmt::PkeyManagement),
        }
    }

    fn advertise(&self, alg_id: i32, imp: AlgImpl) -> AlgInfo {
        AlgInfo::new(alg_id, imp).with_attr(&self.attr)
    }
}

impl Provider for SoftwareProvider {
    fn query(&self, operation: Operation) -> Vec<AlgInfo> {
        match operation {
            Operation::SymmetricCipher => vec![self.advertise(
                algid::CIPHER_CHACHA20_POLY1305,
                AlgImpl::SymmetricCipher(self.cipher.clone()),
            )],
            Operation::Hash => [algid::HASH_SHA256, algid::HASH_SHA384, algid::HASH_SHA512]
                .into_iter()
                .map(|id| self.advertise(id, AlgImpl::Hash(self.hash.clone())))
                .collect(),
            Operation::Mac => [
                algid::MAC_HMAC_SHA256,
                algid::MAC_HMAC_SHA384,
                algid::MAC_HMAC_SHA512,
            ]
            .into_iter()
            .map(|id| self.advertise(id, AlgImpl::Mac(self.mac.clone())))
            .collect(),
            Operation::Kdf => vec![self.advertise(algid::KDF_HKDF, AlgImpl::Kdf(self.kdf.clone()))],
            Operation::Rand => {
                vec![self.advertise(algid::RAND_DRBG, AlgImpl::Rand(self.rand.clone()))]
            }
            Operation::Kem => [
                algid::PKEY_KYBER512,
                algid::PKEY_KYBER768,
                algid::PKEY_KYBER1024,
            ]
            .into_iter()
            .map(|id| self.advertise(id, AlgImpl::Kem(self.kem.clone())))
            .collect(),
            Operation::Sign => [
                algid::PKEY_DILITHIUM2,
                algid::PKEY_DILITHIUM3,
                algid::PKEY_DILITHIUM5,
            ]
            .into_iter()
            .map(|id| self.advertise(id, AlgImpl::Sign(self.sign.clone())))
            .collect(),
            Operation::KeyManagement => [
                algid::PKEY_KYBER512,
                algid::PKEY_KYBER768,
                algid::PKEY_KYBER1024,
                algid::PKEY_DILITHIUM2,
                algid::PKEY_DILITHIUM3,
                algid::PKEY_DILITHIUM5,
            ]
            .into_iter()
            .map(|id| self.advertise(id, AlgImpl::KeyManagement(self.keymgmt.clone())))
            .collect(),
            Operation::AsymmetricCipher | Operation::KeyExchange => Vec::new(),
        }
    }

    fn ctrl(&self, cmd: i32, params: &mut Params<'_>) -> Result<()> {
        match cmd {
            ctrl::GET_VERSION => params.set_uint32_out(keys::PROV_VERSION, PROVIDER_VERSION),
            _ => reject!(Error::Unsupported(format!("provider ctrl command {cmd}"))),
        }
    }
}
