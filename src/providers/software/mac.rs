/*!
HMAC over SHA-2, FIPS 198-1.

Implemented directly on the digest: the key is normalized to one hash
block, the inner state is pre-loaded with `key ^ ipad`, and the outer
pass runs at finish time. Keeping the padded keys around makes `reinit`
and back-to-back tags cheap.
*/

use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::core::algid;
use crate::core::error::{push, reject, Error, Result};
use crate::core::params::{keys, Params};
use crate::core::provider::ops::mac::{ctrl, MacAlgorithm, MacCtx};
use crate::core::provider::ops::Operation;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// Factory covering HMAC-SHA-256/384/512
pub struct HmacSha2;

impl MacAlgorithm for HmacSha2 {
    fn new_ctx(&self, alg_id: i32) -> Result<Box<dyn MacCtx>> {
        let inner = Inner::fresh(alg_id)?;
        Ok(Box::new(HmacCtx {
            alg_id,
            inner,
            ipad_key: Vec::new(),
            opad_key: Vec::new(),
        }))
    }
}

#[derive(Clone)]
enum Inner {
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
}

impl Inner {
    fn fresh(alg_id: i32) -> Result<Self> {
        match alg_id {
            algid::MAC_HMAC_SHA256 => Ok(Inner::Sha256(Sha256::new())),
            algid::MAC_HMAC_SHA384 => Ok(Inner::Sha384(Sha384::new())),
            algid::MAC_HMAC_SHA512 => Ok(Inner::Sha512(Sha512::new())),
            _ => Err(push(Error::AlgorithmNotFound {
                operation: Operation::Mac,
                alg_id,
            })),
        }
    }

    fn block_len(&self) -> usize {
        match self {
            Inner::Sha256(_) => 64,
            Inner::Sha384(_) | Inner::Sha512(_) => 128,
        }
    }

    fn tag_len(&self) -> usize {
        match self {
            Inner::Sha256(_) => 32,
            Inner::Sha384(_) => 48,
            Inner::Sha512(_) => 64,
        }
    }

    fn update(&mut self, input: &[u8]) {
        match self {
            Inner::Sha256(h) => h.update(input),
            Inner::Sha384(h) => h.update(input),
            Inner::Sha512(h) => h.update(input),
        }
    }

    fn finalize_reset(&mut self) -> Vec<u8> {
        match self {
            Inner::Sha256(h) => h.finalize_reset().to_vec(),
            Inner::Sha384(h) => h.finalize_reset().to_vec(),
            Inner::Sha512(h) => h.finalize_reset().to_vec(),
        }
    }

    fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Inner::Sha256(_) => Sha256::digest(data).to_vec(),
            Inner::Sha384(_) => Sha384::digest(data).to_vec(),
            Inner::Sha512(_) => Sha512::digest(data).to_vec(),
        }
    }
}

struct HmacCtx {
    alg_id: i32,
    inner: Inner,
    ipad_key: Vec<u8>,
    opad_key: Vec<u8>,
}

impl HmacCtx {
    fn keyed(&self) -> Result<()> {
        if self.ipad_key.is_empty() {
            reject!(Error::InvalidArgument("MAC context has no key".into()));
        }
        Ok(())
    }
}

impl MacCtx for HmacCtx {
    fn init(&mut self, key: &[u8], _params: &Params<'_>) -> Result<()> {
        let block = self.inner.block_len();
        let mut k0 = if key.len() > block {
            self.inner.digest(key)
        } else {
            key.to_vec()
        };
        k0.resize(block, 0);

        self.ipad_key = k0.iter().map(|b| b ^ IPAD).collect();
        self.opad_key = k0.iter().map(|b| b ^ OPAD).collect();
        for b in &mut k0 {
            *b = 0;
        }

        self.inner = Inner::fresh(self.alg_id)?;
        self.inner.update(&self.ipad_key);
        Ok(())
    }

    fn update(&mut self, input: &[u8]) -> Result<()> {
        self.keyed()?;
        self.inner.update(input);
        Ok(())
    }

    fn finish(&mut self, out: &mut [u8]) -> Result<usize> {
        self.keyed()?;
        let n = self.inner.tag_len();
        if out.len() < n {
            reject!(Error::InvalidArgument(format!(
                "tag needs {n} bytes, buffer holds {}",
                out.len()
            )));
        }
        let inner_digest = self.inner.finalize_reset();
        let mut outer = Inner::fresh(self.alg_id)?;
        outer.update(&self.opad_key);
        outer.update(&inner_digest);
        out[..n].copy_from_slice(&outer.finalize_reset());

        // leave the context ready for the next message under the same key
        self.inner.update(&self.ipad_key);
        Ok(n)
    }

    fn reinit(&mut self) -> Result<()> {
        self.keyed()?;
        self.inner = Inner::fresh(self.alg_id)?;
        self.inner.update(&self.ipad_key);
        Ok(())
    }

    fn ctrl(&mut self, cmd: i32, params: &mut Params<'_>) -> Result<()> {
        match cmd {
            ctrl::GET_TAG_LEN => {
                params.set_uint32_out(keys::CTRL_OUTPUT_LEN, self.inner.tag_len() as u32)
            }
            _ => reject!(Error::Unsupported(format!("MAC ctrl command {cmd}"))),
        }
    }
}

impl Drop for HmacCtx {
    fn drop(&mut self) {
        for b in &mut self.ipad_key {
            *b = 0;
        }
        for b in &mut self.opad_key {
            *b = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 4231 test case 1
    const TC1_KEY: [u8; 20] = [0x0b; 20];
    const TC1_DATA: &[u8] = b"Hi There";
    const TC1_TAG_SHA256: [u8; 32] = [
        0xb0, 0x34, 0x4c, 0x61, 0xd8, 0xdb, 0x38, 0x53, 0x5c, 0xa8, 0xaf, 0xce, 0xaf, 0x0b, 0xf1,
        0x2b, 0x88, 0x1d, 0xc2, 0x00, 0xc9, 0x83, 0x3d, 0xa7, 0x26, 0xe9, 0x37, 0x6c, 0x2e, 0x32,
        0xcf, 0xf7,
    ];

    #[test]
    fn test_rfc4231_case1() {
        let mut ctx = HmacSha2.new_ctx(algid::MAC_HMAC_SHA256).unwrap();
        ctx.init(&TC1_KEY, &Params::new()).unwrap();
        ctx.update(TC1_DATA).unwrap();
        let mut tag = [0u8; 32];
        assert_eq!(ctx.finish(&mut tag).unwrap(), 32);
        assert_eq!(tag, TC1_TAG_SHA256);
    }

    #[test]
    fn test_reinit_repeats_tag() {
        let mut ctx = HmacSha2.new_ctx(algid::MAC_HMAC_SHA256).unwrap();
        ctx.init(&TC1_KEY, &Params::new()).unwrap();
        ctx.update(b"partial input").unwrap();
        ctx.reinit().unwrap();
        ctx.update(TC1_DATA).unwrap();
        let mut tag = [0u8; 32];
        ctx.finish(&mut tag).unwrap();
        assert_eq!(tag, TC1_TAG_SHA256);
    }

    #[test]
    fn test_finish_leaves_context_keyed() {
        let mut ctx = HmacSha2.new_ctx(algid::MAC_HMAC_SHA256).unwrap();
        ctx.init(&TC1_KEY, &Params::new()).unwrap();
        ctx.update(TC1_DATA).unwrap();
        let mut first = [0u8; 32];
        ctx.finish(&mut first).unwrap();

        ctx.update(TC1_DATA).unwrap();
        let mut second = [0u8; 32];
        ctx.finish(&mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_long_key_is_hashed_down() {
        let long_key = [0xaau8; 200];
        let mut ctx = HmacSha2.new_ctx(algid::MAC_HMAC_SHA512).unwrap();
        ctx.init(&long_key, &Params::new()).unwrap();
        ctx.update(b"data").unwrap();
        let mut tag = [0u8; 64];
        assert_eq!(ctx.finish(&mut tag).unwrap(), 64);
    }

    #[test]
    fn test_unkeyed_context_rejected() {
        let mut ctx = HmacSha2.new_ctx(algid::MAC_HMAC_SHA256).unwrap();
        assert!(ctx.update(b"data").is_err());
        let mut tag = [0u8; 32];
        assert!(ctx.finish(&mut tag).is_err());
    }
}
