//! Integration tests for the provider registry and the software provider.

use std::sync::Arc;

use crypt_provider::providers::software;
use crypt_provider::{
    algid, keys, AlgImpl, AlgInfo, Capabilities, CryptoError, EntropySource, Error, NonceSource,
    Operation, Param, Params, Provider, ProviderRegistry, Result,
};

fn loaded_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry
        .load("software", software::provider_init, &Params::new())
        .unwrap();
    registry
}

fn hash_table(registry: &ProviderRegistry, alg_id: i32) -> AlgInfo {
    registry.find(Operation::Hash, alg_id, None).unwrap()
}

// -- registry lifecycle -------------------------------------------------

#[test]
fn test_load_query_unload() {
    let mut registry = loaded_registry();
    assert_eq!(registry.provider_names(), ["software"]);
    assert_eq!(registry.query("software", Operation::Hash).unwrap().len(), 3);

    registry.unload("software").unwrap();
    assert!(registry.provider_names().is_empty());
    assert!(matches!(
        registry.find(Operation::Hash, algid::HASH_SHA256, None),
        Err(Error::AlgorithmNotFound { .. })
    ));
}

#[test]
fn test_duplicate_name_rejected() {
    let mut registry = loaded_registry();
    assert!(matches!(
        registry.load("software", software::provider_init, &Params::new()),
        Err(Error::ProviderStructural(_))
    ));
    // the original stays loaded
    assert_eq!(registry.provider_names(), ["software"]);
}

#[test]
fn test_unload_unknown_name_rejected() {
    let mut registry = ProviderRegistry::new();
    assert!(matches!(
        registry.unload("nope"),
        Err(Error::InvalidArgument(_))
    ));
}

fn failing_init(_params: &Params<'_>, _caps: &Capabilities) -> Result<Box<dyn Provider>> {
    Err(Error::InvalidArgument("init refused".into()))
}

#[test]
fn test_failed_init_leaves_registry_unchanged() {
    let mut registry = loaded_registry();
    assert!(registry
        .load("broken", failing_init, &Params::new())
        .is_err());
    assert_eq!(registry.provider_names(), ["software"]);
}

// -- malformed advertisements -------------------------------------------

struct MiscategorizedProvider;

impl Provider for MiscategorizedProvider {
    fn query(&self, operation: Operation) -> Vec<AlgInfo> {
        // a hash table advertised under the MAC category
        if operation == Operation::Mac {
            vec![AlgInfo::new(
                algid::HASH_SHA256,
                AlgImpl::Hash(Arc::new(software::hash::Sha2Hash)),
            )]
        } else {
            Vec::new()
        }
    }

    fn ctrl(&self, _cmd: i32, _params: &mut Params<'_>) -> Result<()> {
        Ok(())
    }
}

fn miscategorized_init(
    _params: &Params<'_>,
    _caps: &Capabilities,
) -> Result<Box<dyn Provider>> {
    Ok(Box::new(MiscategorizedProvider))
}

#[test]
fn test_miscategorized_table_rejected_at_load() {
    let mut registry = ProviderRegistry::new();
    assert!(matches!(
        registry.load("bad", miscategorized_init, &Params::new()),
        Err(Error::ProviderStructural(_))
    ));
    assert!(registry.provider_names().is_empty());
}

// -- selection ----------------------------------------------------------

#[test]
fn test_category_isolation() {
    let registry = loaded_registry();
    // SHA-256 lives in the hash category only
    assert!(registry.find(Operation::Hash, algid::HASH_SHA256, None).is_ok());
    assert!(matches!(
        registry.find(Operation::Mac, algid::HASH_SHA256, None),
        Err(Error::AlgorithmNotFound { .. })
    ));
    assert!(matches!(
        registry.find(Operation::Kdf, algid::HASH_SHA256, None),
        Err(Error::AlgorithmNotFound { .. })
    ));
}

#[test]
fn test_first_loaded_provider_wins() {
    let first_attr = b"provider=first";
    let second_attr = b"provider=second";

    let mut registry = ProviderRegistry::new();
    let mut params = Params::new();
    params
        .push(Param::octets_ref(keys::PROV_ATTR, first_attr).unwrap())
        .unwrap();
    registry.load("first", software::provider_init, &params).unwrap();

    let mut params = Params::new();
    params
        .push(Param::octets_ref(keys::PROV_ATTR, second_attr).unwrap())
        .unwrap();
    registry.load("second", software::provider_init, &params).unwrap();

    let info = registry.find(Operation::Hash, algid::HASH_SHA256, None).unwrap();
    assert_eq!(info.attr.as_deref(), Some("provider=first"));

    // attributes steer selection past the first provider
    let info = registry
        .find(Operation::Hash, algid::HASH_SHA256, Some("provider=second"))
        .unwrap();
    assert_eq!(info.attr.as_deref(), Some("provider=second"));

    // no provider satisfies an unknown token
    assert!(matches!(
        registry.find(Operation::Hash, algid::HASH_SHA256, Some("provider=third")),
        Err(Error::AlgorithmNotFound { .. })
    ));
}

#[test]
fn test_provider_version_through_registry() {
    let registry = loaded_registry();
    let mut version = 0u32;
    {
        let mut params = Params::new();
        params
            .push(Param::uint32_out(keys::PROV_VERSION, &mut version).unwrap())
            .unwrap();
        registry
            .provider_ctrl("software", crypt_provider::core::provider::ctrl::GET_VERSION, &mut params)
            .unwrap();
    }
    assert_eq!(version, software::PROVIDER_VERSION);
}

// -- end-to-end through the dispatch tables -----------------------------

#[test]
fn test_hash_known_answer_through_registry() {
    let registry = loaded_registry();
    let info = hash_table(&registry, algid::HASH_SHA256);
    let AlgImpl::Hash(factory) = info.imp else {
        panic!("hash lookup produced a non-hash table");
    };

    let mut ctx = factory.new_ctx(algid::HASH_SHA256).unwrap();
    ctx.update(b"abc").unwrap();
    let mut digest = [0u8; 32];
    let n = ctx.finish(&mut digest).unwrap();
    assert_eq!(n, 32);
    assert_eq!(
        digest,
        [
            0xba, 0x78, 0x16, 0xbf, 0x8f, 0x01, 0xcf, 0xea, 0x41, 0x41, 0x40, 0xde, 0x5d, 0xae,
            0x22, 0x23, 0xb0, 0x03, 0x61, 0xa3, 0x96, 0x17, 0x7a, 0x9c, 0xb4, 0x10, 0xff, 0x61,
            0xf2, 0x00, 0x15, 0xad,
        ]
    );
}

#[test]
fn test_kem_flow_through_registry() {
    let registry = loaded_registry();

    // generate a key pair with the key management table
    let info = registry
        .find(Operation::KeyManagement, algid::PKEY_KYBER768, None)
        .unwrap();
    let AlgImpl::KeyManagement(keymgmt) = info.imp else {
        panic!("key management lookup produced the wrong table");
    };
    let mut key_ctx = keymgmt.new_ctx(algid::PKEY_KYBER768).unwrap();
    key_ctx.gen_key().unwrap();

    // size buffers through ctrl, then export the halves
    let (mut pub_len, mut prv_len) = (0u32, 0u32);
    {
        let mut params = Params::new();
        params
            .push(Param::uint32_out(keys::CTRL_PUBKEY_LEN, &mut pub_len).unwrap())
            .unwrap();
        params
            .push(Param::uint32_out(keys::CTRL_PRVKEY_LEN, &mut prv_len).unwrap())
            .unwrap();
        key_ctx
            .ctrl(crypt_provider::ops::keymgmt::ctrl::GET_KEY_LEN, &mut params)
            .unwrap();
    }
    let mut pk = vec![0u8; pub_len as usize];
    let mut sk = vec![0u8; prv_len as usize];
    {
        let mut params = Params::new();
        params
            .push(Param::octets(keys::PKEY_PUBKEY, &mut pk).unwrap())
            .unwrap();
        key_ctx.get_pub(&mut params).unwrap();
    }
    {
        let mut params = Params::new();
        params
            .push(Param::octets(keys::PKEY_PRVKEY, &mut sk).unwrap())
            .unwrap();
        key_ctx.get_prv(&mut params).unwrap();
    }

    // encapsulate against the public half, decapsulate with the private
    let info = registry
        .find(Operation::Kem, algid::PKEY_KYBER768, None)
        .unwrap();
    let AlgImpl::Kem(kem) = info.imp else {
        panic!("KEM lookup produced the wrong table");
    };

    let mut enc = kem.new_ctx(algid::PKEY_KYBER768).unwrap();
    {
        let mut params = Params::new();
        params
            .push(Param::octets_ref(keys::PKEY_PUBKEY, &pk).unwrap())
            .unwrap();
        enc.set_params(&params).unwrap();
    }
    let (mut secret_len, mut ct_len) = (0u32, 0u32);
    {
        let mut params = Params::new();
        params
            .push(Param::uint32_out(keys::CTRL_SECRET_LEN, &mut secret_len).unwrap())
            .unwrap();
        params
            .push(Param::uint32_out(keys::CTRL_CIPHERTEXT_LEN, &mut ct_len).unwrap())
            .unwrap();
        enc.ctrl(crypt_provider::ops::kem::ctrl::GET_LEN, &mut params)
            .unwrap();
    }
    let mut secret = vec![0u8; secret_len as usize];
    let mut ciphertext = vec![0u8; ct_len as usize];
    let (n_secret, n_ct) = enc.encapsulate(&mut secret, &mut ciphertext).unwrap();

    let mut dec = kem.new_ctx(algid::PKEY_KYBER768).unwrap();
    {
        let mut params = Params::new();
        params
            .push(Param::octets_ref(keys::PKEY_PRVKEY, &sk).unwrap())
            .unwrap();
        dec.set_params(&params).unwrap();
    }
    let mut recovered = vec![0u8; secret_len as usize];
    let n = dec.decapsulate(&ciphertext[..n_ct], &mut recovered).unwrap();
    assert_eq!(recovered[..n], secret[..n_secret]);
}

#[test]
fn test_sign_flow_through_registry() {
    let registry = loaded_registry();

    let info = registry
        .find(Operation::KeyManagement, algid::PKEY_DILITHIUM2, None)
        .unwrap();
    let AlgImpl::KeyManagement(keymgmt) = info.imp else {
        panic!("key management lookup produced the wrong table");
    };
    let mut key_ctx = keymgmt.new_ctx(algid::PKEY_DILITHIUM2).unwrap();
    key_ctx.gen_key().unwrap();
    key_ctx.check().unwrap();

    let mut pk = vec![0u8; 4096];
    let mut sk = vec![0u8; 8192];
    let (pk_n, sk_n);
    {
        let mut params = Params::new();
        params
            .push(Param::octets(keys::PKEY_PUBKEY, &mut pk).unwrap())
            .unwrap();
        key_ctx.get_pub(&mut params).unwrap();
        pk_n = params.find(keys::PKEY_PUBKEY).unwrap().use_len();
    }
    {
        let mut params = Params::new();
        params
            .push(Param::octets(keys::PKEY_PRVKEY, &mut sk).unwrap())
            .unwrap();
        key_ctx.get_prv(&mut params).unwrap();
        sk_n = params.find(keys::PKEY_PRVKEY).unwrap().use_len();
    }

    let info = registry
        .find(Operation::Sign, algid::PKEY_DILITHIUM2, None)
        .unwrap();
    let AlgImpl::Sign(signer) = info.imp else {
        panic!("signature lookup produced the wrong table");
    };

    let mut sign_ctx = signer.new_ctx(algid::PKEY_DILITHIUM2).unwrap();
    {
        let mut params = Params::new();
        params
            .push(Param::octets_ref(keys::PKEY_PRVKEY, &sk[..sk_n]).unwrap())
            .unwrap();
        sign_ctx.set_params(&params).unwrap();
    }
    let mut sig_len = 0u32;
    {
        let mut params = Params::new();
        params
            .push(Param::uint32_out(keys::CTRL_SIG_LEN, &mut sig_len).unwrap())
            .unwrap();
        sign_ctx
            .ctrl(crypt_provider::ops::sign::ctrl::GET_SIG_LEN, &mut params)
            .unwrap();
    }
    let mut sig = vec![0u8; sig_len as usize];
    let msg = b"release manifest";
    let n = sign_ctx.sign(algid::HASH_SHA256, msg, &mut sig).unwrap();

    let mut verify_ctx = signer.new_ctx(algid::PKEY_DILITHIUM2).unwrap();
    {
        let mut params = Params::new();
        params
            .push(Param::octets_ref(keys::PKEY_PUBKEY, &pk[..pk_n]).unwrap())
            .unwrap();
        verify_ctx.set_params(&params).unwrap();
    }
    verify_ctx.verify(algid::HASH_SHA256, msg, &sig[..n]).unwrap();
    assert!(verify_ctx
        .verify(algid::HASH_SHA256, b"forged manifest", &sig[..n])
        .is_err());
}

#[test]
fn test_aead_flow_through_registry() {
    let registry = loaded_registry();
    let info = registry
        .find(Operation::SymmetricCipher, algid::CIPHER_CHACHA20_POLY1305, None)
        .unwrap();
    let AlgImpl::SymmetricCipher(cipher) = info.imp else {
        panic!("cipher lookup produced the wrong table");
    };

    let key = [0x11u8; 32];
    let nonce = [0x22u8; 12];
    let plaintext = b"parameter arrays cross the boundary";

    let mut enc = cipher.new_ctx(algid::CIPHER_CHACHA20_POLY1305).unwrap();
    enc.init(&key, &nonce, &Params::new(), true).unwrap();
    enc.update(plaintext, &mut []).unwrap();
    let mut sealed = vec![0u8; plaintext.len() + 16];
    let n = enc.finish(&mut sealed).unwrap();

    let mut dec = cipher.new_ctx(algid::CIPHER_CHACHA20_POLY1305).unwrap();
    dec.init(&key, &nonce, &Params::new(), false).unwrap();
    dec.update(&sealed[..n], &mut []).unwrap();
    let mut opened = vec![0u8; plaintext.len()];
    let m = dec.finish(&mut opened).unwrap();
    assert_eq!(&opened[..m], plaintext);
}

// -- DRBG determinism under injected capabilities -----------------------

struct FixedEntropy;

impl EntropySource for FixedEntropy {
    fn entropy(&self, len: usize) -> Result<Vec<u8>> {
        Ok(vec![0x5a; len])
    }
}

impl NonceSource for FixedEntropy {
    fn nonce(&self, len: usize) -> Result<Vec<u8>> {
        Ok(vec![0xa5; len])
    }
}

#[test]
fn test_drbg_reproducible_with_injected_sources() {
    let src = Arc::new(FixedEntropy);
    let caps = Capabilities::new(src.clone(), src);

    let mut streams = Vec::new();
    for _ in 0..2 {
        let mut registry = ProviderRegistry::with_capabilities(caps.clone());
        registry
            .load("software", software::provider_init, &Params::new())
            .unwrap();
        let info = registry.find(Operation::Rand, algid::RAND_DRBG, None).unwrap();
        let AlgImpl::Rand(rand) = info.imp else {
            panic!("random lookup produced the wrong table");
        };
        let mut ctx = rand.new_ctx(algid::RAND_DRBG, &Params::new()).unwrap();
        ctx.instantiate(b"fixed personalization", &Params::new())
            .unwrap();
        let mut out = [0u8; 48];
        ctx.generate(&mut out, &[], &Params::new()).unwrap();
        streams.push(out);
    }
    assert_eq!(streams[0], streams[1]);
}

// -- KDF known answer through the registry ------------------------------

#[test]
fn test_hkdf_known_answer_through_registry() {
    let registry = loaded_registry();
    let info = registry.find(Operation::Kdf, algid::KDF_HKDF, None).unwrap();
    let AlgImpl::Kdf(kdf) = info.imp else {
        panic!("KDF lookup produced the wrong table");
    };

    // RFC 5869 test case 1
    let ikm = [0x0bu8; 22];
    let salt: [u8; 13] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c,
    ];
    let input_info: [u8; 10] = [0xf0, 0xf1, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7, 0xf8, 0xf9];

    let mut ctx = kdf.new_ctx(algid::KDF_HKDF).unwrap();
    {
        let mut params = Params::new();
        params
            .push(Param::octets_ref(keys::KDF_KEY, &ikm).unwrap())
            .unwrap();
        params
            .push(Param::octets_ref(keys::KDF_SALT, &salt).unwrap())
            .unwrap();
        params
            .push(Param::octets_ref(keys::KDF_INFO, &input_info).unwrap())
            .unwrap();
        ctx.set_params(&params).unwrap();
    }
    let mut okm = [0u8; 42];
    ctx.derive(&mut okm).unwrap();
    assert_eq!(
        okm,
        [
            0x3c, 0xb2, 0x5f, 0x25, 0xfa, 0xac, 0xd5, 0x7a, 0x90, 0x43, 0x4f, 0x64, 0xd0, 0x36,
            0x2f, 0x2a, 0x2d, 0x2d, 0x0a, 0x90, 0xcf, 0x1a, 0x5a, 0x4c, 0x5d, 0xb0, 0x2d, 0x56,
            0xec, 0xc4, 0xc5, 0xbf, 0x34, 0x00, 0x72, 0x08, 0xd5, 0xb8, 0x87, 0x18, 0x58, 0x65,
        ]
    );
}

// -- MAC known answer through the registry ------------------------------

#[test]
fn test_hmac_known_answer_through_registry() {
    let registry = loaded_registry();
    let info = registry
        .find(Operation::Mac, algid::MAC_HMAC_SHA256, None)
        .unwrap();
    let AlgImpl::Mac(mac) = info.imp else {
        panic!("MAC lookup produced the wrong table");
    };

    // RFC 4231 test case 1
    let mut ctx = mac.new_ctx(algid::MAC_HMAC_SHA256).unwrap();
    ctx.init(&[0x0b; 20], &Params::new()).unwrap();
    ctx.update(b"Hi There").unwrap();
    let mut tag = [0u8; 32];
    let n = ctx.finish(&mut tag).unwrap();
    assert_eq!(n, 32);
    assert_eq!(
        tag,
        [
            0xb0, 0x34, 0x4c, 0x61, 0xd8, 0xdb, 0x38, 0x53, 0x5c, 0xa8, 0xaf, 0xce, 0xaf, 0x0b,
            0xf1, 0x2b, 0x88, 0x1d, 0xc2, 0x00, 0xc9, 0x83, 0x3d, 0xa7, 0x26, 0xe9, 0x37, 0x6c,
            0x2e, 0x32, 0xcf, 0xf7,
        ]
    );
}

#[test]
fn test_verification_failure_is_crypto_error() {
    use std::error::Error as _;
    let err = Error::Crypto(CryptoError::SignatureVerificationFailed);
    assert_eq!(err.to_string(), "cryptographic operation failed");
    assert!(err.source().unwrap().to_string().contains("verification"));
}
