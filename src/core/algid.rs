//! Stable algorithm identifiers.
//!
//! Grouped per family with numeric bases. Zero is reserved everywhere as the
//! invalid/sentinel id. Public-key ids are shared by the key-management, sign,
//! KEM and key-exchange categories so one key type keeps one id across all of
//! them.

/// Symmetric ciphers
pub const CIPHER_BASE: i32 = 100;
pub const CIPHER_CHACHA20_POLY1305: i32 = CIPHER_BASE + 1;

/// Hashes
pub const HASH_BASE: i32 = 300;
pub const HASH_SHA256: i32 = HASH_BASE + 1;
pub const HASH_SHA384: i32 = HASH_BASE + 2;
pub const HASH_SHA512: i32 = HASH_BASE + 3;

/// MACs
pub const MAC_BASE: i32 = 400;
pub const MAC_HMAC_SHA256: i32 = MAC_BASE + 1;
pub const MAC_HMAC_SHA384: i32 = MAC_BASE + 2;
pub const MAC_HMAC_SHA512: i32 = MAC_BASE + 3;

/// Public-key algorithms (shared across key management, sign, KEM, exchange)
pub const PKEY_BASE: i32 = 500;
pub const PKEY_KYBER512: i32 = PKEY_BASE + 1;
pub const PKEY_KYBER768: i32 = PKEY_BASE + 2;
pub const PKEY_KYBER1024: i32 = PKEY_BASE + 3;
pub const PKEY_DILITHIUM2: i32 = PKEY_BASE + 11;
pub const PKEY_DILITHIUM3: i32 = PKEY_BASE + 12;
pub const PKEY_DILITHIUM5: i32 = PKEY_BASE + 13;

/// KDFs
pub const KDF_BASE: i32 = 700;
pub const KDF_HKDF: i32 = KDF_BASE + 1;

/// Random generators
pub const RAND_BASE: i32 = 800;
pub const RAND_DRBG: i32 = RAND_BASE + 1;
