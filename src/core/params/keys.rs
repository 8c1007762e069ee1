//! Well-known parameter keys, grouped per concern with numeric bases so each
//! family can grow without renumbering its neighbors.

/// KDF inputs
pub const KDF_BASE: i32 = 100;
/// Input keying material
pub const KDF_KEY: i32 = KDF_BASE + 1;
/// MAC algorithm id selecting the underlying PRF
pub const KDF_MAC_ID: i32 = KDF_BASE + 2;
/// Extraction salt
pub const KDF_SALT: i32 = KDF_BASE + 3;
/// Expansion info / context string
pub const KDF_INFO: i32 = KDF_BASE + 4;
/// Pre-extracted pseudorandom key (expand-only mode)
pub const KDF_PRK: i32 = KDF_BASE + 5;

/// Asymmetric key material
pub const PKEY_BASE: i32 = 200;
/// Encoded public key
pub const PKEY_PUBKEY: i32 = PKEY_BASE + 1;
/// Encoded private key
pub const PKEY_PRVKEY: i32 = PKEY_BASE + 2;

/// Symmetric cipher extras
pub const CIPHER_BASE: i32 = 400;
/// Additional authenticated data for AEAD modes
pub const CIPHER_AAD: i32 = CIPHER_BASE + 1;

/// Random generation
pub const RAND_BASE: i32 = 600;
/// Prediction resistance flag (nonzero = pull fresh entropy per request)
pub const RAND_PR: i32 = RAND_BASE + 1;
/// Requests between mandatory reseeds
pub const RAND_RESEED_INTERVAL: i32 = RAND_BASE + 2;

/// Control-path output bindings
pub const CTRL_BASE: i32 = 900;
/// Primary output length of the bound algorithm (digest, tag, derived key)
pub const CTRL_OUTPUT_LEN: i32 = CTRL_BASE + 1;
/// Shared-secret length of a KEM
pub const CTRL_SECRET_LEN: i32 = CTRL_BASE + 2;
/// Ciphertext length of a KEM encapsulation
pub const CTRL_CIPHERTEXT_LEN: i32 = CTRL_BASE + 3;
/// Encoded public key length
pub const CTRL_PUBKEY_LEN: i32 = CTRL_BASE + 4;
/// Encoded private key length
pub const CTRL_PRVKEY_LEN: i32 = CTRL_BASE + 5;
/// Maximum signature length
pub const CTRL_SIG_LEN: i32 = CTRL_BASE + 6;

/// Provider load/ctrl parameters
pub const PROV_BASE: i32 = 1000;
/// Attribute string the provider should advertise with its algorithms
pub const PROV_ATTR: i32 = PROV_BASE + 1;
/// Provider version scalar
pub const PROV_VERSION: i32 = PROV_BASE + 2;
