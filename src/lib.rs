/*!
# crypt-provider

A pluggable cryptographic provider framework: heterogeneous algorithm
implementations register behind one stable, capability-negotiated
boundary and are driven through uniform per-category operation tables,
with typed key/value parameter arrays carrying structured data across.

## Overview

Two layers:

- **Typed parameters**: `Param`/`Params`, self-describing key/type/value
  slots over borrowed caller memory, with tag-checked accessors and
  explicit capacity contracts for output buffers.
- **Provider registry**: providers advertise algorithm implementations
  per operation category (cipher, key management, sign, asymmetric
  cipher, key exchange, KEM, hash, MAC, KDF, random); the registry
  locates an implementation by exact algorithm id plus optional
  attribute tokens and hands back its operation table.

A built-in software provider backs eight of the ten categories with
SHA-2, HMAC, HKDF, ChaCha20-Poly1305, a seeded DRBG, CRYSTALS-Kyber and
CRYSTALS-Dilithium.

```no_run
use crypt_provider::{algid, Operation, Params, ProviderRegistry};
use crypt_provider::providers::software;

let mut registry = ProviderRegistry::new();
registry.load("software", software::provider_init, &Params::new()).unwrap();

let info = registry.find(Operation::Hash, algid::HASH_SHA256, None).unwrap();
# let _ = info;
```
*/

// Core framework components
pub mod core;

// Built-in providers
pub mod providers;

// Re-export commonly used types for convenience
pub use crate::core::error::{CryptoError, Error, Result};
pub use crate::core::params::{keys, Param, ParamType, ParamValue, Params, MAX_PARAM_COUNT};
pub use crate::core::provider::{
    cap, cb, Capabilities, EntropySource, NonceSource, Provider, ProviderInitFn,
    ProviderRegistry,
};
pub use crate::core::provider::ops::{AlgImpl, AlgInfo, Operation};
pub use crate::core::algid;

// Re-export the operation tables under a stable path
pub use crate::core::provider::ops;
