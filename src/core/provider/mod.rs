/*!
The pluggable provider boundary.

A provider is a unit implementing one or more algorithms across the fixed
operation categories. The framework hands it capabilities (entropy, nonce)
at init time; the provider hands back its advertisement surface: `query`
for the per-category algorithm tables and `ctrl` for out-of-band control.
Release is `Drop`, paired one-to-one with a successful init.
*/

pub mod capability;
pub mod ops;
pub mod registry;

pub use capability::{Capabilities, EntropySource, NonceSource};
pub use ops::{AlgImpl, AlgInfo, Operation};
pub use registry::ProviderRegistry;

use crate::core::error::Result;
use crate::core::params::Params;

/// Callback ids a provider returns from init
pub mod cb {
    pub const FREE: i32 = 1;
    pub const QUERY: i32 = 2;
    pub const CTRL: i32 = 3;
}

/// Capability ids the framework passes into init
pub mod cap {
    pub const GET_ENTROPY: i32 = 1;
    pub const CLEAN_ENTROPY: i32 = 2;
    pub const GET_NONCE: i32 = 3;
    pub const CLEAN_NONCE: i32 = 4;
    pub const MGR_CTRL: i32 = 5;
}

/// Provider-level ctrl commands
pub mod ctrl {
    /// Write the provider version through a `PROV_VERSION` binding
    pub const GET_VERSION: i32 = 1;
}

/// A loaded provider's callback surface.
///
/// `query` may return an empty list for categories the provider does not
/// implement. Implementations must tolerate concurrent `query`/`new_ctx`
/// calls; contexts minted from the tables are exclusively owned by their
/// callers.
pub trait Provider: Send + Sync {
    /// The sentinel-free algorithm list for one operation category
    fn query(&self, operation: Operation) -> Vec<AlgInfo>;

    /// Out-of-band provider-level control, distinct from any single
    /// algorithm's control path
    fn ctrl(&self, cmd: i32, params: &mut Params<'_>) -> Result<()>;
}

/// Provider initialization entry point.
///
/// Receives load-time parameters and the framework capabilities; returns
/// the provider's callback surface. A failed init leaves no registration
/// visible anywhere.
pub type ProviderInitFn = fn(params: &Params<'_>, caps: &Capabilities) -> Result<Box<dyn Provider>>;
