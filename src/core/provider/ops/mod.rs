/*!
Operation categories and their dispatch tables.

Each of the ten categories carries a module of stable command codes (the
contract a provider honors, numbered the same way regardless of who
implements it) and a pair of traits: a factory that mints contexts for an
algorithm id, and a context trait with one method per command code. The
free command of every table is `Drop`, so a context is released exactly
once by construction.

`AlgImpl` closes the set: a provider advertises implementations only
through one of these ten table shapes, and the registry can check a table
against its category without knowing anything else about the provider.
*/

pub mod asym;
pub mod cipher;
pub mod hash;
pub mod kdf;
pub mod kem;
pub mod kex;
pub mod keymgmt;
pub mod mac;
pub mod rand;
pub mod sign;

use std::fmt;
use std::sync::Arc;

/// The fixed operation categories, with stable integer ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Operation {
    SymmetricCipher = 1,
    KeyManagement = 2,
    Sign = 3,
    AsymmetricCipher = 4,
    KeyExchange = 5,
    Kem = 6,
    Hash = 7,
    Mac = 8,
    Kdf = 9,
    Rand = 10,
}

impl Operation {
    /// Every category, in id order
    pub const ALL: [Operation; 10] = [
        Operation::SymmetricCipher,
        Operation::KeyManagement,
        Operation::Sign,
        Operation::AsymmetricCipher,
        Operation::KeyExchange,
        Operation::Kem,
        Operation::Hash,
        Operation::Mac,
        Operation::Kdf,
        Operation::Rand,
    ];

    /// The category's stable integer id
    pub fn id(self) -> i32 {
        self as i32
    }
}

/// One concrete implementation, typed by its operation category
#[derive(Clone)]
pub enum AlgImpl {
    SymmetricCipher(Arc<dyn cipher::SymmetricCipher>),
    KeyManagement(Arc<dyn keymgmt::KeyManagement>),
    Sign(Arc<dyn sign::Signer>),
    AsymmetricCipher(Arc<dyn asym::AsymCipher>),
    KeyExchange(Arc<dyn kex::KeyExchange>),
    Kem(Arc<dyn kem::Kem>),
    Hash(Arc<dyn hash::HashAlgorithm>),
    Mac(Arc<dyn mac::MacAlgorithm>),
    Kdf(Arc<dyn kdf::KdfAlgorithm>),
    Rand(Arc<dyn rand::RandAlgorithm>),
}

impl AlgImpl {
    /// The category this table belongs to
    pub fn operation(&self) -> Operation {
        match self {
            AlgImpl::SymmetricCipher(_) => Operation::SymmetricCipher,
            AlgImpl::KeyManagement(_) => Operation::KeyManagement,
            AlgImpl::Sign(_) => Operation::Sign,
            AlgImpl::AsymmetricCipher(_) => Operation::AsymmetricCipher,
            AlgImpl::KeyExchange(_) => Operation::KeyExchange,
            AlgImpl::Kem(_) => Operation::Kem,
            AlgImpl::Hash(_) => Operation::Hash,
            AlgImpl::Mac(_) => Operation::Mac,
            AlgImpl::Kdf(_) => Operation::Kdf,
            AlgImpl::Rand(_) => Operation::Rand,
        }
    }
}

impl fmt::Debug for AlgImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AlgImpl({:?})", self.operation())
    }
}

/// A provider's advertisement of one algorithm implementation
#[derive(Debug, Clone)]
pub struct AlgInfo {
    /// Implemented algorithm id; zero is reserved and never valid here
    pub alg_id: i32,
    /// The implementation's operation table
    pub imp: AlgImpl,
    /// Free-form selection attributes, comma-separated `key=value` tokens
    pub attr: Option<String>,
}

impl AlgInfo {
    /// Advertise `imp` under `alg_id` with no attributes
    pub fn new(alg_id: i32, imp: AlgImpl) -> Self {
        Self { alg_id, imp, attr: None }
    }

    /// Attach an attribute string
    pub fn with_attr(mut self, attr: &str) -> Self {
        self.attr = Some(attr.to_string());
        self
    }
}
