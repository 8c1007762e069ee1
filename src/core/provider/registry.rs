/*!
The provider registry.

An explicit object, owned by the composition root: load providers while
setting up, look algorithms up from anywhere afterwards. Lookups take
`&self`, so a registry behind a shared reference is safe to query from
many threads; (un)loading takes `&mut self` and therefore demands
quiescence, which is exactly the contract the boundary wants.

Selection is exact on algorithm id, never substituted. Attribute strings
only narrow the candidate set; among surviving candidates the earliest
loaded provider wins.
*/

use crate::core::error::{push, reject, Error, Result};
use crate::core::params::Params;
use crate::core::provider::ops::{AlgInfo, Operation};
use crate::core::provider::{Capabilities, Provider, ProviderInitFn};

struct LoadedProvider {
    name: String,
    provider: Box<dyn Provider>,
}

/// Registry of loaded providers, ordered by load time
pub struct ProviderRegistry {
    caps: Capabilities,
    providers: Vec<LoadedProvider>,
}

impl ProviderRegistry {
    /// Create an empty registry with OS-backed capabilities
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities::system())
    }

    /// Create an empty registry with explicit capabilities
    pub fn with_capabilities(caps: Capabilities) -> Self {
        Self {
            caps,
            providers: Vec::new(),
        }
    }

    /// The capability set handed to every provider at load time
    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    /// Run a provider's init and register it under `name`.
    ///
    /// Init failures propagate verbatim; a provider whose advertised
    /// tables are malformed is rejected. Either way a failed load leaves
    /// the registry exactly as it was.
    pub fn load(&mut self, name: &str, init: ProviderInitFn, params: &Params<'_>) -> Result<()> {
        if name.is_empty() {
            reject!(Error::ProviderStructural("provider name is empty".into()));
        }
        if self.providers.iter().any(|p| p.name == name) {
            reject!(Error::ProviderStructural(format!(
                "provider '{name}' is already loaded"
            )));
        }
        let provider = init(params, &self.caps)?;
        Self::validate_tables(name, provider.as_ref())?;
        log::info!(target: "crypt_provider", "loaded provider '{name}'");
        self.providers.push(LoadedProvider {
            name: name.to_string(),
            provider,
        });
        Ok(())
    }

    fn validate_tables(name: &str, provider: &dyn Provider) -> Result<()> {
        for op in Operation::ALL {
            for info in provider.query(op) {
                if info.alg_id == 0 {
                    reject!(Error::ProviderStructural(format!(
                        "provider '{name}' advertises the reserved algorithm id 0 for {op:?}"
                    )));
                }
                if info.imp.operation() != op {
                    reject!(Error::ProviderStructural(format!(
                        "provider '{name}' advertises a {:?} table under {op:?}",
                        info.imp.operation()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Drop the provider registered under `name`
    pub fn unload(&mut self, name: &str) -> Result<()> {
        match self.providers.iter().position(|p| p.name == name) {
            Some(index) => {
                self.providers.remove(index);
                log::info!(target: "crypt_provider", "unloaded provider '{name}'");
                Ok(())
            }
            None => Err(push(Error::InvalidArgument(format!(
                "provider '{name}' is not loaded"
            )))),
        }
    }

    /// Names of loaded providers, in load order
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name.as_str()).collect()
    }

    /// One provider's algorithm list for one category
    pub fn query(&self, name: &str, operation: Operation) -> Result<Vec<AlgInfo>> {
        Ok(self.get(name)?.query(operation))
    }

    /// Out-of-band control on one loaded provider
    pub fn provider_ctrl(&self, name: &str, cmd: i32, params: &mut Params<'_>) -> Result<()> {
        self.get(name)?.ctrl(cmd, params)
    }

    fn get(&self, name: &str) -> Result<&dyn Provider> {
        self.providers
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.provider.as_ref())
            .ok_or_else(|| {
                push(Error::InvalidArgument(format!(
                    "provider '{name}' is not loaded"
                )))
            })
    }

    /// Locate an implementation of `alg_id` within `operation`.
    ///
    /// `attr`, when given, is a comma-separated token list; only
    /// candidates advertising every requested token qualify. The first
    /// qualifying candidate in load order wins.
    pub fn find(&self, operation: Operation, alg_id: i32, attr: Option<&str>) -> Result<AlgInfo> {
        if alg_id == 0 {
            reject!(Error::InvalidArgument(
                "algorithm id 0 is reserved".into()
            ));
        }
        for loaded in &self.providers {
            for info in loaded.provider.query(operation) {
                if info.alg_id == alg_id && attr_matches(attr, info.attr.as_deref()) {
                    return Ok(info);
                }
            }
        }
        Err(push(Error::AlgorithmNotFound { operation, alg_id }))
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn attr_matches(requested: Option<&str>, advertised: Option<&str>) -> bool {
    let Some(requested) = requested else {
        return true;
    };
    let advertised: Vec<&str> = advertised
        .map(|a| a.split(',').map(str::trim).collect())
        .unwrap_or_default();
    requested
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .all(|token| advertised.contains(&token))
}
