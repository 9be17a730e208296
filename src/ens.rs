//! Name resolution against the ENS registry on the reference chain
//!
//! Resolution is fail-closed: every failure mode (empty or malformed name,
//! unregistered name, transport error, timeout) yields `None`, and callers
//! must not build a transaction around a `None` result.

use std::time::Duration;

use alloy_primitives::{keccak256, Address, B256};
use alloy_sol_types::SolCall;
use tracing::{debug, warn};

use crate::address::{is_valid_address, parse_address};
use crate::config::NameServiceConfig;
use crate::contracts::{IAddrResolver, IEnsRegistry, NameServiceCall};
use crate::error::Error;
use crate::rpc::{EthCall, HttpRpc};

/// Normalize a name for hashing.
///
/// Case-folds and checks every label. ASCII characters are limited to
/// `a-z`, `0-9`, `-`, `_` and `$`; whitespace and control characters are
/// rejected anywhere. Returns `None` for a malformed name.
pub fn normalize_name(name: &str) -> Option<String> {
    let lowered = name.to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    for label in lowered.split('.') {
        if label.is_empty() {
            return None;
        }
        let valid = label.chars().all(|c| {
            if c.is_ascii() {
                c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '$')
            } else {
                !c.is_whitespace() && !c.is_control()
            }
        });
        if !valid {
            return None;
        }
    }
    Some(lowered)
}

/// EIP-137 namehash of an already normalized name
pub fn namehash(name: &str) -> B256 {
    let mut node = B256::ZERO;
    if name.is_empty() {
        return node;
    }
    for label in name.rsplit('.') {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(keccak256(label.as_bytes()).as_slice());
        node = keccak256(buf);
    }
    node
}

/// Resolves names to addresses through a registry contract
pub struct NameResolver<C> {
    /// Transport to the reference chain
    rpc: C,
    /// Registry contract
    registry: Address,
    /// Bound on a single resolution
    timeout: Duration,
}

impl NameResolver<HttpRpc> {
    /// Resolver over HTTP JSON-RPC using the configured reference chain
    pub fn mainnet(config: &NameServiceConfig) -> Self {
        Self::new(
            HttpRpc::new(config.rpc_url.clone()),
            config.registry,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

impl<C: EthCall> NameResolver<C> {
    pub fn new(rpc: C, registry: Address, timeout: Duration) -> Self {
        Self {
            rpc,
            registry,
            timeout,
        }
    }

    /// Resolve `identifier` to an address.
    ///
    /// Empty input returns `None` and a hex address is passed through, both
    /// without touching the network.
    pub async fn resolve(&self, identifier: &str) -> Option<Address> {
        if identifier.is_empty() {
            return None;
        }
        if is_valid_address(identifier) {
            return parse_address(identifier).ok();
        }

        let name = match normalize_name(identifier) {
            Some(name) => name,
            None => {
                warn!("Cannot resolve malformed name {:?}", identifier);
                return None;
            }
        };

        match tokio::time::timeout(self.timeout, self.lookup(&name)).await {
            Ok(Ok(Some(address))) => {
                debug!("Resolved {} to {}", name, address);
                Some(address)
            }
            Ok(Ok(None)) => {
                warn!("Name {} is not registered", name);
                None
            }
            Ok(Err(e)) => {
                warn!("Error resolving address for name {}: {}", name, e);
                None
            }
            Err(_) => {
                warn!(
                    "Resolving {} timed out after {}s",
                    name,
                    self.timeout.as_secs_f32()
                );
                None
            }
        }
    }

    async fn lookup(&self, name: &str) -> Result<Option<Address>, Error> {
        let node = namehash(name);

        let data = NameServiceCall::Resolver { node }.encode();
        let raw = self.rpc.call(self.registry, data).await?;
        let resolver = IEnsRegistry::resolverCall::abi_decode_returns(&raw)?;
        if resolver.is_zero() {
            return Ok(None);
        }

        let data = NameServiceCall::Addr { node }.encode();
        let raw = self.rpc.call(resolver, data).await?;
        let address = IAddrResolver::addrCall::abi_decode_returns(&raw)?;
        if address.is_zero() {
            return Ok(None);
        }
        Ok(Some(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    #[test]
    fn test_namehash_vectors() {
        assert_eq!(namehash(""), B256::ZERO);
        assert_eq!(
            namehash("eth"),
            b256!("0x93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae")
        );
        assert_eq!(
            namehash("foo.eth"),
            b256!("0xde9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f")
        );
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Vitalik.ETH").as_deref(), Some("vitalik.eth"));
        assert_eq!(normalize_name("my-name_1.eth").as_deref(), Some("my-name_1.eth"));
        assert_eq!(normalize_name("café.eth").as_deref(), Some("café.eth"));
        assert_eq!(normalize_name(""), None);
        assert_eq!(normalize_name("foo..eth"), None);
        assert_eq!(normalize_name(".eth"), None);
        assert_eq!(normalize_name("foo bar.eth"), None);
        assert_eq!(normalize_name("foo/bar.eth"), None);
        assert_eq!(normalize_name("foo\u{3000}.eth"), None);
    }
}
