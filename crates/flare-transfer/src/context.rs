//! Per-run pipeline context

use std::sync::Arc;

use flarebridge_core::{chain_params, KeyError, NetworkConfig, NetworkRegistry};
use flare_chain_client::{ContractChain, PlatformChain};
use flare_keys::{bech32_payload, resolve_identity, strip_0x, Identity};
use flare_tx::ChainId;

use crate::errors::Error;

/// The resolved per-network chain and asset identifiers
#[derive(Debug, Clone, Copy)]
pub struct ChainIds {
    pub contract_chain: ChainId,
    pub platform_chain: ChainId,
    pub asset: ChainId,
}

/// Everything one pipeline run needs: resolved network, identifiers,
/// identity, and the two chain clients. Immutable once built; apply any
/// registry overrides before constructing one.
pub struct Context {
    pub network: NetworkConfig,
    pub chain_ids: ChainIds,
    pub identity: Identity,
    pub contract: Arc<dyn ContractChain>,
    pub platform: Arc<dyn PlatformChain>,
}

impl Context {
    pub fn new(
        registry: &NetworkRegistry,
        network_name: &str,
        public_key: Option<&str>,
        private_key_hex: Option<&str>,
        private_key_cb58: Option<&str>,
        contract: Arc<dyn ContractChain>,
        platform: Arc<dyn PlatformChain>,
    ) -> Result<Self, Error> {
        let network = registry.resolve(network_name)?.clone();
        let identity = resolve_identity(&network.hrp, public_key, private_key_hex, private_key_cb58)?;
        let chain_ids = resolve_chain_ids(network.network_id)?;
        Ok(Self {
            network,
            chain_ids,
            identity,
            contract,
            platform,
        })
    }

    /// A context for external signing. Only a public key is accepted, so
    /// no pipeline using this context can ever touch a private key.
    pub fn for_external_signing(
        registry: &NetworkRegistry,
        network_name: &str,
        public_key: &str,
        contract: Arc<dyn ContractChain>,
        platform: Arc<dyn PlatformChain>,
    ) -> Result<Self, Error> {
        Self::new(registry, network_name, Some(public_key), None, None, contract, platform)
    }

    /// The contract-chain account as raw bytes
    pub fn eth_address_bytes(&self) -> Result<[u8; 20], Error> {
        let bytes = hex::decode(strip_0x(&self.identity.c_address_hex))
            .map_err(|e| KeyError::InvalidEncoding(e.to_string()))?;
        let address: [u8; 20] = bytes
            .try_into()
            .map_err(|_| KeyError::InvalidEncoding("address is not 20 bytes".to_string()))?;
        Ok(address)
    }

    /// The 20-byte key hash both bech32 addresses share
    pub fn bech32_payload_bytes(&self) -> Result<[u8; 20], Error> {
        Ok(bech32_payload(&self.identity.p_address_bech32)?)
    }
}

fn resolve_chain_ids(network_id: u32) -> Result<ChainIds, Error> {
    let params = chain_params(network_id);
    Ok(ChainIds {
        contract_chain: ChainId::from_cb58(&params.c_blockchain_id)?,
        platform_chain: ChainId::from_cb58(&params.p_blockchain_id)?,
        asset: ChainId::from_cb58(&params.asset_id)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_network_resolves_chain_ids() {
        for network_id in [14, 19, 114, 7, 162, 12345] {
            let ids = resolve_chain_ids(network_id).unwrap();
            assert_eq!(ids.platform_chain, ChainId::PLATFORM);
            assert_ne!(ids.contract_chain, ids.platform_chain);
        }
    }
}
