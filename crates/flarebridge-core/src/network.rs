//! Network configuration and registry
//!
//! The registry is an owned configuration store seeded with the fixed
//! network table. Staging entries may have their endpoint overridden at
//! startup; all other entries are immutable. The type is not internally
//! synchronized; apply overrides before sharing it with any pipeline.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::NetworkError;

/// Connection and chain parameters for a single network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Transport scheme ("http" or "https")
    pub scheme: String,
    /// Node host, without scheme or port
    pub host: String,
    /// Node port, when not implied by the scheme
    #[serde(default)]
    pub port: Option<u16>,
    /// Numeric network id
    pub network_id: u32,
    /// Human-readable bech32 address prefix
    pub hrp: String,
}

impl NetworkConfig {
    fn new(scheme: &str, host: &str, port: Option<u16>, network_id: u32, hrp: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            port,
            network_id,
            hrp: hrp.to_string(),
        }
    }

    /// Base node url, e.g. "https://coston2-api.flare.network"
    pub fn base_url(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}", self.scheme, self.host, port),
            None => format!("{}://{}", self.scheme, self.host),
        }
    }

    /// JSON-RPC url of the contract chain, e.g. ".../ext/bc/C/rpc"
    pub fn rpc_url(&self) -> String {
        format!("{}/ext/bc/C/rpc", self.base_url())
    }
}

/// Per-network chain and asset identifiers (cb58-encoded)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainParams {
    pub c_blockchain_id: String,
    pub p_blockchain_id: String,
    pub asset_id: String,
}

/// The platform chain shares one blockchain id on every network
const P_CHAIN_BLOCKCHAIN_ID: &str = "11111111111111111111111111111111LpoYY";

/// Networks whose endpoint may be overridden at runtime
const STAGING_NETWORKS: [&str; 2] = ["costwo-staging", "coston-staging"];

/// Registry mapping network names to connection parameters
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    entries: HashMap<String, NetworkConfig>,
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkRegistry {
    /// Build a registry seeded with the fixed network table
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        let table = [
            ("flare", NetworkConfig::new("https", "flare-api.flare.network", None, 14, "flare")),
            (
                "songbird",
                NetworkConfig::new("https", "songbird-api.flare.network", None, 19, "songbird"),
            ),
            (
                "costwo",
                NetworkConfig::new("https", "coston2-api.flare.network", None, 114, "costwo"),
            ),
            (
                "coston",
                NetworkConfig::new("https", "coston-api.flare.network", None, 7, "coston"),
            ),
            (
                "localflare",
                NetworkConfig::new("http", "localhost", Some(9650), 162, "localflare"),
            ),
            ("local", NetworkConfig::new("http", "localhost", Some(9650), 12345, "local")),
            // Staging entries start with an empty endpoint and must be
            // pointed at a node via override_staging_url before use.
            ("costwo-staging", NetworkConfig::new("", "", None, 114, "costwo")),
            ("coston-staging", NetworkConfig::new("", "", None, 7, "coston")),
        ];
        for (name, config) in table {
            entries.insert(name.to_string(), config);
        }
        Self { entries }
    }

    /// Resolve a network name to its configuration (exact match)
    pub fn resolve(&self, name: &str) -> Result<&NetworkConfig, NetworkError> {
        self.entries.get(name).ok_or_else(|| NetworkError::UnknownNetwork {
            name: name.to_string(),
        })
    }

    /// Point a staging network at a custom node url.
    ///
    /// Only the staging entries accept an override; an empty url is a no-op.
    /// Must be called before the registry is shared with any pipeline.
    pub fn override_staging_url(&mut self, name: &str, url: &str) -> Result<(), NetworkError> {
        if url.is_empty() {
            return Ok(());
        }
        if !STAGING_NETWORKS.contains(&name) {
            return Err(NetworkError::StagingOverrideNotAllowed {
                name: name.to_string(),
            });
        }

        let parsed = url::Url::parse(url).map_err(|e| NetworkError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let host = parsed
            .host_str()
            .ok_or_else(|| NetworkError::InvalidUrl {
                url: url.to_string(),
                reason: "missing host".to_string(),
            })?
            .to_string();

        // resolve() seeded every staging name, so the entry exists
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| NetworkError::UnknownNetwork {
                name: name.to_string(),
            })?;
        entry.scheme = parsed.scheme().to_string();
        entry.host = host;
        entry.port = parsed.port();
        Ok(())
    }
}

/// Chain and asset identifiers for a given network id
pub fn chain_params(network_id: u32) -> ChainParams {
    let (c_blockchain_id, asset_id) = match network_id {
        14 => (
            "2g32q4EnKhyQMyfbaa3Sd49XF589jeMq8pFuZFksnZwBXfZGLV",
            "qoAX3MWxrW6ybrJLsK7e2g6DZuhH6Du5JEfdiqdLBTG42MZdi",
        ),
        19 => (
            "7U89Sx4rvVpac7qm6hUaZJcQ6GASZJ11Q169EZXmtw6YYxUXb",
            "2iAKd6tfc7GavR6xVdqiAPj7dSv9TfTy1AYvJ5ofVMkUPxZgCo",
        ),
        114 => (
            "2DDHMMa6C1FXrzQXSP4wdwMEX5ZkXfxu1C6JTEuQ61bRDQWrL4",
            "2KhFpPo4bvdpJvZoMoavyGnce12GCovXFGTEY1KbednFvNYK6y",
        ),
        7 => (
            "LLpnkZ8y1QEqMJi1zxFntSLhpytRp1GFZDNAAUL7yzFZKNewD",
            "2cwQr1GPHBzwCSGh7bay3ToXw2UUgnroXB6G1wQkQTH8M1Ws1x",
        ),
        162 => (
            "2fB9BuvQicB9N5F3k6sFcpapmEK1MFS4b79oEYNbSNCULm6EWY",
            "2k5ppxRm38dkoNSQP232fRZGkrDZjEX54TX5Wsj8BE42iFKhvX",
        ),
        // Local single-node networks
        _ => (
            "9xJzcwnwJhkkaLaSfzYTmG8VeNJmgmfSc8t2efWNWDPf2M2Mm",
            "2KbekL72pdFqpKpEnc1M793GKqnk8Ux1ZUgxr85krSfawbZwnm",
        ),
    };
    ChainParams {
        c_blockchain_id: c_blockchain_id.to_string(),
        p_blockchain_id: P_CHAIN_BLOCKCHAIN_ID.to_string(),
        asset_id: asset_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_networks() {
        let registry = NetworkRegistry::new();
        for name in [
            "flare",
            "songbird",
            "costwo",
            "coston",
            "localflare",
            "local",
            "costwo-staging",
            "coston-staging",
        ] {
            assert!(registry.resolve(name).is_ok(), "missing network {name}");
        }
        let costwo = registry.resolve("costwo").unwrap();
        assert_eq!(costwo.network_id, 114);
        assert_eq!(costwo.hrp, "costwo");
        assert_eq!(costwo.rpc_url(), "https://coston2-api.flare.network/ext/bc/C/rpc");
    }

    #[test]
    fn test_resolve_unknown_network() {
        let registry = NetworkRegistry::new();
        assert!(matches!(
            registry.resolve("fuji"),
            Err(NetworkError::UnknownNetwork { .. })
        ));
    }

    #[test]
    fn test_override_staging_url() {
        let mut registry = NetworkRegistry::new();
        registry
            .override_staging_url("costwo-staging", "http://10.0.0.5:9650")
            .unwrap();
        let config = registry.resolve("costwo-staging").unwrap();
        assert_eq!(config.scheme, "http");
        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.port, Some(9650));
        assert_eq!(config.base_url(), "http://10.0.0.5:9650");
        // Chain parameters are untouched by the override
        assert_eq!(config.network_id, 114);
        assert_eq!(config.hrp, "costwo");
    }

    #[test]
    fn test_override_rejected_for_non_staging() {
        let mut registry = NetworkRegistry::new();
        let before = registry.resolve("flare").unwrap().clone();
        let result = registry.override_staging_url("flare", "http://x");
        assert!(matches!(
            result,
            Err(NetworkError::StagingOverrideNotAllowed { .. })
        ));
        let after = registry.resolve("flare").unwrap();
        assert_eq!(after.host, before.host);
        assert_eq!(after.scheme, before.scheme);
    }

    #[test]
    fn test_override_empty_url_is_noop() {
        let mut registry = NetworkRegistry::new();
        registry.override_staging_url("coston-staging", "").unwrap();
        assert_eq!(registry.resolve("coston-staging").unwrap().host, "");
        // Empty url never errors, even for non-staging names
        registry.override_staging_url("flare", "").unwrap();
    }

    #[test]
    fn test_port_in_base_url() {
        let registry = NetworkRegistry::new();
        let local = registry.resolve("localflare").unwrap();
        assert_eq!(local.base_url(), "http://localhost:9650");
    }

    #[test]
    fn test_chain_params_platform_id_shared() {
        for id in [14, 19, 114, 7, 162, 12345] {
            assert_eq!(chain_params(id).p_blockchain_id, P_CHAIN_BLOCKCHAIN_ID);
        }
    }
}
