//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the registry
//! client. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::storage::MAX_DOCUMENT_SIZE;
use crate::wallet::Network;

/// Root configuration for the certificate registry client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RegistryConfig {
    /// Network selected before a wallet reports one.
    pub network: NetworkConfig,

    /// Fullnode endpoints, timeouts and confirmation polling.
    pub chain: ChainConfig,

    /// Location of the certificate Move module.
    pub contract: ContractConfig,

    /// Document pinning service.
    pub storage: StorageConfig,

    /// Local keystore wallet.
    pub wallet: WalletConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Network selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Network used until the wallet pushes a change ("mainnet" or "testnet").
    pub default: Network,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            default: Network::Testnet,
        }
    }
}

/// Aptos fullnode configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// REST endpoint for mainnet.
    pub mainnet_url: String,

    /// REST endpoint for testnet.
    pub testnet_url: String,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Upper bound on waiting for a submitted transaction to commit.
    pub confirmation_timeout_secs: u64,

    /// Interval between transaction status polls in milliseconds.
    pub poll_interval_ms: u64,
}

impl ChainConfig {
    /// Fullnode URL for the given network.
    pub fn node_url(&self, network: Network) -> &str {
        match network {
            Network::Mainnet => &self.mainnet_url,
            Network::Testnet => &self.testnet_url,
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            mainnet_url: "https://fullnode.mainnet.aptoslabs.com/v1".to_string(),
            testnet_url: "https://fullnode.testnet.aptoslabs.com/v1".to_string(),
            request_timeout_secs: 30,
            confirmation_timeout_secs: 60,
            poll_interval_ms: 1000,
        }
    }
}

/// Certificate module location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Account address the module is published under.
    pub module_address: String,

    /// Move module name.
    pub module_name: String,
}

impl ContractConfig {
    /// Fully-qualified function id, `<address>::<module>::<entry>`.
    pub fn function_id(&self, entry: &str) -> String {
        format!("{}::{}::{}", self.module_address, self.module_name, entry)
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            module_address: "0x2351d7888f7b0ac1eb42567ff8a22254ac6a063965b97c372df77a0947ae9bb1"
                .to_string(),
            module_name: "certificate_nft".to_string(),
        }
    }
}

/// Pinning service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Pinning upload endpoint.
    pub pin_url: String,

    /// Public gateway prefix; the content identifier is appended to it.
    pub gateway_prefix: String,

    /// Maximum accepted document size in bytes, at most 10 MiB.
    pub max_file_size: u64,

    /// Upload request timeout in seconds.
    pub upload_timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            pin_url: "https://api.pinata.cloud/pinning/pinFileToIPFS".to_string(),
            gateway_prefix: "https://gateway.pinata.cloud/ipfs/".to_string(),
            max_file_size: MAX_DOCUMENT_SIZE,
            upload_timeout_secs: 120,
        }
    }
}

/// Local keystore wallet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Path to a file holding the hex-encoded Ed25519 private key.
    pub key_file: Option<String>,

    /// Account address the key controls.
    pub account_address: Option<String>,

    /// Gas limit attached to every submission.
    pub max_gas_amount: u64,

    /// Gas price in octas.
    pub gas_unit_price: u64,

    /// Seconds a signed transaction stays valid.
    pub expiration_secs: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            key_file: None,
            account_address: None,
            max_gas_amount: 200_000,
            gas_unit_price: 100,
            expiration_secs: 600,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
