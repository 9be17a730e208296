use config::{Config as ConfigLoader, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use alloy_primitives::{address, Address};

use crate::amount::COMMONS_DECIMALS;
use crate::error::Error;

/// COMMONS token on Celo
pub const COMMONS_TOKEN: Address = address!("0x7b97031b6297bc8e030B07Bd84Ce92FEa1B00c3e");
/// Praise-with-tip attestation contract on Celo
pub const PRAISE_CONTRACT: Address = address!("0xB05Ca5772a54E5Aa81400b8E207368336187A1bB");
/// Ethereum Attestation Service on Celo
pub const EAS_CONTRACT: Address = address!("0x72E1d8ccf5299fb36fEfD8CC4394B8ef7e98Af92");
/// ENS registry on Ethereum mainnet
pub const ENS_REGISTRY: Address = address!("0x00000000000C2E074eC69A0bFb2997BA6C7d2e1e");

/// Schema UID of tip attestations
pub const TIP_SCHEMA_UID: &str = "0xa1215b03d4956c2e07792ccc30da1b48742a2c6dde9b12d2c97d5b16cf8263b8";

/// Default bound on a single name lookup
pub const DEFAULT_RESOLUTION_TIMEOUT_SECS: u64 = 10;

/// Network constants loaded from configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConstants {
    /// Network name
    pub network_name: String,
    /// EVM chain ID
    pub chain_id: u64,
    /// Default JSON-RPC endpoint
    pub rpc_url: String,
    /// Block explorer base URL
    pub explorer_url: String,
    /// Contracts deployed on this network
    pub contracts: ContractAddresses,
    /// GraphQL endpoints indexing this network
    pub indexer: IndexerEndpoints,
}

impl NetworkConstants {
    /// Create a new NetworkConstants with specified values
    pub fn new(
        network_name: String,
        chain_id: u64,
        rpc_url: String,
        explorer_url: String,
        contracts: ContractAddresses,
        indexer: IndexerEndpoints,
    ) -> Self {
        Self {
            network_name,
            chain_id,
            rpc_url,
            explorer_url,
            contracts,
            indexer,
        }
    }

    /// Load network constants from `$COMMONS_CONFIG_DIR/network.toml`
    pub fn load(network: &str) -> Result<Self, ConfigError> {
        let config_dir = env::var("COMMONS_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
        Self::load_from(Path::new(&config_dir), network)
    }

    /// Load network constants from `<config_dir>/network.toml`
    pub fn load_from(config_dir: &Path, network: &str) -> Result<Self, ConfigError> {
        let settings = ConfigLoader::builder()
            .add_source(File::with_name(&config_dir.join("network").to_string_lossy()))
            .build()?;

        // Extract the network section
        settings.get::<NetworkConstants>(network)
    }
}

/// Contract address configuration; the defaults are the Celo deployments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractAddresses {
    /// COMMONS ERC-20 token
    pub token: Address,
    /// Praise-with-tip contract
    pub praise: Address,
    /// Attestation service
    pub eas: Address,
    /// Daily reward contract
    #[serde(default)]
    pub reward: Option<Address>,
    /// Membership staking NFT contract
    #[serde(default)]
    pub staking: Option<Address>,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self {
            token: COMMONS_TOKEN,
            praise: PRAISE_CONTRACT,
            eas: EAS_CONTRACT,
            reward: None,
            staking: None,
        }
    }
}

/// GraphQL endpoints for aggregate reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexerEndpoints {
    /// Account balances and staked NFTs
    pub accounts_graphql: String,
    /// Attestation records
    pub attestations_graphql: String,
    /// Schema UID tip attestations are filtered by
    pub tip_schema_uid: String,
}

impl Default for IndexerEndpoints {
    fn default() -> Self {
        Self {
            accounts_graphql: "https://indexer.bigdevenergy.link/92f8c3e/v1/graphql/".to_string(),
            attestations_graphql: "https://celo.easscan.org/graphql".to_string(),
            tip_schema_uid: TIP_SCHEMA_UID.to_string(),
        }
    }
}

/// Name service settings. Names always resolve on the reference chain,
/// whatever chain the rest of the SDK talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameServiceConfig {
    /// JSON-RPC endpoint of the reference chain
    pub rpc_url: String,
    /// Registry contract
    pub registry: Address,
    /// Seconds before a lookup counts as failed
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_RESOLUTION_TIMEOUT_SECS
}

impl Default for NameServiceConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://eth.merkle.io".to_string(),
            registry: ENS_REGISTRY,
            timeout_secs: DEFAULT_RESOLUTION_TIMEOUT_SECS,
        }
    }
}

/// Token information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Token name
    pub name: String,
    /// Token symbol
    pub symbol: String,
    /// Token decimals
    pub decimals: u32,
}

impl Default for TokenInfo {
    fn default() -> Self {
        Self {
            name: "Commons".to_string(),
            symbol: "COMMONS".to_string(),
            decimals: COMMONS_DECIMALS,
        }
    }
}

/// Network configuration for the Commons ecosystem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonsNetworkConfig {
    /// Network name (e.g., celo)
    pub network_name: String,
    /// EVM chain ID (e.g., 42220)
    pub chain_id: u64,
    /// JSON-RPC endpoint URL
    pub rpc_url: String,
    /// Block explorer base URL
    pub explorer_url: String,
    /// The ecosystem token
    #[serde(default)]
    pub token: TokenInfo,
    /// Contract addresses
    #[serde(default)]
    pub contracts: ContractAddresses,
    /// GraphQL endpoints
    #[serde(default)]
    pub indexer: IndexerEndpoints,
    /// Name resolution settings
    #[serde(default)]
    pub name_service: NameServiceConfig,
}

impl Default for CommonsNetworkConfig {
    fn default() -> Self {
        Self::from_constants(&NetworkConstants::new(
            "celo".to_string(),
            42220,
            "https://forno.celo.org".to_string(),
            "https://celoscan.io".to_string(),
            ContractAddresses::default(),
            IndexerEndpoints::default(),
        ))
    }
}

impl CommonsNetworkConfig {
    /// Create a new network config from network constants
    pub fn from_constants(constants: &NetworkConstants) -> Self {
        Self {
            network_name: constants.network_name.clone(),
            chain_id: constants.chain_id,
            rpc_url: constants.rpc_url.clone(),
            explorer_url: constants.explorer_url.clone(),
            token: TokenInfo::default(),
            contracts: constants.contracts.clone(),
            indexer: constants.indexer.clone(),
            name_service: NameServiceConfig::default(),
        }
    }

    /// Update contract addresses
    pub fn with_contracts(mut self, contract_addresses: ContractAddresses) -> Self {
        self.contracts = contract_addresses;
        self
    }

    /// Set the reward contract address
    pub fn with_reward(mut self, reward: Option<Address>) -> Self {
        self.contracts.reward = reward;
        self
    }

    /// Set the staking contract address
    pub fn with_staking(mut self, staking: Option<Address>) -> Self {
        self.contracts.staking = staking;
        self
    }

    /// Replace the GraphQL endpoints
    pub fn with_indexer(mut self, indexer: IndexerEndpoints) -> Self {
        self.indexer = indexer;
        self
    }

    /// Replace the name service settings
    pub fn with_name_service(mut self, name_service: NameServiceConfig) -> Self {
        self.name_service = name_service;
        self
    }

    /// Apply `COMMONS_RPC_URL` and `COMMONS_NAME_RPC_URL` from the environment
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(rpc_url) = env::var("COMMONS_RPC_URL") {
            self.rpc_url = rpc_url;
        }
        if let Ok(rpc_url) = env::var("COMMONS_NAME_RPC_URL") {
            self.name_service.rpc_url = rpc_url;
        }
        self
    }

    /// Explorer link for a transaction hash
    pub fn tx_url(&self, hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), hash)
    }
}

/// Someone who can be tipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    /// Display name
    pub name: String,
    /// Hex address or a name to resolve
    pub address: String,
    /// Avatar
    pub image_url: Option<String>,
}

/// Complete configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active network configuration
    pub network: CommonsNetworkConfig,
    /// Tip recipient directory
    #[serde(default)]
    pub recipients: Vec<Recipient>,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_network(CommonsNetworkConfig::default())
    }
}

impl Config {
    /// Create a new configuration with the specified network
    pub fn with_network(network: CommonsNetworkConfig) -> Self {
        Self {
            network,
            recipients: Vec::new(),
        }
    }

    /// Load configuration from a file
    pub fn load(path: &PathBuf) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load configuration from a file, falling back to defaults when it does not exist
    pub fn load_or_default(path: &PathBuf) -> Result<Self, Error> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &PathBuf) -> Result<(), Error> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        // Create directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("commons");
        path.push("config.toml");
        path
    }

    /// Add a tip recipient
    pub fn add_recipient(&mut self, recipient: Recipient) {
        self.recipients.push(recipient);
    }

    /// Look up a recipient by display name, case-insensitively
    pub fn recipient(&self, name: &str) -> Option<&Recipient> {
        self.recipients
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
    }
}
