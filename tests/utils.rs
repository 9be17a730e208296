use alloy_primitives::{address, Address, Bytes, U256};
use alloy_sol_types::SolValue;
use async_trait::async_trait;
use commons_sdk::{
    address::parse_address,
    config::{CommonsNetworkConfig, NetworkConstants},
    rpc::EthCall,
    Error,
};
use config::{Config as ConfigLoader, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[cfg(test)]
#[allow(dead_code)]
pub mod test_utils {
    use super::*;

    pub const REWARD_CONTRACT: Address = address!("0x1111111111111111111111111111111111111111");
    pub const STAKING_CONTRACT: Address = address!("0x2222222222222222222222222222222222222222");

    /// Test configuration loaded from config/test.toml
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct TestConfig {
        /// Test settings
        pub test: TestSettings,
        /// Test tokens
        pub tokens: HashMap<String, TestToken>,
        /// Named test accounts
        pub accounts: HashMap<String, String>,
    }

    /// Test settings
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct TestSettings {
        /// Network to use for testing
        pub network: String,
    }

    /// Test token information
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct TestToken {
        pub name: String,
        pub symbol: String,
        pub decimals: u32,
        pub address: String,
    }

    /// Point the config loaders at the crate's config directory
    pub fn init_test_env() {
        if std::env::var("COMMONS_CONFIG_DIR").is_err() {
            std::env::set_var(
                "COMMONS_CONFIG_DIR",
                concat!(env!("CARGO_MANIFEST_DIR"), "/config"),
            );
        }
    }

    /// Load test configuration from config/test.toml
    pub fn load_test_config() -> TestConfig {
        init_test_env();
        let config_dir = std::env::var("COMMONS_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let settings = ConfigLoader::builder()
            .add_source(File::with_name(&format!("{}/test", config_dir)))
            .build()
            .expect("Failed to load test config");

        settings
            .try_deserialize::<TestConfig>()
            .expect("Failed to deserialize test config")
    }

    /// Look up a named test account
    pub fn test_account(name: &str) -> Address {
        let test_config = load_test_config();
        let text = test_config
            .accounts
            .get(name)
            .unwrap_or_else(|| panic!("Account '{}' not found in test config", name));
        parse_address(text).expect("Test account is not a valid address")
    }

    /// Network config for the test network, with reward and staking contracts set
    pub fn create_test_network_config() -> CommonsNetworkConfig {
        let test_config = load_test_config();
        let constants =
            NetworkConstants::load(&test_config.test.network).expect("Failed to load network constants");

        CommonsNetworkConfig::from_constants(&constants)
            .with_reward(Some(REWARD_CONTRACT))
            .with_staking(Some(STAKING_CONTRACT))
    }

    /// ABI word holding an unsigned integer
    pub fn word_uint(value: u128) -> Vec<u8> {
        U256::from(value).abi_encode()
    }

    /// ABI word holding a boolean
    pub fn word_bool(value: bool) -> Vec<u8> {
        value.abi_encode()
    }

    /// ABI word holding an address
    pub fn word_address(address: Address) -> Vec<u8> {
        address.abi_encode()
    }

    /// Return data of a function returning a single string
    pub fn encoded_string(value: &str) -> Vec<u8> {
        (value.to_string(),).abi_encode_params()
    }

    /// A `decodedDataJson` payload for the tip schema
    pub fn tip_payload_json(comment: &str, from: &str, to: &str, amount_hex: &str) -> String {
        serde_json::json!([
            {
                "name": "praise",
                "type": "string",
                "signature": "string praise",
                "value": { "name": "praise", "type": "string", "value": comment }
            },
            {
                "name": "from",
                "type": "address",
                "signature": "address from",
                "value": { "name": "from", "type": "address", "value": from }
            },
            {
                "name": "to",
                "type": "address",
                "signature": "address to",
                "value": { "name": "to", "type": "address", "value": to }
            },
            {
                "name": "amount",
                "type": "uint256",
                "signature": "uint256 amount",
                "value": {
                    "name": "amount",
                    "type": "uint256",
                    "value": { "type": "BigNumber", "hex": amount_hex }
                }
            }
        ])
        .to_string()
    }

    /// `eth_call` transport answering from a table of canned responses.
    ///
    /// Responses are keyed by target contract and full calldata; anything
    /// unmatched fails like a reverted call.
    #[derive(Default)]
    pub struct MockRpc {
        responses: Mutex<HashMap<(Address, Bytes), Bytes>>,
        calls: AtomicUsize,
        delay: Option<Duration>,
        failure: Option<String>,
    }

    impl MockRpc {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every call fails with a transport error
        pub fn failing(message: &str) -> Self {
            Self {
                failure: Some(message.to_string()),
                ..Self::default()
            }
        }

        /// Every call sleeps before answering
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Answer `data` sent to `to` with `result`
        pub fn respond(self, to: Address, data: Bytes, result: Vec<u8>) -> Self {
            self.responses
                .lock()
                .expect("mock lock poisoned")
                .insert((to, data), result.into());
            self
        }

        /// Number of calls made so far
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EthCall for MockRpc {
        async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(message) = &self.failure {
                return Err(Error::Rpc(message.clone()));
            }
            self.responses
                .lock()
                .expect("mock lock poisoned")
                .get(&(to, data))
                .cloned()
                .ok_or_else(|| Error::Rpc("execution reverted".to_string()))
        }
    }
}
