mod utils;

use std::fs;

use commons_sdk::address::parse_address;
use commons_sdk::config::{
    CommonsNetworkConfig, Config, IndexerEndpoints, NetworkConstants, Recipient, COMMONS_TOKEN,
    EAS_CONTRACT, ENS_REGISTRY, PRAISE_CONTRACT,
};
use tempfile::tempdir;
use utils::test_utils::{create_test_network_config, init_test_env, load_test_config};

#[test]
fn test_network_config_loading() {
    init_test_env();

    let network = tokio_test::assert_ok!(NetworkConstants::load("celo"));
    assert_eq!(network.network_name, "celo", "Network name should match");
    assert_eq!(network.chain_id, 42220, "Chain ID should match");
    assert!(!network.rpc_url.is_empty(), "RPC URL should not be empty");
    assert_eq!(network.contracts.token, COMMONS_TOKEN);
    assert_eq!(network.contracts.praise, PRAISE_CONTRACT);
    assert_eq!(network.contracts.eas, EAS_CONTRACT);
    assert_eq!(network.contracts.reward, None);
    assert_eq!(network.indexer, IndexerEndpoints::default());

    assert!(NetworkConstants::load("no-such-network").is_err());
}

#[test]
fn test_network_table_supplies_its_own_addresses() {
    let dir = tempdir().expect("Failed to create temp dir");
    fs::write(
        dir.path().join("network.toml"),
        r#"
[devnet]
network_name = "devnet"
chain_id = 31337
rpc_url = "http://127.0.0.1:8545"
explorer_url = "http://127.0.0.1:4000"

[devnet.contracts]
token = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
praise = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"
eas = "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0"
staking = "0xCf7Ed3AccA5a467e9e704C703E8D87F634fB0Fc9"

[devnet.indexer]
accounts_graphql = "http://127.0.0.1:8080/v1/graphql"
attestations_graphql = "http://127.0.0.1:8081/graphql"
tip_schema_uid = "0x01"

[incomplete]
network_name = "incomplete"
chain_id = 1
rpc_url = "http://127.0.0.1:8545"
explorer_url = "http://127.0.0.1:4000"
"#,
    )
    .expect("Failed to write network table");

    let constants = NetworkConstants::load_from(dir.path(), "devnet").unwrap();
    let network = CommonsNetworkConfig::from_constants(&constants);
    let token = parse_address("0x5FbDB2315678afecb367f032d93F642f64180aa3").unwrap();
    assert_eq!(network.chain_id, 31337);
    assert_eq!(network.contracts.token, token);
    assert_ne!(network.contracts.token, COMMONS_TOKEN);
    assert!(network.contracts.staking.is_some());
    assert_eq!(network.contracts.reward, None);
    assert_eq!(network.indexer.accounts_graphql, "http://127.0.0.1:8080/v1/graphql");

    // A network without deployments cannot fall back to another chain's contracts
    assert!(NetworkConstants::load_from(dir.path(), "incomplete").is_err());
}

#[test]
fn test_test_config_loading() {
    let test_config = load_test_config();

    assert_eq!(test_config.test.network, "celo");
    let token = test_config
        .tokens
        .get("commons")
        .expect("COMMONS token should be configured");
    assert_eq!(token.decimals, 18);
    assert_eq!(token.address.parse::<commons_sdk::Address>().unwrap(), COMMONS_TOKEN);
    assert!(test_config.accounts.contains_key("alice"));
}

#[test]
fn test_network_config_defaults() {
    let network_config = create_test_network_config();

    assert_eq!(network_config.token.symbol, "COMMONS");
    assert_eq!(network_config.token.decimals, 18);
    assert_eq!(network_config.contracts.token, COMMONS_TOKEN);
    assert_eq!(network_config.name_service.registry, ENS_REGISTRY);
    assert_eq!(
        network_config.tx_url("0xabc"),
        "https://celoscan.io/tx/0xabc"
    );
}

#[test]
fn test_config_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::with_network(create_test_network_config());
    config.add_recipient(Recipient {
        name: "Alice".to_string(),
        address: "alice.eth".to_string(),
        image_url: None,
    });
    config.save(&path).expect("Failed to save config");

    let loaded = Config::load(&path).expect("Failed to load config");
    assert_eq!(loaded.network.chain_id, config.network.chain_id);
    assert_eq!(loaded.network.contracts.reward, config.network.contracts.reward);
    assert_eq!(
        loaded.recipient("alice").map(|r| r.address.as_str()),
        Some("alice.eth"),
        "recipient lookup should ignore case"
    );
}

#[test]
fn test_load_or_default_without_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config::load_or_default(&dir.path().join("missing.toml")).unwrap();

    let defaults = CommonsNetworkConfig::default();
    assert_eq!(config.network.network_name, defaults.network_name);
    assert!(config.recipients.is_empty());
}
