//! Membership staking: input checks before submission and NFT metadata

use alloy_primitives::{Address, U256};
use base64::{engine::general_purpose, Engine};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::amount::{parse_units, COMMONS_DECIMALS};
use crate::config::ContractAddresses;
use crate::contracts::{ContractCall, StakingCall, TokenCall};
use crate::error::Error;

/// Stake inputs accept at most four fractional digits
const STAKE_INPUT_PATTERN: &str = r"^\d*\.?\d{0,4}$";

pub const INVALID_STAKE: &str = "Please enter a valid amount to stake.";
pub const INSUFFICIENT_BALANCE: &str = "You don't have enough tokens to stake this amount.";
pub const INSUFFICIENT_ALLOWANCE: &str = "Please set allowance before staking.";

/// Parse the stake amount typed by the user into base units
pub fn parse_stake_input(input: &str) -> Result<U256, Error> {
    let pattern = Regex::new(STAKE_INPUT_PATTERN)
        .map_err(|e| Error::Config(format!("Regex compilation failed: {}", e)))?;
    if input.is_empty() || !pattern.is_match(input) {
        return Err(Error::Rejected(INVALID_STAKE.to_string()));
    }
    match parse_units(input, COMMONS_DECIMALS) {
        Ok(amount) if !amount.is_zero() => Ok(amount),
        _ => Err(Error::Rejected(INVALID_STAKE.to_string())),
    }
}

fn staking_contract(contracts: &ContractAddresses) -> Result<Address, Error> {
    contracts
        .staking
        .ok_or_else(|| Error::Config("Staking contract address not configured".to_string()))
}

/// Check a stake of `amount` against the caller's balance and the allowance
/// already granted to the staking contract. Returns the amount to stake.
pub fn check_stake(amount: U256, balance: U256, allowance: U256) -> Result<U256, Error> {
    if amount.is_zero() {
        return Err(Error::Rejected(INVALID_STAKE.to_string()));
    }
    if amount > balance {
        return Err(Error::Rejected(INSUFFICIENT_BALANCE.to_string()));
    }
    if amount > allowance {
        return Err(Error::Rejected(INSUFFICIENT_ALLOWANCE.to_string()));
    }
    Ok(amount)
}

/// `approve` on the token granting the staking contract `amount`
pub fn approve_call(amount: U256, contracts: &ContractAddresses) -> Result<ContractCall, Error> {
    let spender = staking_contract(contracts)?;
    Ok(TokenCall::Approve { spender, amount }.to_call(contracts.token))
}

/// `stake` on the staking contract
pub fn stake_call(amount: U256, contracts: &ContractAddresses) -> Result<ContractCall, Error> {
    Ok(StakingCall::Stake { amount }.to_call(staking_contract(contracts)?))
}

/// Unstake call for the held token, if there is one
pub fn unstake_call(token_id: Option<U256>, contracts: &ContractAddresses) -> Option<ContractCall> {
    let token_id = token_id.filter(|id| !id.is_zero())?;
    let staking = contracts.staking?;
    Some(StakingCall::Unstake { token_id }.to_call(staking))
}

/// Membership NFT metadata embedded in a `data:` token URI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NftMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NftMetadata {
    /// Decode `data:application/json;base64,...` (or an unencoded `data:` JSON URI)
    pub fn from_token_uri(uri: &str) -> Result<Self, Error> {
        let (header, payload) = uri
            .split_once(',')
            .ok_or_else(|| Error::Contract("token URI is not a data URI".to_string()))?;
        if !header.starts_with("data:") {
            return Err(Error::Contract(format!("unsupported token URI scheme: {}", header)));
        }

        let json = if header.ends_with(";base64") {
            general_purpose::STANDARD
                .decode(payload)
                .map_err(|e| Error::Contract(format!("token URI is not valid base64: {}", e)))?
        } else {
            payload.as_bytes().to_vec()
        };
        Ok(serde_json::from_slice(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const STAKING: Address = address!("0x7777777777777777777777777777777777777777");

    fn units(s: &str) -> U256 {
        U256::from_str_radix(s, 10).unwrap()
    }

    fn rejection(result: Result<U256, Error>) -> String {
        match result {
            Err(Error::Rejected(message)) => message,
            other => panic!("expected a rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_stake_input() {
        assert_eq!(parse_stake_input("1").unwrap(), units("1000000000000000000"));
        assert_eq!(parse_stake_input("0.0001").unwrap(), units("100000000000000"));
        assert_eq!(parse_stake_input(".5").unwrap(), units("500000000000000000"));
    }

    #[test]
    fn test_parse_stake_input_rejects() {
        for bad in ["", "0", "0.0000", ".", "1.23456", "-1", "1e3", "abc"] {
            match parse_stake_input(bad) {
                Err(Error::Rejected(message)) => assert_eq!(message, INVALID_STAKE),
                other => panic!("expected rejection for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_check_stake() {
        let ten = units("10");
        assert_eq!(rejection(check_stake(ten, units("5"), ten)), INSUFFICIENT_BALANCE);
        assert_eq!(check_stake(ten, ten, ten).unwrap(), ten);
        assert_eq!(check_stake(ten, units("20"), units("20")).unwrap(), ten);
        assert_eq!(rejection(check_stake(U256::ZERO, ten, ten)), INVALID_STAKE);
    }

    #[test]
    fn test_check_stake_requires_allowance() {
        let ten = units("10");
        assert_eq!(rejection(check_stake(ten, ten, units("9"))), INSUFFICIENT_ALLOWANCE);
        assert_eq!(rejection(check_stake(ten, ten, U256::ZERO)), INSUFFICIENT_ALLOWANCE);
        // Balance is checked before allowance
        assert_eq!(rejection(check_stake(ten, units("5"), U256::ZERO)), INSUFFICIENT_BALANCE);
    }

    #[test]
    fn test_approve_and_stake_calls() {
        let mut contracts = ContractAddresses::default();
        assert!(matches!(stake_call(units("1"), &contracts), Err(Error::Config(_))));
        assert!(matches!(approve_call(units("1"), &contracts), Err(Error::Config(_))));

        contracts.staking = Some(STAKING);
        let approve = approve_call(units("1"), &contracts).unwrap();
        assert_eq!(approve.to, contracts.token);
        assert_eq!(
            approve.data,
            TokenCall::Approve {
                spender: STAKING,
                amount: units("1"),
            }
            .encode()
        );
        let stake = stake_call(units("1"), &contracts).unwrap();
        assert_eq!(stake.to, STAKING);
        assert_eq!(stake.data, StakingCall::Stake { amount: units("1") }.encode());
    }

    #[test]
    fn test_unstake_call() {
        let mut contracts = ContractAddresses::default();
        contracts.staking = Some(STAKING);
        assert!(unstake_call(None, &contracts).is_none());
        assert!(unstake_call(Some(U256::ZERO), &contracts).is_none());
        assert!(unstake_call(Some(units("3")), &contracts).is_some());
    }

    #[test]
    fn test_metadata_from_base64_uri() {
        let json = r#"{"name":"Commons Member #3","description":"Staked","image":"data:image/svg+xml;base64,PHN2Zy8+","attributes":[{"trait_type":"Amount","value":"10"}]}"#;
        let uri = format!(
            "data:application/json;base64,{}",
            general_purpose::STANDARD.encode(json)
        );
        let metadata = NftMetadata::from_token_uri(&uri).unwrap();
        assert_eq!(metadata.name.as_deref(), Some("Commons Member #3"));
        assert!(metadata.image.unwrap().starts_with("data:image/svg+xml"));
        assert!(metadata.extra.contains_key("attributes"));
    }

    #[test]
    fn test_metadata_rejects_bad_uris() {
        assert!(NftMetadata::from_token_uri("ipfs://abc").is_err());
        assert!(NftMetadata::from_token_uri("data:application/json;base64,!!!").is_err());
        assert!(NftMetadata::from_token_uri("data:application/json,{not json").is_err());
        let plain = NftMetadata::from_token_uri(r#"data:application/json,{"name":"x"}"#).unwrap();
        assert_eq!(plain.name.as_deref(), Some("x"));
    }
}
