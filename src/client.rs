use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use serde::Serialize;

use crate::amount::decimal_u256;
use crate::config::CommonsNetworkConfig;
use crate::contracts::{IERC20, IMembershipStaking, IRewards, RewardCall, StakingCall, TokenCall};
use crate::error::Error;
use crate::rpc::{EthCall, HttpRpc};
use crate::staking::NftMetadata;
use crate::time::format_countdown;

/// Label of the claim action when the reward can be claimed
pub const CLAIM_LABEL: &str = "Claim 10 $COMMONS";
/// Label of the claim action while the cooldown runs
pub const WAIT_LABEL: &str = "Patience, young commoner";
/// Label shown to accounts outside the community
pub const APPLY_LABEL: &str = "Apply to join the commons community";

/// Reward claim state of one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimStatus {
    pub whitelisted: bool,
    pub can_claim: bool,
    #[serde(with = "decimal_u256")]
    pub seconds_until_next_claim: U256,
}

impl ClaimStatus {
    /// Text of the primary action for this state
    pub fn action_label(&self) -> &'static str {
        if !self.whitelisted {
            APPLY_LABEL
        } else if !self.can_claim {
            WAIT_LABEL
        } else {
            CLAIM_LABEL
        }
    }

    /// `HH:MM:SS` until the next claim
    pub fn countdown(&self) -> String {
        format_countdown(Some(self.seconds_until_next_claim))
    }

    /// Whether a claim may be submitted, given the session state of the caller
    pub fn claim_enabled(&self, connected: bool, tx_pending: bool) -> bool {
        self.whitelisted && self.can_claim && connected && !tx_pending
    }
}

/// Read client for the Commons contracts
pub struct CommonsClient<C = HttpRpc> {
    /// Transport to the application chain
    rpc: C,
    /// Network configuration
    config: CommonsNetworkConfig,
}

impl CommonsClient<HttpRpc> {
    /// Create a new client over HTTP JSON-RPC
    pub fn new(config: CommonsNetworkConfig) -> Self {
        let rpc = HttpRpc::new(config.rpc_url.clone());
        Self { rpc, config }
    }
}

impl<C: EthCall> CommonsClient<C> {
    /// Create a client over an arbitrary transport
    pub fn with_rpc(rpc: C, config: CommonsNetworkConfig) -> Self {
        Self { rpc, config }
    }

    /// Get the network configuration
    pub fn config(&self) -> &CommonsNetworkConfig {
        &self.config
    }

    fn reward_contract(&self) -> Result<Address, Error> {
        self.config
            .contracts
            .reward
            .ok_or_else(|| Error::Config("Reward contract address not configured".to_string()))
    }

    fn staking_contract(&self) -> Result<Address, Error> {
        self.config
            .contracts
            .staking
            .ok_or_else(|| Error::Config("Staking contract address not configured".to_string()))
    }

    /// Seconds until `account` may claim again
    pub async fn time_until_next_claim(&self, account: Address) -> Result<U256, Error> {
        let data = RewardCall::TimeUntilNextClaim { account }.encode();
        let raw = self.rpc.call(self.reward_contract()?, data).await?;
        Ok(IRewards::timeUntilNextClaimCall::abi_decode_returns(&raw)?)
    }

    /// Whether `account` may claim now
    pub async fn can_claim_reward(&self, account: Address) -> Result<bool, Error> {
        let data = RewardCall::CanClaimReward { account }.encode();
        let raw = self.rpc.call(self.reward_contract()?, data).await?;
        Ok(IRewards::canClaimRewardCall::abi_decode_returns(&raw)?)
    }

    /// Whether `account` is whitelisted for rewards
    pub async fn is_whitelisted(&self, account: Address) -> Result<bool, Error> {
        let data = RewardCall::Whitelist { account }.encode();
        let raw = self.rpc.call(self.reward_contract()?, data).await?;
        Ok(IRewards::whitelistCall::abi_decode_returns(&raw)?)
    }

    /// Combined claim state, read concurrently
    pub async fn claim_status(&self, account: Address) -> Result<ClaimStatus, Error> {
        let (whitelisted, can_claim, seconds_until_next_claim) = tokio::try_join!(
            self.is_whitelisted(account),
            self.can_claim_reward(account),
            self.time_until_next_claim(account),
        )?;
        Ok(ClaimStatus {
            whitelisted,
            can_claim,
            seconds_until_next_claim,
        })
    }

    /// Membership NFT held by `account`, if any
    pub async fn staked_token(&self, account: Address) -> Result<Option<U256>, Error> {
        let data = StakingCall::StakerToNft { staker: account }.encode();
        let raw = self.rpc.call(self.staking_contract()?, data).await?;
        let token_id = IMembershipStaking::stakerToNFTCall::abi_decode_returns(&raw)?;
        Ok(if token_id.is_zero() { None } else { Some(token_id) })
    }

    /// Raw metadata URI of a membership NFT
    pub async fn token_uri(&self, token_id: U256) -> Result<String, Error> {
        let data = StakingCall::TokenUri { token_id }.encode();
        let raw = self.rpc.call(self.staking_contract()?, data).await?;
        Ok(IMembershipStaking::tokenURICall::abi_decode_returns(&raw)?)
    }

    /// Decoded metadata of a membership NFT
    pub async fn token_metadata(&self, token_id: U256) -> Result<NftMetadata, Error> {
        NftMetadata::from_token_uri(&self.token_uri(token_id).await?)
    }

    /// COMMONS balance of `owner` in base units
    pub async fn balance_of(&self, owner: Address) -> Result<U256, Error> {
        let data = TokenCall::BalanceOf { owner }.encode();
        let raw = self.rpc.call(self.config.contracts.token, data).await?;
        Ok(IERC20::balanceOfCall::abi_decode_returns(&raw)?)
    }

    /// COMMONS allowance granted by `owner` to `spender`
    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, Error> {
        let data = TokenCall::Allowance { owner, spender }.encode();
        let raw = self.rpc.call(self.config.contracts.token, data).await?;
        Ok(IERC20::allowanceCall::abi_decode_returns(&raw)?)
    }

    /// COMMONS allowance granted by `owner` to the staking contract
    pub async fn staking_allowance(&self, owner: Address) -> Result<U256, Error> {
        self.allowance(owner, self.staking_contract()?).await
    }
}
