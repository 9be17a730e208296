use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{sol, SolCall};
use serde::{Deserialize, Serialize};

use crate::amount::decimal_u256;

sol! {
    /// Daily reward distributor
    interface IRewards {
        function timeUntilNextClaim(address account) external view returns (uint256);
        function canClaimReward(address account) external view returns (bool);
        function whitelist(address account) external view returns (bool);
        function claimReward() external;
    }

    /// Membership NFT minted by staking COMMONS
    interface IMembershipStaking {
        function stakerToNFT(address staker) external view returns (uint256);
        function tokenURI(uint256 tokenId) external view returns (string memory);
        function stake(uint256 amount) external;
        function unstake(uint256 tokenId) external;
    }

    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function transfer(address to, uint256 amount) external returns (bool);
    }

    interface IPraise {
        function praiseWithTip(string memory comment, address from, address to, uint256 amount)
            external
            returns (bytes32 attestationUID);
    }

    interface IEnsRegistry {
        function resolver(bytes32 node) external view returns (address);
    }

    interface IAddrResolver {
        function addr(bytes32 node) external view returns (address);
    }
}

/// Encoded call ready to be signed or sent with `eth_call`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractCall {
    /// Target contract
    pub to: Address,
    /// ABI-encoded calldata
    pub data: Bytes,
}

impl ContractCall {
    /// `0x`-prefixed calldata
    pub fn data_hex(&self) -> String {
        self.data.to_string()
    }
}

/// Messages for the daily reward contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardCall {
    /// Seconds until `account` may claim again
    TimeUntilNextClaim { account: Address },
    /// Whether `account` may claim now
    CanClaimReward { account: Address },
    /// Whether `account` is a community member
    Whitelist { account: Address },
    /// Claim the daily reward for the sender
    ClaimReward {},
}

impl RewardCall {
    pub fn signature(&self) -> &'static str {
        match self {
            RewardCall::TimeUntilNextClaim { .. } => IRewards::timeUntilNextClaimCall::SIGNATURE,
            RewardCall::CanClaimReward { .. } => IRewards::canClaimRewardCall::SIGNATURE,
            RewardCall::Whitelist { .. } => IRewards::whitelistCall::SIGNATURE,
            RewardCall::ClaimReward {} => IRewards::claimRewardCall::SIGNATURE,
        }
    }

    pub fn encode(&self) -> Bytes {
        let data = match *self {
            RewardCall::TimeUntilNextClaim { account } => {
                IRewards::timeUntilNextClaimCall { account }.abi_encode()
            }
            RewardCall::CanClaimReward { account } => {
                IRewards::canClaimRewardCall { account }.abi_encode()
            }
            RewardCall::Whitelist { account } => IRewards::whitelistCall { account }.abi_encode(),
            RewardCall::ClaimReward {} => IRewards::claimRewardCall {}.abi_encode(),
        };
        data.into()
    }

    pub fn to_call(&self, contract: Address) -> ContractCall {
        ContractCall {
            to: contract,
            data: self.encode(),
        }
    }
}

/// Messages for the membership staking NFT contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakingCall {
    /// Token id held by `staker`, zero when none
    StakerToNft { staker: Address },
    /// Metadata URI of a token
    TokenUri { token_id: U256 },
    /// Stake tokens and mint a membership NFT
    Stake { amount: U256 },
    /// Burn the NFT and return the stake
    Unstake { token_id: U256 },
}

impl StakingCall {
    pub fn signature(&self) -> &'static str {
        match self {
            StakingCall::StakerToNft { .. } => IMembershipStaking::stakerToNFTCall::SIGNATURE,
            StakingCall::TokenUri { .. } => IMembershipStaking::tokenURICall::SIGNATURE,
            StakingCall::Stake { .. } => IMembershipStaking::stakeCall::SIGNATURE,
            StakingCall::Unstake { .. } => IMembershipStaking::unstakeCall::SIGNATURE,
        }
    }

    pub fn encode(&self) -> Bytes {
        let data = match *self {
            StakingCall::StakerToNft { staker } => {
                IMembershipStaking::stakerToNFTCall { staker }.abi_encode()
            }
            StakingCall::TokenUri { token_id } => {
                IMembershipStaking::tokenURICall { tokenId: token_id }.abi_encode()
            }
            StakingCall::Stake { amount } => IMembershipStaking::stakeCall { amount }.abi_encode(),
            StakingCall::Unstake { token_id } => {
                IMembershipStaking::unstakeCall { tokenId: token_id }.abi_encode()
            }
        };
        data.into()
    }

    pub fn to_call(&self, contract: Address) -> ContractCall {
        ContractCall {
            to: contract,
            data: self.encode(),
        }
    }
}

/// ERC-20 messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCall {
    BalanceOf { owner: Address },
    Allowance { owner: Address, spender: Address },
    Approve { spender: Address, amount: U256 },
    Transfer { to: Address, amount: U256 },
}

impl TokenCall {
    pub fn signature(&self) -> &'static str {
        match self {
            TokenCall::BalanceOf { .. } => IERC20::balanceOfCall::SIGNATURE,
            TokenCall::Allowance { .. } => IERC20::allowanceCall::SIGNATURE,
            TokenCall::Approve { .. } => IERC20::approveCall::SIGNATURE,
            TokenCall::Transfer { .. } => IERC20::transferCall::SIGNATURE,
        }
    }

    pub fn encode(&self) -> Bytes {
        let data = match *self {
            TokenCall::BalanceOf { owner } => IERC20::balanceOfCall { owner }.abi_encode(),
            TokenCall::Allowance { owner, spender } => {
                IERC20::allowanceCall { owner, spender }.abi_encode()
            }
            TokenCall::Approve { spender, amount } => {
                IERC20::approveCall { spender, amount }.abi_encode()
            }
            TokenCall::Transfer { to, amount } => IERC20::transferCall { to, amount }.abi_encode(),
        };
        data.into()
    }

    pub fn to_call(&self, contract: Address) -> ContractCall {
        ContractCall {
            to: contract,
            data: self.encode(),
        }
    }
}

/// Name-service lookups, keyed by a namehash node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameServiceCall {
    /// Resolver contract registered for a node
    Resolver { node: B256 },
    /// Address record held by a resolver
    Addr { node: B256 },
}

impl NameServiceCall {
    pub fn signature(&self) -> &'static str {
        match self {
            NameServiceCall::Resolver { .. } => IEnsRegistry::resolverCall::SIGNATURE,
            NameServiceCall::Addr { .. } => IAddrResolver::addrCall::SIGNATURE,
        }
    }

    pub fn encode(&self) -> Bytes {
        let data = match *self {
            NameServiceCall::Resolver { node } => IEnsRegistry::resolverCall { node }.abi_encode(),
            NameServiceCall::Addr { node } => IAddrResolver::addrCall { node }.abi_encode(),
        };
        data.into()
    }
}

/// Arguments of `praiseWithTip`, which transfers the tip and records the
/// attestation in one transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PraiseWithTip {
    pub comment: String,
    pub from: Address,
    pub to: Address,
    /// Tip in base units
    #[serde(with = "decimal_u256")]
    pub amount: U256,
}

impl PraiseWithTip {
    pub const SIGNATURE: &'static str = IPraise::praiseWithTipCall::SIGNATURE;

    pub fn encode(&self) -> Bytes {
        IPraise::praiseWithTipCall {
            comment: self.comment.clone(),
            from: self.from,
            to: self.to,
            amount: self.amount,
        }
        .abi_encode()
        .into()
    }

    pub fn to_call(&self, contract: Address) -> ContractCall {
        ContractCall {
            to: contract,
            data: self.encode(),
        }
    }
}
