//! Aggregate views over indexed accounts

use std::str::FromStr;

use alloy_primitives::{U256, U512};
use serde::Serialize;

use crate::address::shorten_address;
use crate::amount::{format_token_amount, format_units, COMMONS_DECIMALS, DEFAULT_DISPLAY_DECIMALS};
use crate::error::Error;
use crate::indexer::{Account, StakedNft};
use crate::time::format_block_datetime;

/// Ordering of the account list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountSort {
    #[default]
    Balance,
    StakedNfts,
}

impl FromStr for AccountSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balance" => Ok(AccountSort::Balance),
            "stakedNFTs" | "staked-nfts" | "staked_nfts" => Ok(AccountSort::StakedNfts),
            other => Err(Error::Config(format!(
                "Unknown sort '{}'. Use 'balance' or 'stakedNFTs'",
                other
            ))),
        }
    }
}

/// Accounts whose id contains `filter` (case-insensitive) or whose
/// full-precision balance contains it
pub fn filter_accounts(accounts: &[Account], filter: &str) -> Vec<Account> {
    let needle = filter.to_lowercase();
    accounts
        .iter()
        .filter(|account| {
            account.id.to_lowercase().contains(&needle)
                || format_units(account.balance, COMMONS_DECIMALS).contains(filter)
        })
        .cloned()
        .collect()
}

/// Sort descending by the chosen key; ties keep their indexer order
pub fn sort_accounts(mut accounts: Vec<Account>, sort: AccountSort) -> Vec<Account> {
    match sort {
        AccountSort::Balance => accounts.sort_by(|a, b| b.balance.cmp(&a.balance)),
        AccountSort::StakedNfts => {
            accounts.sort_by(|a, b| b.staked_nfts.len().cmp(&a.staked_nfts.len()))
        }
    }
    accounts
}

/// Display data for one staked NFT
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StakedNftView {
    pub token_id: String,
    pub amount: String,
    pub status: &'static str,
    pub timestamp: String,
}

impl StakedNftView {
    pub fn from_nft(nft: &StakedNft) -> Self {
        Self {
            token_id: nft.token_id.clone(),
            amount: format!("{} $COMMONS", format_units(nft.amount, COMMONS_DECIMALS)),
            status: if nft.active { "Active" } else { "Inactive" },
            timestamp: format_block_datetime(&nft.timestamp),
        }
    }
}

/// Display data for one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountCard {
    pub title: String,
    pub balance: String,
    pub staked_count: usize,
    pub last_staked: Option<StakedNftView>,
}

impl AccountCard {
    pub fn from_account(account: &Account) -> Self {
        Self {
            title: shorten_address(&account.id),
            balance: format!(
                "{} $COMMONS",
                format_token_amount(
                    Some(account.balance),
                    COMMONS_DECIMALS,
                    DEFAULT_DISPLAY_DECIMALS
                )
            ),
            staked_count: account.staked_nfts.len(),
            last_staked: account.staked_nfts.first().map(StakedNftView::from_nft),
        }
    }
}

/// An account's share of the listed supply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceShare {
    pub label: String,
    pub balance: String,
    /// Share in basis points, truncated
    pub share_bps: u64,
}

impl BalanceShare {
    /// Share as a percentage with two decimals, e.g. `12.34%`
    pub fn percent(&self) -> String {
        format!("{}.{:02}%", self.share_bps / 100, self.share_bps % 100)
    }
}

/// Balance shares across `accounts`, in the given order
pub fn balance_shares(accounts: &[Account]) -> Vec<BalanceShare> {
    let total = accounts
        .iter()
        .fold(U256::ZERO, |sum, account| sum.saturating_add(account.balance));

    accounts
        .iter()
        .map(|account| BalanceShare {
            label: shorten_address(&account.id),
            balance: format_token_amount(
                Some(account.balance),
                COMMONS_DECIMALS,
                DEFAULT_DISPLAY_DECIMALS,
            ),
            share_bps: if total.is_zero() {
                0
            } else {
                // widened so balance * 10_000 cannot overflow
                let bps = U512::from(account.balance) * U512::from(10_000u64) / U512::from(total);
                bps.saturating_to::<u64>()
            },
        })
        .collect()
}
