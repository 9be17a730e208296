//! Tip form checks and `praiseWithTip` preparation
//!
//! A tip is only ever prepared for a recipient that resolved to a concrete
//! address. An unresolved recipient rejects the tip before any calldata exists.

use alloy_primitives::{Address, U256};
use regex::Regex;

use crate::amount::{parse_units, COMMONS_DECIMALS};
use crate::config::ContractAddresses;
use crate::contracts::{ContractCall, PraiseWithTip, TokenCall};
use crate::error::Error;

const COMMENT_PATTERN: &str = r"^[a-zA-Z0-9\s\.,\?!\-]*$";
const TIP_AMOUNT_PATTERN: &str = r"^\d+(\.\d{1,2})?$";

pub const COMMENT_MIN_CHARS: usize = 2;
pub const COMMENT_MAX_CHARS: usize = 50;

pub const COMMENT_LENGTH: &str = "Comment must be between 2 and 50 characters";
pub const COMMENT_CHARSET: &str = "Comment must be alphanumeric";
pub const INVALID_TIP_AMOUNT: &str = "Tip amount must be a positive number with at most 2 decimals";
pub const UNRESOLVED_RECIPIENT: &str = "Recipient could not be resolved to an address; tip not sent";
pub const TIP_EXCEEDS_BALANCE: &str = "Tip amount exceeds your balance";

fn compile(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|e| Error::Config(format!("Regex compilation failed: {}", e)))
}

/// Check the praise comment
pub fn validate_comment(comment: &str) -> Result<(), Error> {
    let len = comment.chars().count();
    if !(COMMENT_MIN_CHARS..=COMMENT_MAX_CHARS).contains(&len) {
        return Err(Error::Rejected(COMMENT_LENGTH.to_string()));
    }
    if !compile(COMMENT_PATTERN)?.is_match(comment) {
        return Err(Error::Rejected(COMMENT_CHARSET.to_string()));
    }
    Ok(())
}

/// Check the tip amount and convert it to base units
pub fn validate_tip_amount(text: &str) -> Result<U256, Error> {
    if !compile(TIP_AMOUNT_PATTERN)?.is_match(text) {
        return Err(Error::Rejected(INVALID_TIP_AMOUNT.to_string()));
    }
    match parse_units(text, COMMONS_DECIMALS) {
        Ok(amount) if !amount.is_zero() => Ok(amount),
        _ => Err(Error::Rejected(INVALID_TIP_AMOUNT.to_string())),
    }
}

/// Validate a tip and build the `praiseWithTip` arguments.
///
/// `to` is the outcome of name resolution; `None` (or the zero address)
/// rejects the tip.
pub fn prepare_tip(
    comment: &str,
    from: Address,
    to: Option<Address>,
    amount_text: &str,
    balance: U256,
) -> Result<PraiseWithTip, Error> {
    validate_comment(comment)?;
    let amount = validate_tip_amount(amount_text)?;

    let to = match to {
        Some(to) if !to.is_zero() => to,
        _ => return Err(Error::Rejected(UNRESOLVED_RECIPIENT.to_string())),
    };
    if amount > balance {
        return Err(Error::Rejected(TIP_EXCEEDS_BALANCE.to_string()));
    }

    Ok(PraiseWithTip {
        comment: comment.to_string(),
        from,
        to,
        amount,
    })
}

/// Calls to submit for a prepared tip, approving the praise contract first
/// when the allowance does not cover the amount
pub fn tip_calls(praise: &PraiseWithTip, allowance: U256, contracts: &ContractAddresses) -> Vec<ContractCall> {
    let mut calls = Vec::with_capacity(2);
    if praise.amount > allowance {
        calls.push(
            TokenCall::Approve {
                spender: contracts.praise,
                amount: praise.amount,
            }
            .to_call(contracts.token),
        );
    }
    calls.push(praise.to_call(contracts.praise));
    calls
}
