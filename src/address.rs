//! 20-byte account addresses and their display forms

pub use alloy_primitives::Address;

use crate::error::Error;

/// Parse a `0x`-prefixed 40-digit hex address, accepting any letter case.
pub fn parse_address(s: &str) -> Result<Address, Error> {
    if !is_valid_address(s) {
        return Err(Error::InvalidAddress(format!(
            "'{}' is not a 0x-prefixed 40 digit hex address",
            s
        )));
    }
    // is_valid_address guarantees an ASCII two-byte prefix
    s[2..]
        .parse::<Address>()
        .map_err(|e| Error::InvalidAddress(format!("'{}': {}", s, e)))
}

/// Whether `s` has the canonical `0x` + 40 hex digit shape
pub fn is_valid_address(s: &str) -> bool {
    let digits = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(digits) => digits,
        None => return false,
    };
    digits.len() == 40 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Shorten an address to `first6...last4` for display.
///
/// Works on characters, so short inputs overlap the way string slicing from
/// both ends does. Empty input gives an empty string.
pub fn shorten_address(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = address.chars().collect();
    let head: String = chars.iter().take(6).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}
