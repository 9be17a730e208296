//! Countdown and calendar formatting

use std::fmt;

use alloy_primitives::U256;
use chrono::{Local, TimeZone};

/// Shown in place of a countdown when no account is connected
pub const COUNTDOWN_PLACEHOLDER: &str = "--------";

/// Rendering of a timestamp that could not be interpreted
pub const INVALID_DATE: &str = "Invalid Date";

/// Format a number of seconds as `HH:MM:SS`.
///
/// Hours are not wrapped at 24 and grow past two digits when needed.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format the on-chain `timeUntilNextClaim` value, if there is one.
pub fn format_countdown(remaining: Option<U256>) -> String {
    match remaining {
        Some(remaining) => format_duration(saturating_u64(remaining)),
        None => COUNTDOWN_PLACEHOLDER.to_string(),
    }
}

/// Narrow a `U256` to `u64`, clamping at `u64::MAX`.
pub fn saturating_u64(value: U256) -> u64 {
    value.saturating_to::<u64>()
}

/// Format a unix timestamp (seconds, as a decimal string) as `MM/DD/YYYY` in local time.
pub fn format_block_timestamp(timestamp: &str) -> String {
    format_block_timestamp_in(timestamp, &Local)
}

/// Format a unix timestamp as `MM/DD/YYYY` in the given zone.
pub fn format_block_timestamp_in<Tz>(timestamp: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format_with(timestamp, tz, "%m/%d/%Y")
}

/// Format a unix timestamp as `MM/DD/YYYY, HH:MM:SS` in local time.
pub fn format_block_datetime(timestamp: &str) -> String {
    format_block_datetime_in(timestamp, &Local)
}

/// Format a unix timestamp as `MM/DD/YYYY, HH:MM:SS` in the given zone.
pub fn format_block_datetime_in<Tz>(timestamp: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format_with(timestamp, tz, "%m/%d/%Y, %H:%M:%S")
}

fn format_with<Tz>(timestamp: &str, tz: &Tz, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let seconds = match timestamp.trim().parse::<i64>() {
        Ok(seconds) => seconds,
        Err(_) => return INVALID_DATE.to_string(),
    };
    match tz.timestamp_opt(seconds, 0).single() {
        Some(datetime) => datetime.format(pattern).to_string(),
        None => INVALID_DATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(59), "00:00:59");
        assert_eq!(format_duration(3661), "01:01:01");
        assert_eq!(format_duration(86399), "23:59:59");
        assert_eq!(format_duration(90000), "25:00:00");
        assert_eq!(format_duration(360000), "100:00:00");
    }

    #[test]
    fn test_format_duration_does_not_overflow() {
        assert_eq!(format_duration(u64::MAX), "5124095576030431:00:15");
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(None), COUNTDOWN_PLACEHOLDER);
        assert_eq!(format_countdown(Some(U256::from(3600u64))), "01:00:00");
        assert_eq!(
            format_countdown(Some(U256::MAX)),
            format_duration(u64::MAX)
        );
    }

    #[test]
    fn test_saturating_u64() {
        assert_eq!(saturating_u64(U256::ZERO), 0);
        assert_eq!(saturating_u64(U256::from(u64::MAX)), u64::MAX);
        assert_eq!(saturating_u64(U256::from(u64::MAX as u128 + 1)), u64::MAX);
    }

    #[test]
    fn test_format_block_timestamp() {
        assert_eq!(format_block_timestamp_in("0", &Utc), "01/01/1970");
        assert_eq!(format_block_timestamp_in("1727740800", &Utc), "10/01/2024");
        assert_eq!(format_block_timestamp_in("not-a-number", &Utc), INVALID_DATE);
        assert_eq!(format_block_timestamp_in("", &Utc), INVALID_DATE);
        assert_eq!(
            format_block_timestamp_in(&i64::MAX.to_string(), &Utc),
            INVALID_DATE
        );
    }

    #[test]
    fn test_format_block_datetime() {
        assert_eq!(
            format_block_datetime_in("1727744645", &Utc),
            "10/01/2024, 01:04:05"
        );
    }
}
