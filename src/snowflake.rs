//! Snowflake ID helpers: shape validation and creation-time decoding.
//!
//! Discord snowflakes encode a millisecond timestamp in the high 42 bits,
//! offset from the Discord epoch; the low 22 bits are worker/process/sequence
//! counters and are shifted away here.

use chrono::{DateTime, TimeZone, Utc};

/// Discord epoch: 2015-01-01T00:00:00Z in milliseconds since the Unix epoch.
pub const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

const SEQUENCE_BITS: u32 = 22;

/// Check the fixed numeric-ID shape: ASCII digits only, 5 to 30 characters.
pub fn is_valid_id(s: &str) -> bool {
    let len = s.len();
    (5..=30).contains(&len) && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a snowflake string into its numeric value.
/// Returns None for anything that does not fit in a u64.
pub fn parse(id: &str) -> Option<u64> {
    id.parse::<u64>().ok()
}

/// Extract the creation time encoded in a snowflake.
/// Returns None if the ID is not parseable or the timestamp is out of range.
pub fn created_at(id: &str) -> Option<DateTime<Utc>> {
    let raw = parse(id)?;
    let ms = (raw >> SEQUENCE_BITS) as i64 + DISCORD_EPOCH_MS;
    Utc.timestamp_millis_opt(ms).single()
}

/// Format a creation time the way the card displays it: "15 August 2019".
pub fn format_created(ts: DateTime<Utc>) -> String {
    // %-d drops the leading zero on the day
    ts.format("%-d %B %Y").to_string()
}

/// Convenience: decoded-and-formatted creation date, empty string if undecodable.
pub fn created_label(id: &str) -> String {
    created_at(id).map(format_created).unwrap_or_default()
}
