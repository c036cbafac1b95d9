//! Every time shown to people goes through here, rendered in UTC, US Eastern
//! and US Pacific from a single instant.

use chrono::{DateTime, Utc};
use chrono_tz::America::{Los_Angeles, New_York};

/// Format of row keys written to the sheet
pub const ROW_KEY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Convert epoch seconds (with fraction) to a UTC instant; out-of-range values clamp to the epoch
pub fn epoch_to_utc(ts: f64) -> DateTime<Utc> {
    if !ts.is_finite() {
        return DateTime::<Utc>::default();
    }
    let secs = ts.floor();
    let nanos = ((ts - secs) * 1_000_000_000.0) as u32;
    DateTime::from_timestamp(secs as i64, nanos.min(999_999_999)).unwrap_or_default()
}

/// `HH:MM UTC / HH:MM ET / HH:MM PT`
pub fn format_zones(at: DateTime<Utc>) -> String {
    format!(
        "{} / {} / {}",
        at.format("%H:%M UTC"),
        at.with_timezone(&New_York).format("%H:%M ET"),
        at.with_timezone(&Los_Angeles).format("%H:%M PT"),
    )
}

pub fn format_epoch_zones(ts: f64) -> String {
    format_zones(epoch_to_utc(ts))
}

/// Triple-zone time followed by the UTC month/day, e.g. `14:05 UTC / ... on 06/10`
pub fn format_latest_activity(ts: f64) -> String {
    let at = epoch_to_utc(ts);
    format!("{} on {}", format_zones(at), at.format("%m/%d"))
}

/// Natural key for message rows; always UTC so keys are stable across hosts
pub fn format_row_key(ts: f64) -> String {
    epoch_to_utc(ts).format(ROW_KEY_FORMAT).to_string()
}

/// Long date for digest headers, e.g. `June 10, 2025`
pub fn format_report_date(at: DateTime<Utc>) -> String {
    at.format("%B %d, %Y").to_string()
}
