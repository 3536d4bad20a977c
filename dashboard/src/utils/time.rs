use jiff::{Timestamp, tz::TimeZone};

/// Date and time down to the minute, e.g. `2025-05-06 10:15`.
pub fn format_timestamp(timestamp: Timestamp, tz: &TimeZone) -> String {
    timestamp
        .to_zoned(tz.clone())
        .strftime("%Y-%m-%d %H:%M")
        .to_string()
}

/// Like [`format_timestamp`], with a placeholder for missing values.
pub fn format_optional(timestamp: Option<Timestamp>, tz: &TimeZone) -> String {
    timestamp
        .map(|timestamp| format_timestamp(timestamp, tz))
        .unwrap_or_else(|| "-".to_string())
}

/// Hour and minute only, for hourly buckets.
pub fn format_clock(timestamp: Timestamp, tz: &TimeZone) -> String {
    timestamp.to_zoned(tz.clone()).strftime("%H:%M").to_string()
}
