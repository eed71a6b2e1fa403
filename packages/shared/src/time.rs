//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// Wall-clock format used for message timestamps (e.g. `2023-01-01 00:00:00`).
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_unix_timestamp_millis()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp (milliseconds)
pub fn get_unix_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Build a fixed UTC offset from whole hours.
///
/// Returns `None` when the offset is out of range (beyond ±23 hours).
pub fn offset_from_hours(hours: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(hours.checked_mul(3600)?)
}

/// Format a Unix timestamp (milliseconds) as `YYYY-MM-DD HH:MM:SS` in the given offset.
///
/// Returns `None` for timestamps chrono cannot represent.
pub fn format_date_time(timestamp_millis: i64, offset: FixedOffset) -> Option<String> {
    let utc: DateTime<Utc> = Utc.timestamp_millis_opt(timestamp_millis).single()?;
    Some(utc.with_timezone(&offset).format(DATE_TIME_FORMAT).to_string())
}
