//! Acceptance timestamps.

use std::sync::Arc;

use chrono::FixedOffset;
use hiroba_shared::time::{Clock, SystemClock, format_date_time};

/// Stamps accepted messages with the server's wall-clock time.
#[derive(Clone)]
pub struct TimestampIssuer {
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
}

impl TimestampIssuer {
    pub fn new(clock: Arc<dyn Clock>, offset: FixedOffset) -> Self {
        Self { clock, offset }
    }

    /// System clock, rendered in the given offset
    pub fn system(offset: FixedOffset) -> Self {
        Self::new(Arc::new(SystemClock), offset)
    }

    /// Current time as `YYYY-MM-DD HH:MM:SS`.
    ///
    /// An unrepresentable clock value yields an empty string rather than
    /// rejecting the message.
    pub fn issue(&self) -> String {
        format_date_time(self.clock.now_millis(), self.offset).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiroba_shared::time::{FixedClock, offset_from_hours};

    #[test]
    fn test_issue_formats_clock_value() {
        // テスト項目: 時計の値がオフセット付きの日時文字列として発行される
        // given (前提条件):
        let issuer = TimestampIssuer::new(
            Arc::new(FixedClock::new(1672498800000)),
            offset_from_hours(9).unwrap(),
        );

        // when (操作):
        let timestamp = issuer.issue();

        // then (期待する結果):
        assert_eq!(timestamp, "2023-01-01 00:00:00");
    }

    #[test]
    fn test_issue_out_of_range_clock_yields_empty() {
        // テスト項目: 表現できない時刻の場合は空文字列になる
        // given (前提条件):
        let issuer = TimestampIssuer::new(
            Arc::new(FixedClock::new(i64::MAX)),
            offset_from_hours(0).unwrap(),
        );

        // when (操作):
        let timestamp = issuer.issue();

        // then (期待する結果):
        assert_eq!(timestamp, "");
    }
}
