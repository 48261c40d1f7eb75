//! Regional trading window used to gate live intraday fetches.

use chrono::{DateTime, FixedOffset, NaiveTime, TimeZone};

use crate::error::ChartwiseError;

/// Seconds east of UTC for India Standard Time (+05:30).
pub const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Daily market window in a fixed regional offset, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingWindow {
    offset: FixedOffset,
    open: NaiveTime,
    close: NaiveTime,
}

impl TradingWindow {
    /// Build a window; `open` must come strictly before `close`.
    pub fn new(
        offset: FixedOffset,
        open: NaiveTime,
        close: NaiveTime,
    ) -> Result<Self, ChartwiseError> {
        if open >= close {
            return Err(ChartwiseError::Config(format!(
                "trading window opens at {} but closes at {}",
                open, close
            )));
        }
        Ok(Self {
            offset,
            open,
            close,
        })
    }

    /// NSE/BSE cash session, 09:15 to 15:30 IST.
    pub fn nse() -> Self {
        Self {
            offset: FixedOffset::east_opt(IST_OFFSET_SECS).expect("IST offset is in range"),
            open: NaiveTime::from_hms_opt(9, 15, 0).expect("valid open time"),
            close: NaiveTime::from_hms_opt(15, 30, 0).expect("valid close time"),
        }
    }

    /// Regional offset the window is expressed in.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Session open time.
    pub fn open(&self) -> NaiveTime {
        self.open
    }

    /// Session close time.
    pub fn close(&self) -> NaiveTime {
        self.close
    }

    /// Whether `now` falls inside the window once converted to the regional offset.
    pub fn contains<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        let local = now.with_timezone(&self.offset).time();
        local >= self.open && local <= self.close
    }
}

impl Default for TradingWindow {
    fn default() -> Self {
        Self::nse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_nse_window_bounds_are_inclusive() {
        let window = TradingWindow::nse();

        // 09:15 IST == 03:45 UTC
        let open = Utc.with_ymd_and_hms(2024, 3, 4, 3, 45, 0).unwrap();
        // 15:30 IST == 10:00 UTC
        let close = Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();

        assert!(window.contains(&open));
        assert!(window.contains(&close));
    }

    #[test]
    fn test_nse_window_outside() {
        let window = TradingWindow::nse();

        let before = Utc.with_ymd_and_hms(2024, 3, 4, 3, 44, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 1).unwrap();
        let midnight = Utc.with_ymd_and_hms(2024, 3, 4, 18, 30, 0).unwrap();

        assert!(!window.contains(&before));
        assert!(!window.contains(&after));
        assert!(!window.contains(&midnight));
    }

    #[test]
    fn test_window_rejects_inverted_bounds() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();

        assert!(TradingWindow::new(offset, ten, nine).is_err());
        assert!(TradingWindow::new(offset, nine, ten).is_ok());
    }
}
