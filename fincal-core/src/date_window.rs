//! The date window an export covers.

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Closed date interval `[start, end]` in the reference timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Window starting on today's date in `tz` and ending `days` later.
    pub fn ahead(now: DateTime<Utc>, tz: Tz, days: u32) -> Self {
        let start = now.with_timezone(&tz).date_naive();
        let end = start
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        DateWindow { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_spans_horizon_inclusive() {
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap();
        let window = DateWindow::ahead(now, chrono_tz::UTC, 7);

        assert_eq!(window.start, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert!(window.contains(window.start));
        assert!(window.contains(window.end));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2024, 3, 12).unwrap()));
    }

    #[test]
    fn test_window_start_uses_reference_timezone_date() {
        // 23:30 UTC is already the next day in Paris
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 23, 30, 0).unwrap();
        let window = DateWindow::ahead(now, chrono_tz::Europe::Paris, 0);

        assert_eq!(window.start, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(window.start, window.end);
    }
}
