//! Resolved calendar events, ready for encoding.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// When an event happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTime {
    /// Occupies the whole date in the viewer's zone; never converted through UTC.
    AllDay(NaiveDate),
    /// A precise instant.
    Timed(DateTime<Utc>),
}

impl EventTime {
    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::AllDay(_))
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            EventTime::AllDay(d) => *d,
            EventTime::Timed(dt) => dt.date_naive(),
        }
    }
}

/// An announcement mapped onto a calendar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEvent {
    pub uid: String,
    pub start: EventTime,
    pub summary: String,
    pub description: String,
    /// The row had a time that could not be parsed and fell back to all-day.
    pub degraded: bool,
}
