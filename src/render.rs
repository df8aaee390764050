//! Terminal formatting for resolved events.

use chrono::{Local, NaiveDate};
use fincal_core::event::EventTime;

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
pub fn format_date_label(time: &EventTime) -> String {
    let today = Local::now().date_naive();
    date_label(local_date(time), today)
}

fn local_date(time: &EventTime) -> NaiveDate {
    match time {
        EventTime::AllDay(d) => *d,
        EventTime::Timed(dt) => dt.with_timezone(&Local).date_naive(),
    }
}

fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// Format the time portion of an event (e.g. "  15:00" or "all-day")
pub fn format_time(time: &EventTime) -> String {
    match time {
        EventTime::AllDay(_) => "all-day".to_string(),
        EventTime::Timed(dt) => format!("{:>7}", dt.with_timezone(&Local).format("%H:%M")),
    }
}
