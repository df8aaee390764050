//! ICS document generation for resolved events.

use chrono::{DateTime, Days, Duration, Utc};
use icalendar::{Calendar, Component, Property, ValueType};

use crate::error::{FincalError, FincalResult};
use crate::event::{EventTime, ResolvedEvent};

pub const PRODID: &str = "-//Financial Calendar//EN";

const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const DATE_FORMAT: &str = "%Y%m%d";

/// Document-level settings.
#[derive(Debug, Clone)]
pub struct IcsOptions {
    /// Shown by clients as the calendar's name (X-WR-CALNAME)
    pub calendar_name: Option<String>,
    /// Length given to timed events
    pub event_duration: Duration,
    /// DTSTAMP for every entry
    pub generated_at: DateTime<Utc>,
}

/// Generate one VCALENDAR holding a VEVENT per resolved event, in input order.
pub fn generate_ics(events: &[ResolvedEvent], options: &IcsOptions) -> FincalResult<String> {
    let mut cal = Calendar::new();

    if let Some(ref name) = options.calendar_name {
        cal.name(name);
    }

    let dtstamp = options.generated_at.format(UTC_FORMAT).to_string();

    for event in events {
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&event.uid);
        ics_event.summary(&event.summary);
        ics_event.description(&event.description);

        // DTSTAMP - required by RFC 5545
        ics_event.add_property("DTSTAMP", &dtstamp);

        match event.start {
            EventTime::Timed(start) => {
                ics_event.add_property("DTSTART", start.format(UTC_FORMAT).to_string());
                let end = start + options.event_duration;
                ics_event.add_property("DTEND", end.format(UTC_FORMAT).to_string());
            }
            EventTime::AllDay(date) => {
                // DTEND is exclusive for date values
                let end = date.checked_add_days(Days::new(1)).ok_or_else(|| {
                    FincalError::IcsGenerate(format!("No day after {date} for '{}'", event.summary))
                })?;
                add_date_property(&mut ics_event, "DTSTART", &date.format(DATE_FORMAT).to_string());
                add_date_property(&mut ics_event, "DTEND", &end.format(DATE_FORMAT).to_string());
            }
        }

        cal.push(ics_event.done());
    }

    let cal = cal.done();

    Ok(strip_ics_bloat(&cal.to_string()))
}

fn add_date_property(ics_event: &mut icalendar::Event, name: &str, value: &str) {
    let mut prop = Property::new(name, value);
    prop.append_parameter(ValueType::Date);
    ics_event.append_property(prop);
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with ours
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODID);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
