//! Time resolution: upstream wall-clock strings to calendar instants.
//!
//! Local times are interpreted in one configured IANA zone. The UTC offset
//! is looked up in the tz database for the event's own date, so standard
//! and daylight periods each get their real offset.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::event::{EventTime, ResolvedEvent};
use crate::raw_event::RawEvent;
use crate::uid::event_uid;

/// Time strings that mean "no specific time".
const NO_TIME_SENTINELS: &[&str] = &["all day", "n/a", "tentative"];

const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S"];

/// Placeholder for absent forecast/previous/actual values.
pub const MISSING_VALUE: &str = "N/A";

/// How a raw time field should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeClass<'a> {
    Timed(&'a str),
    AllDay,
}

pub fn classify(local_time: Option<&str>) -> TimeClass<'_> {
    match local_time.map(str::trim) {
        None | Some("") => TimeClass::AllDay,
        Some(t) if NO_TIME_SENTINELS.iter().any(|s| t.eq_ignore_ascii_case(s)) => {
            TimeClass::AllDay
        }
        Some(t) => TimeClass::Timed(t),
    }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
}

/// Attach `tz` to a wall-clock date-time using the offset in force on that date.
///
/// Fall-back overlaps take the earlier instant. Spring-forward gaps are
/// pushed past the transition, which equals reading the time with the
/// pre-transition offset.
pub fn localize(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    let zoned = match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let before = tz.offset_from_utc_datetime(&(naive - Duration::days(1)));
            let after = tz.offset_from_utc_datetime(&(naive + Duration::days(1)));
            let gap = after.fix().local_minus_utc() - before.fix().local_minus_utc();
            tz.from_local_datetime(&(naive + Duration::seconds(i64::from(gap))))
                .earliest()?
        }
    };
    Some(zoned.with_timezone(&Utc))
}

/// Resolve only the start of an event.
///
/// Returns the start plus whether a timed row had to fall back to all-day.
pub fn resolve_time(date: NaiveDate, local_time: Option<&str>, tz: Tz) -> (EventTime, bool) {
    match classify(local_time) {
        TimeClass::AllDay => (EventTime::AllDay(date), false),
        TimeClass::Timed(t) => {
            match parse_time(t).and_then(|time| localize(date.and_time(time), tz)) {
                Some(instant) => (EventTime::Timed(instant), false),
                None => {
                    tracing::warn!(%date, time = t, "unrecognized event time, treating as all-day");
                    (EventTime::AllDay(date), true)
                }
            }
        }
    }
}

/// Display title: `<currency> - <name>`, or just the name without a currency.
pub fn summary(event: &RawEvent) -> String {
    match event.currency.trim() {
        "" => event.name.trim().to_string(),
        currency => format!("{} - {}", currency, event.name.trim()),
    }
}

/// Display details with explicit placeholders for absent values.
pub fn description(event: &RawEvent) -> String {
    let value = |v: &Option<String>| v.as_deref().unwrap_or(MISSING_VALUE).to_string();
    format!(
        "Forecast: {}, Previous: {}, Actual: {}",
        value(&event.forecast),
        value(&event.previous),
        value(&event.actual)
    )
}

/// Turns raw rows into calendar-ready events.
#[derive(Debug, Clone)]
pub struct Resolver {
    source_tz: Tz,
    uid_domain: String,
}

impl Resolver {
    pub fn new(source_tz: Tz, uid_domain: impl Into<String>) -> Self {
        Resolver {
            source_tz,
            uid_domain: uid_domain.into(),
        }
    }

    pub fn resolve(&self, event: &RawEvent) -> ResolvedEvent {
        let (start, degraded) = resolve_time(event.date, event.local_time.as_deref(), self.source_tz);

        ResolvedEvent {
            uid: event_uid(
                event.date,
                event.local_time.as_deref(),
                &event.currency,
                &event.name,
                &self.uid_domain,
            ),
            start,
            summary: summary(event),
            description: description(event),
            degraded,
        }
    }

    pub fn resolve_all(&self, events: &[RawEvent]) -> Vec<ResolvedEvent> {
        events.iter().map(|e| self.resolve(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Chicago;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cpi(local_time: Option<&str>) -> RawEvent {
        RawEvent {
            date: ymd(2024, 3, 10),
            local_time: local_time.map(str::to_string),
            currency: "USD".to_string(),
            name: "CPI m/m".to_string(),
            forecast: Some("0.4%".to_string()),
            previous: Some("0.3%".to_string()),
            actual: None,
            importance: Some("high".to_string()),
        }
    }

    #[test]
    fn test_timed_event_uses_offset_in_force_on_its_date() {
        // Chicago is on CDT (UTC-5) by the afternoon of 2024-03-10
        let resolver = Resolver::new(Chicago, "fin.org");
        let resolved = resolver.resolve(&cpi(Some("14:30")));

        assert_eq!(
            resolved.start,
            EventTime::Timed(Utc.with_ymd_and_hms(2024, 3, 10, 19, 30, 0).unwrap())
        );
        assert!(!resolved.degraded);
    }

    #[test]
    fn test_standard_and_daylight_dates_get_different_offsets() {
        let (winter, _) = resolve_time(ymd(2024, 1, 15), Some("14:30"), Chicago);
        let (summer, _) = resolve_time(ymd(2024, 7, 15), Some("14:30"), Chicago);

        assert_eq!(winter, EventTime::Timed(Utc.with_ymd_and_hms(2024, 1, 15, 20, 30, 0).unwrap()));
        assert_eq!(summer, EventTime::Timed(Utc.with_ymd_and_hms(2024, 7, 15, 19, 30, 0).unwrap()));

        let winter_offset = Chicago.offset_from_utc_date(&ymd(2024, 1, 15)).fix();
        let summer_offset = Chicago.offset_from_utc_date(&ymd(2024, 7, 15)).fix();
        assert_eq!(
            summer_offset.local_minus_utc() - winter_offset.local_minus_utc(),
            3600
        );
    }

    #[test]
    fn test_european_daylight_saving() {
        let paris = chrono_tz::Europe::Paris;
        let (winter, _) = resolve_time(ymd(2024, 2, 1), Some("08:00:00"), paris);
        let (summer, _) = resolve_time(ymd(2024, 6, 1), Some("08:00"), paris);

        assert_eq!(winter, EventTime::Timed(Utc.with_ymd_and_hms(2024, 2, 1, 7, 0, 0).unwrap()));
        assert_eq!(summer, EventTime::Timed(Utc.with_ymd_and_hms(2024, 6, 1, 6, 0, 0).unwrap()));
    }

    #[test]
    fn test_all_day_sentinels_yield_date_only() {
        for time in [None, Some(""), Some("  "), Some("All Day"), Some("all day"), Some("N/A"), Some("Tentative")] {
            let (start, degraded) = resolve_time(ymd(2024, 3, 10), time, Chicago);
            assert_eq!(start, EventTime::AllDay(ymd(2024, 3, 10)), "time {time:?}");
            assert!(!degraded, "time {time:?}");
        }
    }

    #[test]
    fn test_unparsable_time_degrades_to_all_day() {
        let resolved = Resolver::new(Chicago, "fin.org").resolve(&cpi(Some("25:99")));

        assert_eq!(resolved.start, EventTime::AllDay(ymd(2024, 3, 10)));
        assert!(resolved.degraded);
    }

    #[test]
    fn test_spring_forward_gap_shifts_past_transition() {
        // 02:30 does not exist in Chicago on 2024-03-10; read it with the CST offset
        let (start, degraded) = resolve_time(ymd(2024, 3, 10), Some("02:30"), Chicago);
        assert_eq!(start, EventTime::Timed(Utc.with_ymd_and_hms(2024, 3, 10, 8, 30, 0).unwrap()));
        assert!(!degraded);
    }

    #[test]
    fn test_fall_back_overlap_takes_earlier_instant() {
        // 01:30 happens twice in Chicago on 2024-11-03; first time is CDT
        let (start, _) = resolve_time(ymd(2024, 11, 3), Some("01:30"), Chicago);
        assert_eq!(start, EventTime::Timed(Utc.with_ymd_and_hms(2024, 11, 3, 6, 30, 0).unwrap()));
    }

    #[test]
    fn test_summary_and_description() {
        let event = cpi(Some("14:30"));
        assert_eq!(summary(&event), "USD - CPI m/m");
        assert_eq!(description(&event), "Forecast: 0.4%, Previous: 0.3%, Actual: N/A");
    }

    #[test]
    fn test_summary_without_currency() {
        let mut event = cpi(None);
        event.currency = String::new();
        event.name = "Bank Holiday".to_string();
        assert_eq!(summary(&event), "Bank Holiday");
    }

    #[test]
    fn test_description_with_all_values_absent() {
        let mut event = cpi(None);
        event.forecast = None;
        event.previous = None;

        let text = description(&event);

        assert_eq!(text, "Forecast: N/A, Previous: N/A, Actual: N/A");
        assert!(!text.contains("None") && !text.contains("null") && !text.contains("nan"));
    }

    #[test]
    fn test_all_day_variant_of_same_row_resolves_to_date() {
        let resolved = Resolver::new(Chicago, "fin.org").resolve(&cpi(Some("all day")));
        assert_eq!(resolved.start, EventTime::AllDay(ymd(2024, 3, 10)));
    }
}
