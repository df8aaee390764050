//! One end-to-end export run.
//!
//! fetch -> filter -> resolve -> encode -> write, strictly in that order.
//! Only the source and the sink can fail a run; per-event problems are
//! repaired by the resolver.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::date_window::DateWindow;
use crate::error::FincalResult;
use crate::event::ResolvedEvent;
use crate::fincal_config::FincalConfig;
use crate::ics::{IcsOptions, generate_ics};
use crate::importance::ImportanceFilter;
use crate::resolve::Resolver;
use crate::sink::EventSink;
use crate::source::EventSource;

/// Fixed per-deployment knobs for a run.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub days_ahead: u32,
    pub importance: String,
    pub source_tz: Tz,
    pub uid_domain: String,
    pub calendar_name: Option<String>,
    pub event_duration: Duration,
    pub skip_empty: bool,
}

impl PipelineSettings {
    pub fn from_config(config: &FincalConfig) -> FincalResult<Self> {
        Ok(PipelineSettings {
            days_ahead: config.days_ahead,
            importance: config.importance.clone(),
            source_tz: config.source_tz()?,
            uid_domain: config.uid_domain.clone(),
            calendar_name: config.calendar_name.clone(),
            event_duration: Duration::minutes(i64::from(config.event_duration_minutes)),
            skip_empty: config.skip_empty,
        })
    }
}

/// Events ready to encode, plus what it took to get them.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub window: DateWindow,
    pub fetched: usize,
    pub events: Vec<ResolvedEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A document with at least one event was written.
    Written { location: String },
    /// Nothing matched; `written` tells whether an empty calendar was saved.
    Empty { written: bool },
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub window: DateWindow,
    pub fetched: usize,
    pub retained: usize,
    pub timed: usize,
    pub all_day: usize,
    pub degraded: usize,
    pub outcome: RunOutcome,
}

/// Fetch, filter and resolve without encoding or writing anything.
pub async fn prepare<S: EventSource>(
    source: &S,
    settings: &PipelineSettings,
    now: DateTime<Utc>,
) -> FincalResult<Prepared> {
    let window = DateWindow::ahead(now, settings.source_tz, settings.days_ahead);
    tracing::debug!(start = %window.start, end = %window.end, "fetching events");

    let raw = source.fetch(&window).await?;
    let fetched = raw.len();

    let retained = ImportanceFilter::new(&settings.importance).apply(raw);
    tracing::debug!(fetched, retained = retained.len(), importance = %settings.importance, "filtered events");

    let resolver = Resolver::new(settings.source_tz, settings.uid_domain.clone());
    let events = resolver.resolve_all(&retained);

    Ok(Prepared {
        window,
        fetched,
        events,
    })
}

/// Run the whole export. `now` anchors both the window and DTSTAMP.
pub async fn run<S: EventSource, K: EventSink>(
    source: &S,
    sink: &K,
    settings: &PipelineSettings,
    now: DateTime<Utc>,
) -> FincalResult<RunReport> {
    let Prepared {
        window,
        fetched,
        events,
    } = prepare(source, settings, now).await?;

    let all_day = events.iter().filter(|e| e.start.is_all_day()).count();
    let degraded = events.iter().filter(|e| e.degraded).count();

    let outcome = if events.is_empty() && settings.skip_empty {
        tracing::info!("no events matched, leaving {} untouched", sink.location());
        RunOutcome::Empty { written: false }
    } else {
        let options = IcsOptions {
            calendar_name: settings.calendar_name.clone(),
            event_duration: settings.event_duration,
            generated_at: now,
        };
        let document = generate_ics(&events, &options)?;
        sink.write(&document)?;

        if events.is_empty() {
            RunOutcome::Empty { written: true }
        } else {
            RunOutcome::Written {
                location: sink.location(),
            }
        }
    };

    let report = RunReport {
        window,
        fetched,
        retained: events.len(),
        timed: events.len() - all_day,
        all_day,
        degraded,
        outcome,
    };
    tracing::info!(
        fetched = report.fetched,
        retained = report.retained,
        degraded = report.degraded,
        "run finished"
    );

    Ok(report)
}
