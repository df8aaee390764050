use anyhow::{Context, Result};
use chrono::Utc;
use fincal_core::fincal_config::FincalConfig;
use fincal_core::pipeline::{self, PipelineSettings, RunOutcome};
use fincal_core::sink::{EventSink, IcsFileSink};
use fincal_core::source::ConfiguredSource;
use owo_colors::OwoColorize;

pub async fn run(config: &FincalConfig, source: &ConfiguredSource) -> Result<()> {
    let settings = PipelineSettings::from_config(config)?;
    let sink = IcsFileSink::new(config.output_path());

    let report = match pipeline::run(source, &sink, &settings, Utc::now()).await {
        Ok(report) => report,
        Err(e) if e.is_source() => {
            return Err(e).with_context(|| format!("Could not fetch events from {}", source.describe()));
        }
        Err(e) if e.is_sink() => {
            return Err(e).context("Could not save the calendar");
        }
        Err(e) => return Err(e.into()),
    };

    let range = format!("{} to {}", report.window.start, report.window.end);

    match report.outcome {
        RunOutcome::Written { ref location } => {
            println!(
                "{} Wrote {} {} ({}) to {}",
                "✓".green(),
                report.retained,
                if report.retained == 1 { "event" } else { "events" },
                range.dimmed(),
                location
            );
            if report.degraded > 0 {
                println!(
                    "  {}",
                    format!(
                        "{} with an unrecognized time exported as all-day",
                        report.degraded
                    )
                    .yellow()
                );
            }
        }
        RunOutcome::Empty { written: true } => {
            println!(
                "{} ({}); wrote an empty calendar to {}",
                "No events found".yellow(),
                range.dimmed(),
                sink.location()
            );
        }
        RunOutcome::Empty { written: false } => {
            println!(
                "{} ({}); {} left unchanged",
                "No events found".yellow(),
                range.dimmed(),
                sink.location()
            );
        }
    }

    Ok(())
}
