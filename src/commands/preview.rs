use anyhow::{Context, Result};
use chrono::Utc;
use fincal_core::fincal_config::FincalConfig;
use fincal_core::pipeline::{self, PipelineSettings};
use fincal_core::source::ConfiguredSource;
use owo_colors::OwoColorize;

use crate::render::{format_date_label, format_time};

pub async fn run(config: &FincalConfig, source: &ConfiguredSource) -> Result<()> {
    let settings = PipelineSettings::from_config(config)?;

    let prepared = pipeline::prepare(source, &settings, Utc::now())
        .await
        .with_context(|| format!("Could not fetch events from {}", source.describe()))?;

    if prepared.events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    // Group events by day and print
    let mut current_date: Option<String> = None;

    for event in &prepared.events {
        let date_label = format_date_label(&event.start);

        if current_date.as_ref() != Some(&date_label) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", date_label.bold());
            current_date = Some(date_label);
        }

        let time = format_time(&event.start);
        if event.degraded {
            println!("  {} {} {}", time, event.summary, "[time unknown]".yellow());
        } else {
            println!("  {} {} {}", time, event.summary, event.description.dimmed());
        }
    }

    println!(
        "\n{}",
        format!(
            "{} of {} fetched events match importance '{}'",
            prepared.events.len(),
            prepared.fetched,
            settings.importance
        )
        .dimmed()
    );

    Ok(())
}
