mod commands;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fincal_core::fincal_config::FincalConfig;
use fincal_core::source::{ConfiguredSource, JsonFileSource, ProviderSource};
use owo_colors::OwoColorize;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fincal")]
#[command(about = "Mirror high-impact economic announcements into an .ics calendar")]
struct Cli {
    /// Log debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Config file to use instead of ~/.config/fincal/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch upcoming events and write the calendar file
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        /// Where to write the .ics file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave the existing file alone when no events match
        #[arg(long)]
        skip_empty: bool,
    },
    /// Show the events that would be exported, without writing anything
    Preview {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show,
}

#[derive(Args)]
struct SourceArgs {
    /// Days ahead to export
    #[arg(short, long)]
    days: Option<u32>,

    /// Importance tier to keep (low, medium, high)
    #[arg(short, long)]
    importance: Option<String>,

    /// IANA timezone of the provider's local times (e.g. "America/New_York")
    #[arg(short, long)]
    timezone: Option<String>,

    /// Source provider name (runs fincal-source-<name>)
    #[arg(short, long, conflicts_with = "input")]
    provider: Option<String>,

    /// Read raw events from a JSON file instead of a provider
    #[arg(long, conflicts_with = "provider")]
    input: Option<PathBuf>,
}

impl SourceArgs {
    fn apply(&self, config: &mut FincalConfig) {
        if let Some(days) = self.days {
            config.days_ahead = days;
        }
        if let Some(ref importance) = self.importance {
            config.importance = importance.clone();
        }
        if let Some(ref timezone) = self.timezone {
            config.source_timezone = timezone.clone();
        }
        if let Some(ref provider) = self.provider {
            config.provider = Some(provider.clone());
        }
    }

    fn source(&self, config: &FincalConfig) -> Result<ConfiguredSource> {
        if let Some(ref input) = self.input {
            return Ok(ConfiguredSource::File(JsonFileSource::new(input)));
        }

        match config.provider {
            Some(ref name) => Ok(ConfiguredSource::Provider(
                ProviderSource::from_name(name)
                    .with_params(config.provider_params.clone())
                    .with_timeout(config.provider_timeout()),
            )),
            None => anyhow::bail!(
                "No event source configured.\n\n\
                Set a provider in your config:\n  \
                provider = \"<name>\"\n\n\
                or read events from a file:\n  \
                fincal generate --input events.json"
            ),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate {
            source,
            output,
            skip_empty,
        } => {
            source.apply(&mut config);
            if let Some(output) = output {
                config.output = output;
            }
            config.skip_empty |= skip_empty;
            let event_source = source.source(&config)?;
            commands::generate::run(&config, &event_source).await
        }
        Commands::Preview { source } => {
            source.apply(&mut config);
            let event_source = source.source(&config)?;
            commands::preview::run(&config, &event_source).await
        }
        Commands::Config { action } => match action {
            ConfigAction::Path => commands::config::path(cli.config.as_deref()),
            ConfigAction::Show => commands::config::show(&config),
        },
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<FincalConfig> {
    let config = match path {
        Some(path) => FincalConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => FincalConfig::load()?,
    };
    Ok(config)
}
