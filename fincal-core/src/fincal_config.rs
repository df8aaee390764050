//! fincal configuration.
//!
//! Values come from `~/.config/fincal/config.toml`, then `FINCAL_*`
//! environment variables. Command-line flags override both.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{FincalError, FincalResult};

static DEFAULT_OUTPUT_PATH: &str = "~/calendar/financial_calendar.ics";
static DEFAULT_SOURCE_TIMEZONE: &str = "Europe/Paris";

fn default_days_ahead() -> u32 {
    7
}

fn default_importance() -> String {
    "high".to_string()
}

fn default_source_timezone() -> String {
    DEFAULT_SOURCE_TIMEZONE.to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_provider_timeout_secs() -> u64 {
    30
}

fn default_event_duration_minutes() -> u32 {
    30
}

fn default_uid_domain() -> String {
    "fin.org".to_string()
}

fn default_calendar_name() -> Option<String> {
    Some("Financial Calendar".to_string())
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FincalConfig {
    /// Horizon of the export, in whole days after today
    #[serde(default = "default_days_ahead")]
    pub days_ahead: u32,

    /// Importance tier to keep (low, medium, high)
    #[serde(default = "default_importance")]
    pub importance: String,

    /// IANA zone the provider's wall-clock times are expressed in
    #[serde(default = "default_source_timezone")]
    pub source_timezone: String,

    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Provider name; resolved to a `fincal-source-<name>` executable
    #[serde(default)]
    pub provider: Option<String>,

    /// Passed through to the provider with every request
    #[serde(default)]
    pub provider_params: BTreeMap<String, String>,

    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,

    #[serde(default = "default_event_duration_minutes")]
    pub event_duration_minutes: u32,

    #[serde(default = "default_uid_domain")]
    pub uid_domain: String,

    #[serde(default = "default_calendar_name")]
    pub calendar_name: Option<String>,

    /// Leave the previous file alone when nothing matched
    #[serde(default)]
    pub skip_empty: bool,
}

impl Default for FincalConfig {
    fn default() -> Self {
        FincalConfig {
            days_ahead: default_days_ahead(),
            importance: default_importance(),
            source_timezone: default_source_timezone(),
            output: default_output(),
            provider: None,
            provider_params: BTreeMap::new(),
            provider_timeout_secs: default_provider_timeout_secs(),
            event_duration_minutes: default_event_duration_minutes(),
            uid_domain: default_uid_domain(),
            calendar_name: default_calendar_name(),
            skip_empty: false,
        }
    }
}

impl FincalConfig {
    pub fn config_path() -> FincalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| FincalError::Config("Could not determine config directory".into()))?
            .join("fincal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, creating a commented-out file first.
    pub fn load() -> FincalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> FincalResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("FINCAL").try_parsing(true))
            .build()
            .map_err(|e| FincalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| FincalError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> FincalResult<()> {
        let contents = format!(
            "\
# fincal configuration

# Days ahead to export:
# days_ahead = 7

# Importance tier to keep (low, medium, high):
# importance = \"high\"

# Timezone of the provider's local times (IANA name):
# source_timezone = \"{DEFAULT_SOURCE_TIMEZONE}\"

# Where the calendar file is written:
# output = \"{DEFAULT_OUTPUT_PATH}\"

# Source provider (runs fincal-source-<provider> from PATH):
# provider = \"investing\"
# provider_timeout_secs = 30

# [provider_params]
# countries = \"united states,euro zone\"

# Length of timed entries, in minutes:
# event_duration_minutes = 30

# Domain suffix of event UIDs:
# uid_domain = \"fin.org\"

# Calendar name shown by clients:
# calendar_name = \"Financial Calendar\"

# Don't replace the calendar file when no events match:
# skip_empty = false
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                FincalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| FincalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> FincalResult<String> {
        toml::to_string_pretty(self).map_err(|e| FincalError::Serialization(e.to_string()))
    }

    pub fn source_tz(&self) -> FincalResult<Tz> {
        parse_timezone(&self.source_timezone)
    }

    /// Output path with `~` expanded.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.output.to_string_lossy()).into_owned())
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }
}

pub fn parse_timezone(name: &str) -> FincalResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| FincalError::Config(format!("Unknown timezone '{name}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FincalConfig::load_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.days_ahead, 7);
        assert_eq!(config.importance, "high");
        assert_eq!(config.source_tz().unwrap(), chrono_tz::Europe::Paris);
        assert_eq!(config.uid_domain, "fin.org");
        assert!(!config.skip_empty);
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
days_ahead = 14
source_timezone = "America/Chicago"
output = "/tmp/out.ics"
provider = "investing"

[provider_params]
countries = "united states"
"#,
        )
        .unwrap();

        let config = FincalConfig::load_from(&path).unwrap();

        assert_eq!(config.days_ahead, 14);
        assert_eq!(config.source_tz().unwrap(), chrono_tz::America::Chicago);
        assert_eq!(config.output_path(), PathBuf::from("/tmp/out.ics"));
        assert_eq!(config.provider.as_deref(), Some("investing"));
        assert_eq!(config.provider_params["countries"], "united states");
    }

    #[test]
    fn test_generated_default_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        FincalConfig::create_default_config(&path).unwrap();
        let config = FincalConfig::load_from(&path).unwrap();

        assert_eq!(config.days_ahead, 7);
    }

    #[test]
    fn test_to_toml_round_trips_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = FincalConfig::default();
        config.importance = "medium".to_string();
        config.provider_params.insert("countries".into(), "japan".into());

        std::fs::write(&path, config.to_toml().unwrap()).unwrap();
        let loaded = FincalConfig::load_from(&path).unwrap();

        assert_eq!(loaded.importance, "medium");
        assert_eq!(loaded.provider_params["countries"], "japan");
    }

    #[test]
    fn test_default_file_documents_every_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        FincalConfig::create_default_config(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();

        let defaults: toml::Table = toml::from_str(&FincalConfig::default().to_toml().unwrap()).unwrap();
        for key in defaults.keys() {
            assert!(
                contents.contains(&format!("# {key}")) || contents.contains(&format!("# [{key}]")),
                "default config is missing '{key}'"
            );
        }
        for key in ["provider", "uid_domain", "calendar_name"] {
            assert!(contents.contains(&format!("# {key} = ")), "missing '{key}'");
        }
    }

    #[test]
    fn test_unknown_timezone_is_config_error() {
        let err = parse_timezone("Mars/Olympus_Mons").unwrap_err();
        assert!(matches!(err, FincalError::Config(_)), "got {err:?}");
    }

    #[test]
    fn test_output_tilde_is_expanded() {
        let config = FincalConfig::default();
        assert!(!config.output_path().to_string_lossy().starts_with('~'));
    }
}
