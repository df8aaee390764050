//! Event sources: where raw announcement rows come from.
//!
//! The upstream provider is a black box. It is either an external
//! executable (`fincal-source-<name>`) speaking the JSON protocol from
//! [`crate::protocol`], or a JSON file on disk.

use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use crate::date_window::DateWindow;
use crate::error::{FincalError, FincalResult};
use crate::protocol::{Command as ProviderCommand, Request, Response};
use crate::raw_event::RawEvent;

const DATE_PARAM_FORMAT: &str = "%Y-%m-%d";

/// Anything that can list raw events for a date window.
pub trait EventSource {
    fn fetch(&self, window: &DateWindow) -> impl Future<Output = FincalResult<Vec<RawEvent>>> + Send;
}

/// A provider executable found on PATH (or at an explicit path).
#[derive(Debug, Clone)]
pub struct ProviderSource {
    name: String,
    binary: Option<PathBuf>,
    params: BTreeMap<String, String>,
    timeout: Duration,
}

impl ProviderSource {
    pub fn from_name(name: &str) -> Self {
        ProviderSource {
            name: name.to_string(),
            binary: None,
            params: BTreeMap::new(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Use this executable instead of looking up `fincal-source-<name>`.
    pub fn with_binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary = Some(path.into());
        self
    }

    /// Extra provider-specific parameters sent with every request.
    pub fn with_params(mut self, params: BTreeMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn binary_path(&self) -> FincalResult<PathBuf> {
        if let Some(ref path) = self.binary {
            return Ok(path.clone());
        }
        let binary_name = format!("fincal-source-{}", self.name);
        which::which(&binary_name).map_err(|_| FincalError::ProviderNotInstalled(binary_name))
    }

    fn request(&self, window: &DateWindow) -> Request {
        let mut params = serde_json::Map::new();
        for (key, value) in &self.params {
            params.insert(key.clone(), serde_json::Value::String(value.clone()));
        }
        params.insert(
            "from".into(),
            window.start.format(DATE_PARAM_FORMAT).to_string().into(),
        );
        params.insert(
            "to".into(),
            window.end.format(DATE_PARAM_FORMAT).to_string().into(),
        );

        Request {
            command: ProviderCommand::ListEvents,
            params: serde_json::Value::Object(params),
        }
    }

    async fn call(&self, request: Request) -> FincalResult<Vec<RawEvent>> {
        let request_json = serde_json::to_string(&request)
            .map_err(|e| FincalError::Serialization(e.to_string()))?;

        let binary_path = self.binary_path()?;
        tracing::debug!(binary = %binary_path.display(), "calling source provider");

        let mut child = Command::new(&binary_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                FincalError::Source(format!("Failed to spawn {}: {}", binary_path.display(), e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| FincalError::Source("Provider stdin was not captured".into()))?;
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await?;
        drop(stdin);

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(FincalError::Source(format!(
                "Provider exited with status: {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        let response_str = String::from_utf8_lossy(&output.stdout);
        if response_str.trim().is_empty() {
            return Err(FincalError::Source("Provider returned no response".into()));
        }

        let response: Response<Vec<RawEvent>> = serde_json::from_str(&response_str)
            .map_err(|e| FincalError::Source(format!("Failed to parse response: {}", e)))?;

        match response {
            Response::Success { data } => Ok(data),
            Response::Error { error } => Err(FincalError::Source(error)),
        }
    }
}

impl EventSource for ProviderSource {
    async fn fetch(&self, window: &DateWindow) -> FincalResult<Vec<RawEvent>> {
        let request = self.request(window);
        timeout(self.timeout, self.call(request))
            .await
            .map_err(|_| FincalError::ProviderTimeout(self.timeout.as_secs()))?
    }
}

/// A JSON array of raw events stored on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSource for JsonFileSource {
    async fn fetch(&self, window: &DateWindow) -> FincalResult<Vec<RawEvent>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            FincalError::Source(format!("Could not read {}: {}", self.path.display(), e))
        })?;

        let events: Vec<RawEvent> = serde_json::from_str(&content).map_err(|e| {
            FincalError::Source(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        Ok(events
            .into_iter()
            .filter(|e| window.contains(e.date))
            .collect())
    }
}

/// The source picked by configuration or command-line flags.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    Provider(ProviderSource),
    File(JsonFileSource),
}

impl ConfiguredSource {
    pub fn describe(&self) -> String {
        match self {
            ConfiguredSource::Provider(p) => format!("provider '{}'", p.name()),
            ConfiguredSource::File(f) => f.path().display().to_string(),
        }
    }
}

impl EventSource for ConfiguredSource {
    async fn fetch(&self, window: &DateWindow) -> FincalResult<Vec<RawEvent>> {
        match self {
            ConfiguredSource::Provider(p) => p.fetch(window).await,
            ConfiguredSource::File(f) => f.fetch(window).await,
        }
    }
}
