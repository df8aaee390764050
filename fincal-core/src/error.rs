//! Error types for the fincal pipeline.

use thiserror::Error;

/// Errors that can end a pipeline run.
///
/// Per-event anomalies never show up here: a row with a malformed time is
/// repaired in place by the time resolver.
#[derive(Error, Debug)]
pub enum FincalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event source error: {0}")]
    Source(String),

    #[error("Source provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("Source provider timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("Could not write calendar: {0}")]
    Sink(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FincalError {
    /// True for failures that happened while fetching upstream events.
    pub fn is_source(&self) -> bool {
        matches!(
            self,
            FincalError::Source(_)
                | FincalError::ProviderNotInstalled(_)
                | FincalError::ProviderTimeout(_)
        )
    }

    /// True for failures that happened while persisting the document.
    pub fn is_sink(&self) -> bool {
        matches!(self, FincalError::Sink(_))
    }
}

/// Result type alias for fincal operations.
pub type FincalResult<T> = Result<T, FincalError>;
