//! Where finished calendar documents go.

use std::path::{Path, PathBuf};

use crate::error::{FincalError, FincalResult};

/// Durable storage for a generated document.
pub trait EventSink {
    fn write(&self, document: &str) -> FincalResult<()>;

    /// Human-readable destination, used in run reports.
    fn location(&self) -> String;
}

/// Writes the document to a single .ics file, replacing any previous one.
#[derive(Debug, Clone)]
pub struct IcsFileSink {
    path: PathBuf,
}

impl IcsFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        IcsFileSink { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for IcsFileSink {
    fn write(&self, document: &str) -> FincalResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                FincalError::Sink(format!("Could not create {}: {e}", parent.display()))
            })?;
        }

        std::fs::write(&self.path, document)
            .map_err(|e| FincalError::Sink(format!("Could not write {}: {e}", self.path.display())))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output").join("financial_calendar.ics");
        let sink = IcsFileSink::new(&path);

        sink.write("BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n").unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n"
        );
        assert_eq!(sink.location(), path.display().to_string());
    }

    #[test]
    fn test_unwritable_target_is_sink_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be overwritten by a file
        let err = IcsFileSink::new(dir.path()).write("x").unwrap_err();

        assert!(err.is_sink(), "got {err:?}");
        assert!(!err.is_source());
    }
}
