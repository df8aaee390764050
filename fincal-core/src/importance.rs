//! Importance tiers and the threshold filter.

use std::fmt;
use std::str::FromStr;

use crate::raw_event::RawEvent;

/// How market-moving an announcement is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Low => "low",
            Importance::Medium => "medium",
            Importance::High => "high",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Importance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Importance::Low),
            "medium" => Ok(Importance::Medium),
            "high" => Ok(Importance::High),
            other => Err(format!("Unknown importance tier '{other}'")),
        }
    }
}

/// Keeps only the events whose tier equals the configured threshold.
///
/// An unrecognized threshold matches nothing.
#[derive(Debug, Clone, Copy)]
pub struct ImportanceFilter {
    threshold: Option<Importance>,
}

impl ImportanceFilter {
    pub fn new(threshold: &str) -> Self {
        let threshold = threshold.parse().ok();
        if threshold.is_none() {
            tracing::warn!("importance threshold is not a known tier; no events will match");
        }
        ImportanceFilter { threshold }
    }

    pub fn threshold(&self) -> Option<Importance> {
        self.threshold
    }

    pub fn matches(&self, event: &RawEvent) -> bool {
        match self.threshold {
            Some(threshold) => event
                .importance
                .as_deref()
                .and_then(|tier| tier.parse::<Importance>().ok())
                == Some(threshold),
            None => false,
        }
    }

    /// Filter preserving input order.
    pub fn apply(&self, events: Vec<RawEvent>) -> Vec<RawEvent> {
        events.into_iter().filter(|e| self.matches(e)).collect()
    }
}
