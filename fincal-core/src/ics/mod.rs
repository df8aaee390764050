//! ICS document generation.
//!
//! This module writes calendar documents according to RFC 5545.

mod generate;

pub use generate::{IcsOptions, PRODID, generate_ics};
