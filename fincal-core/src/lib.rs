//! Core of fincal: turns a feed of economic announcements into an .ics calendar.
//!
//! The pipeline is linear:
//! - [`date_window`] picks the dates to export
//! - a [`source::EventSource`] lists raw rows for them
//! - [`importance`] keeps the configured tier
//! - [`resolve`] maps wall-clock times to UTC instants or all-day dates
//! - [`uid`] derives stable identifiers
//! - [`ics`] encodes the calendar document
//! - a [`sink::EventSink`] stores it

pub mod date_window;
pub mod error;
pub mod event;
pub mod fincal_config;
pub mod ics;
pub mod importance;
pub mod pipeline;
pub mod protocol;
pub mod raw_event;
pub mod resolve;
pub mod sink;
pub mod source;
pub mod uid;

pub use error::{FincalError, FincalResult};
pub use event::{EventTime, ResolvedEvent};
pub use raw_event::RawEvent;
