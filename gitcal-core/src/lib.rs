//! Core of gitcal: export GitLab issues and milestones with due dates as
//! iCalendar files.
//!
//! The pipeline is fetch → filter → convert → deduplicate → serialize:
//! - `gitlab` talks to the GitLab REST API
//! - `collect` lists records for a project or group and turns them into events
//! - `event` holds the event types and the pure record-to-event conversion
//! - `merge` combines event sets across sources
//! - `ics` and `writer` put calendars on disk
//! - `config` and `export` resolve settings and drive a whole run

pub mod collect;
pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod gitlab;
pub mod ics;
pub mod ids;
pub mod merge;
pub mod writer;

pub use event::{CalendarEvent, Category, NamedEvents, Origin, Record, Reminder};
