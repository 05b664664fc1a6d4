//! # Openslot Core Library
//!
//! Availability resolution engine for a calendar agent: given a user's
//! busy-time data and a structured scheduling request ("find 3 consecutive
//! days with a free 4-hour block between 9am and 5pm"), compute and rank
//! the qualifying multi-day candidate windows.
//!
//! ## Architecture
//!
//! Data flows strictly forward through a pure pipeline:
//!
//! - **Normalizer** ([`interval`]): raw busy records become sorted, merged,
//!   per-day interval sets; malformed records are dropped per record
//! - **Daily window filter** ([`window`]): the requested `[open, close)`
//!   window minus busy time yields free blocks
//! - **Duration matcher** ([`qualify`]): blocks shorter than the minimum
//!   are discarded; a day qualifies when at least one survives
//! - **Consecutive-day matcher** ([`runs`]): a sliding scan finds every
//!   run of the required length, with configurable weekend handling
//! - **Ranker** ([`rank`]): earliest start wins, ties broken by total free
//!   time, truncated to the caller's limit
//!
//! The engine performs no I/O and holds no shared state; concurrent
//! queries need no locking. Fetching busy data from the external calendar
//! provider is the caller's job, supported by the bounded fan-out in
//! [`provider`].
//!
//! ## Key Components
//!
//! - [`AvailabilityQuery`]: immutable per-call request and policies
//! - [`resolve`]: the pipeline entry point
//! - [`BusyCalendar`]: per-day busy input, distinguishing unknown days
//! - [`provider::BusyIntervalProvider`]: paginated calendar data boundary

pub mod config;
pub mod engine;
pub mod error;
pub mod interval;
pub mod provider;
pub mod qualify;
pub mod query;
pub mod rank;
pub mod runs;
pub mod window;

pub use config::Config;
pub use engine::{resolve, AvailabilityResult, BusyCalendar, CandidateWindow};
pub use error::{ConfigError, MalformedInterval, ProviderError, QueryError};
pub use interval::{normalize, BusyInterval, NormalizedDay};
pub use provider::fetch::{fetch_busy_calendar, FetchPolicy};
pub use qualify::QualifyingDay;
pub use query::{AvailabilityQuery, DisallowedDayPolicy, UnknownDayPolicy, WeekdaySet};
pub use runs::{DayRun, ScanDay};
pub use window::{DayWindow, FreeBlock};
