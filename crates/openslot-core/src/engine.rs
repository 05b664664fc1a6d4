//! The availability resolution pipeline.
//!
//! `resolve` is a pure function over an immutable query and busy-data
//! snapshot: normalize each day's records, subtract them from the daily
//! window, keep blocks long enough, find consecutive-day runs, rank. No
//! I/O, no shared state; concurrent calls need no locking.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::QueryError;
use crate::interval::{normalize, BusyInterval};
use crate::qualify::{qualify_day, QualifyingDay};
use crate::query::{AvailabilityQuery, UnknownDayPolicy};
use crate::rank::rank;
use crate::runs::{find_runs, DayRun, ScanDay};
use crate::window::FreeBlock;

/// Busy data keyed by calendar day, as handed over by the fetch layer.
///
/// A date absent from the map means the provider returned no data for it,
/// which is distinct from a day that is present with no intervals (known
/// free). The unknown-day policy on the query discriminates the two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusyCalendar {
    days: BTreeMap<NaiveDate, Vec<BusyInterval>>,
}

impl BusyCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one day's busy intervals, replacing any prior entry.
    pub fn insert_day(&mut self, date: NaiveDate, intervals: Vec<BusyInterval>) {
        self.days.insert(date, intervals);
    }

    /// Mark a day as fetched even if nothing was busy on it.
    pub fn mark_known(&mut self, date: NaiveDate) {
        self.days.entry(date).or_default();
    }

    /// Busy intervals for a day, or `None` when the day was never fetched.
    pub fn day(&self, date: NaiveDate) -> Option<&[BusyInterval]> {
        self.days.get(&date).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Bucket timestamped intervals into days over a fetched range.
    ///
    /// Every date in `[range_start, range_end]` becomes known. Intervals
    /// crossing midnight are split at the day boundary; segments outside
    /// the range are discarded. Malformed records are kept in their start
    /// day's bucket so the normalizer can reject and report them.
    pub fn from_intervals(
        range_start: NaiveDate,
        range_end: NaiveDate,
        intervals: &[BusyInterval],
    ) -> Self {
        let mut calendar = Self::new();
        let mut date = range_start;
        while date <= range_end {
            calendar.mark_known(date);
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }

        for interval in intervals {
            if interval.validate().is_err() {
                let day = interval.start.date_naive();
                if let Some(bucket) = calendar.days.get_mut(&day) {
                    bucket.push(*interval);
                }
                continue;
            }
            let mut cursor = interval.start;
            while cursor < interval.end {
                let day = cursor.date_naive();
                let segment_end = match next_midnight(day) {
                    Some(midnight) => interval.end.min(midnight),
                    None => interval.end,
                };
                if let Some(bucket) = calendar.days.get_mut(&day) {
                    bucket.push(BusyInterval::new(cursor, segment_end));
                }
                cursor = segment_end;
            }
        }

        calendar
    }
}

fn next_midnight(day: NaiveDate) -> Option<DateTime<Utc>> {
    Some(day.succ_opt()?.and_time(NaiveTime::MIN).and_utc())
}

/// Ranked availability candidates for one query.
///
/// Request-scoped: built per call, handed straight back to the caller,
/// never stored. An empty `runs` list means no availability was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResult {
    pub runs: Vec<DayRun>,
}

impl AvailabilityResult {
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Flatten into the external response contract.
    pub fn to_response(&self) -> Vec<CandidateWindow> {
        self.runs.iter().map(CandidateWindow::from).collect()
    }
}

/// Wire shape of one candidate in the response contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub daily_blocks: Vec<FreeBlock>,
}

impl From<&DayRun> for CandidateWindow {
    fn from(run: &DayRun) -> Self {
        Self {
            start_date: run.start_date,
            end_date: run.end_date,
            daily_blocks: run
                .days
                .iter()
                .flat_map(|d| d.blocks.iter().copied())
                .collect(),
        }
    }
}

/// Resolve a scheduling query against per-day busy data.
///
/// Rejects structurally invalid queries up front. Malformed busy records
/// are dropped per record with a warning, never failing the whole query.
/// The result is deterministic for a given query and calendar.
pub fn resolve(
    query: &AvailabilityQuery,
    busy: &BusyCalendar,
) -> Result<AvailabilityResult, QueryError> {
    query.validate()?;

    let mut scan = Vec::new();
    for date in query.days() {
        let qualifying = qualify_date(query, busy, date);
        scan.push(ScanDay { date, qualifying });
    }

    let runs = find_runs(&scan, query);
    let runs = rank(runs, query.result_limit);
    Ok(AvailabilityResult { runs })
}

fn qualify_date(
    query: &AvailabilityQuery,
    busy: &BusyCalendar,
    date: NaiveDate,
) -> Option<QualifyingDay> {
    let window = query.window_for(date);
    match busy.day(date) {
        None => match query.unknown_day_policy {
            UnknownDayPolicy::Busy => None,
            UnknownDayPolicy::Free => {
                qualify_day(date, window.free_blocks(&[]), query.min_duration_minutes)
            }
        },
        Some(raw) => {
            let normalized = normalize(raw);
            for err in &normalized.rejected {
                warn!(date = %date, error = %err, "dropping malformed busy record");
            }
            let free = window.free_blocks(&normalized.intervals);
            qualify_day(date, free, query.min_duration_minutes)
        }
    }
}
