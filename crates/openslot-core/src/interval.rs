//! Busy intervals and their canonical form.
//!
//! Raw busy records arrive from the calendar provider unordered, possibly
//! overlapping, and occasionally malformed. [`normalize`] canonicalizes one
//! day's records into a sorted, non-overlapping, non-adjacent sequence and
//! reports the records it had to drop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MalformedInterval;

/// A half-open busy interval `[start, end)` in the reference timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Enforce the interval contract: `start < end`. Zero-duration and
    /// inverted records are both malformed.
    pub fn validate(&self) -> Result<(), MalformedInterval> {
        if self.start >= self.end {
            return Err(MalformedInterval {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Check overlap against a half-open range.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }
}

/// Result of normalizing one day's raw busy records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedDay {
    /// Sorted by start, non-overlapping, non-adjacent.
    pub intervals: Vec<BusyInterval>,
    /// Records dropped for violating `start < end`. The caller logs these;
    /// the day keeps the rest of its data.
    pub rejected: Vec<MalformedInterval>,
}

impl NormalizedDay {
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

/// Canonicalize raw busy records.
///
/// Malformed records are set aside rather than failing the call. Valid
/// records are sorted by start; an interval that touches or overlaps the
/// running one is merged into it, otherwise it starts a new interval.
/// Normalizing already-normalized input is a no-op.
pub fn normalize(raw: &[BusyInterval]) -> NormalizedDay {
    let mut rejected = Vec::new();
    let mut valid: Vec<BusyInterval> = Vec::with_capacity(raw.len());
    for interval in raw {
        match interval.validate() {
            Ok(()) => valid.push(*interval),
            Err(err) => rejected.push(err),
        }
    }

    valid.sort_by_key(|iv| (iv.start, iv.end));

    let mut merged: Vec<BusyInterval> = Vec::with_capacity(valid.len());
    for interval in valid {
        match merged.last_mut() {
            // Touching counts as overlapping: [9,10) + [10,11) -> [9,11).
            Some(current) if interval.start <= current.end => {
                if interval.end > current.end {
                    current.end = interval.end;
                }
            }
            _ => merged.push(interval),
        }
    }

    NormalizedDay {
        intervals: merged,
        rejected,
    }
}
