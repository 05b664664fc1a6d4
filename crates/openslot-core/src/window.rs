//! Daily availability window and free-block computation.
//!
//! A [`DayWindow`] is one search day's `[open, close)` slice. Subtracting a
//! day's merged busy intervals from it yields the [`FreeBlock`]s the rest
//! of the pipeline works with.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::BusyInterval;

/// The requested daily availability window applied to one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub date: NaiveDate,
    pub open: NaiveTime,
    pub close: NaiveTime,
}

/// A free sub-interval of one day's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeBlock {
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FreeBlock {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

impl DayWindow {
    pub fn new(date: NaiveDate, open: NaiveTime, close: NaiveTime) -> Self {
        Self { date, open, close }
    }

    fn open_at(&self) -> DateTime<Utc> {
        self.date.and_time(self.open).and_utc()
    }

    fn close_at(&self) -> DateTime<Utc> {
        self.date.and_time(self.close).and_utc()
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.close_at() - self.open_at()).num_minutes()
    }

    /// Compute `[open, close)` minus the union of busy intervals.
    ///
    /// Expects normalized input (sorted, merged). Busy time entirely
    /// outside the window is ignored; busy time straddling a boundary is
    /// clipped to it. No busy input means the whole window is one block.
    pub fn free_blocks(&self, busy: &[BusyInterval]) -> Vec<FreeBlock> {
        let open = self.open_at();
        let close = self.close_at();
        let mut blocks = Vec::new();
        let mut cursor = open;

        for interval in busy {
            if interval.end <= cursor {
                continue;
            }
            if interval.start >= close {
                break;
            }
            if interval.start > cursor {
                blocks.push(FreeBlock {
                    date: self.date,
                    start: cursor,
                    end: interval.start,
                });
            }
            cursor = cursor.max(interval.end);
            if cursor >= close {
                return blocks;
            }
        }

        if cursor < close {
            blocks.push(FreeBlock {
                date: self.date,
                start: cursor,
                end: close,
            });
        }
        blocks
    }
}
