//! Minimum-duration filtering of free blocks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::window::FreeBlock;

/// A day with at least one free block long enough for the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifyingDay {
    pub date: NaiveDate,
    /// Ordered by start. Every block meets the minimum duration.
    pub blocks: Vec<FreeBlock>,
}

impl QualifyingDay {
    /// Total qualifying free time, used as the ranking tie-breaker.
    pub fn total_free_minutes(&self) -> i64 {
        self.blocks.iter().map(|b| b.duration_minutes()).sum()
    }
}

/// Keep the blocks that can hold `min_duration_minutes` of contiguous time.
///
/// A block of exactly the minimum qualifies. Surviving blocks stay
/// separate so the caller can still pick the earliest start. Returns
/// `None` when nothing survives; the day then breaks any run.
pub fn qualify_day(
    date: NaiveDate,
    blocks: Vec<FreeBlock>,
    min_duration_minutes: u32,
) -> Option<QualifyingDay> {
    let blocks: Vec<FreeBlock> = blocks
        .into_iter()
        .filter(|b| b.duration_minutes() >= i64::from(min_duration_minutes))
        .collect();
    if blocks.is_empty() {
        None
    } else {
        Some(QualifyingDay { date, blocks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, hour, min, 0).unwrap()
    }

    fn block(sh: u32, sm: u32, eh: u32, em: u32) -> FreeBlock {
        FreeBlock { date: date(), start: at(sh, sm), end: at(eh, em) }
    }

    #[test]
    fn test_exact_minimum_qualifies() {
        let day = qualify_day(date(), vec![block(9, 0, 12, 0)], 180);
        assert!(day.is_some());
    }

    #[test]
    fn test_one_minute_short_does_not_qualify() {
        let day = qualify_day(date(), vec![block(9, 0, 11, 59)], 180);
        assert!(day.is_none());
    }

    #[test]
    fn test_multiple_surviving_blocks_kept_separate() {
        let day = qualify_day(
            date(),
            vec![block(10, 0, 13, 0), block(14, 0, 17, 0)],
            180,
        )
        .unwrap();
        assert_eq!(day.blocks.len(), 2);
        assert_eq!(day.total_free_minutes(), 360);
    }

    #[test]
    fn test_short_blocks_filtered_out() {
        let day = qualify_day(
            date(),
            vec![block(9, 0, 9, 30), block(10, 0, 14, 0)],
            120,
        )
        .unwrap();
        assert_eq!(day.blocks.len(), 1);
        assert_eq!(day.blocks[0].start, at(10, 0));
    }

    #[test]
    fn test_no_blocks_yields_none() {
        assert!(qualify_day(date(), vec![], 60).is_none());
    }
}
