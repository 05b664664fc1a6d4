//! Consecutive-day run detection.
//!
//! Scans the ordered search days with a sliding window: a run opens on the
//! first qualifying allowed day, accumulates, and is emitted the moment it
//! reaches the required length; the window then slides forward one day so
//! overlapping runs are also found. Deduplication is the ranker's job.

use std::collections::VecDeque;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::qualify::QualifyingDay;
use crate::query::{AvailabilityQuery, DisallowedDayPolicy};

/// Qualification outcome for one calendar day of the scan.
#[derive(Debug, Clone)]
pub struct ScanDay {
    pub date: NaiveDate,
    /// `None` when no block of the day met the minimum duration.
    pub qualifying: Option<QualifyingDay>,
}

/// A candidate window of consecutive qualifying days.
///
/// `days` always has exactly the required length. Under the bridge policy
/// the calendar span `start_date..=end_date` may be longer than the day
/// count, because skipped disallowed days sit inside it without counting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRun {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<QualifyingDay>,
}

impl DayRun {
    fn from_days(days: Vec<QualifyingDay>) -> Option<Self> {
        let start_date = days.first()?.date;
        let end_date = days.last()?.date;
        Some(Self { start_date, end_date, days })
    }

    /// Total qualifying free time across the run.
    pub fn total_free_minutes(&self) -> i64 {
        self.days.iter().map(|d| d.total_free_minutes()).sum()
    }
}

/// Find every run of exactly `required_consecutive_days` qualifying days.
///
/// Days whose weekday is outside `allowed_weekdays` are handled per the
/// query's [`DisallowedDayPolicy`]: bridged days are invisible to the scan
/// and never counted toward the length; breaking days reset the open run.
/// A non-qualifying allowed day always resets. Overlapping runs are
/// emitted at every valid offset.
pub fn find_runs(days: &[ScanDay], query: &AvailabilityQuery) -> Vec<DayRun> {
    let required = query.required_consecutive_days as usize;
    let mut runs = Vec::new();
    let mut open: VecDeque<QualifyingDay> = VecDeque::new();

    for day in days {
        if !query.allowed_weekdays.contains(day.date.weekday()) {
            match query.disallowed_day_policy {
                DisallowedDayPolicy::Bridge => continue,
                DisallowedDayPolicy::Break => {
                    open.clear();
                    continue;
                }
            }
        }

        match &day.qualifying {
            None => open.clear(),
            Some(qualifying) => {
                open.push_back(qualifying.clone());
                if open.len() == required {
                    if let Some(run) = DayRun::from_days(open.iter().cloned().collect()) {
                        runs.push(run);
                    }
                    // Slide one day forward to catch the overlapping run.
                    open.pop_front();
                }
            }
        }
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{UnknownDayPolicy, WeekdaySet};
    use crate::window::FreeBlock;
    use chrono::{NaiveTime, TimeZone, Utc, Weekday};

    fn day(date: NaiveDate, qualifies: bool) -> ScanDay {
        let qualifying = qualifies.then(|| QualifyingDay {
            date,
            blocks: vec![FreeBlock {
                date,
                start: Utc
                    .with_ymd_and_hms(date.year(), date.month(), date.day(), 9, 0, 0)
                    .unwrap(),
                end: Utc
                    .with_ymd_and_hms(date.year(), date.month(), date.day(), 17, 0, 0)
                    .unwrap(),
            }],
        });
        ScanDay { date, qualifying }
    }

    fn query(required: u32, policy: DisallowedDayPolicy) -> AvailabilityQuery {
        AvailabilityQuery {
            search_range_start: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            search_range_end: NaiveDate::from_ymd_opt(2026, 3, 13).unwrap(),
            daily_open_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            daily_close_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            min_duration_minutes: 60,
            required_consecutive_days: required,
            allowed_weekdays: WeekdaySet::business_days(),
            unknown_day_policy: UnknownDayPolicy::Free,
            disallowed_day_policy: policy,
            result_limit: None,
        }
    }

    fn d(day_of_march: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day_of_march).unwrap()
    }

    #[test]
    fn test_overlapping_runs_emitted() {
        // 2026-03-02 is a Monday. Mon-Thu qualify, required 3:
        // expect [Mon-Wed] and [Tue-Thu].
        let days: Vec<ScanDay> = (2..=5).map(|n| day(d(n), true)).collect();
        let runs = find_runs(&days, &query(3, DisallowedDayPolicy::Bridge));
        assert_eq!(runs.len(), 2);
        assert_eq!((runs[0].start_date, runs[0].end_date), (d(2), d(4)));
        assert_eq!((runs[1].start_date, runs[1].end_date), (d(3), d(5)));
        assert_eq!(runs[0].days.len(), 3);
    }

    #[test]
    fn test_non_qualifying_day_breaks_run() {
        // Mon, Tue qualify; Wed does not; Thu, Fri qualify. Required 3.
        let days = vec![
            day(d(2), true),
            day(d(3), true),
            day(d(4), false),
            day(d(5), true),
            day(d(6), true),
        ];
        let runs = find_runs(&days, &query(3, DisallowedDayPolicy::Bridge));
        assert!(runs.is_empty());
    }

    #[test]
    fn test_bridge_policy_spans_weekend() {
        // Fri 2026-03-06 and Mon 2026-03-09 qualify; Sat/Sun are
        // disallowed. Bridging makes them a 2-day run spanning the weekend.
        let days = vec![
            day(d(6), true),
            day(d(7), false),
            day(d(8), false),
            day(d(9), true),
        ];
        let runs = find_runs(&days, &query(2, DisallowedDayPolicy::Bridge));
        assert_eq!(runs.len(), 1);
        assert_eq!((runs[0].start_date, runs[0].end_date), (d(6), d(9)));
        assert_eq!(runs[0].days.len(), 2);
    }

    #[test]
    fn test_break_policy_resets_over_weekend() {
        let days = vec![
            day(d(6), true),
            day(d(7), false),
            day(d(8), false),
            day(d(9), true),
        ];
        let runs = find_runs(&days, &query(2, DisallowedDayPolicy::Break));
        assert!(runs.is_empty());
    }

    #[test]
    fn test_bridged_days_never_counted_toward_length() {
        // Fri + Sat + Sun + Mon with required 3: bridging skips the
        // weekend but only Fri and Mon count, so no run.
        let days = vec![
            day(d(6), true),
            day(d(7), true),
            day(d(8), true),
            day(d(9), true),
        ];
        let runs = find_runs(&days, &query(3, DisallowedDayPolicy::Bridge));
        assert!(runs.is_empty());
    }

    #[test]
    fn test_single_day_requirement_emits_each_qualifying_day() {
        let days = vec![day(d(2), true), day(d(3), false), day(d(4), true)];
        let runs = find_runs(&days, &query(1, DisallowedDayPolicy::Bridge));
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].start_date, d(2));
        assert_eq!(runs[1].start_date, d(4));
    }

    #[test]
    fn test_weekend_allowed_when_in_weekday_set() {
        let mut q = query(2, DisallowedDayPolicy::Bridge);
        q.allowed_weekdays = WeekdaySet::all_days();
        let days = vec![day(d(7), true), day(d(8), true)]; // Sat, Sun
        let runs = find_runs(&days, &q);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].start_date.weekday(), Weekday::Sat);
    }

    #[test]
    fn test_no_qualifying_days_yields_no_runs() {
        let days: Vec<ScanDay> = (2..=6).map(|n| day(d(n), false)).collect();
        let runs = find_runs(&days, &query(2, DisallowedDayPolicy::Bridge));
        assert!(runs.is_empty());
    }
}
