//! Deterministic ordering of candidate runs.

use crate::runs::DayRun;

/// Order runs by earliest start, ties broken by more total free time.
///
/// Runs sharing a start date collapse to the best one, then the list is
/// truncated to `limit` when given. An empty input stays empty; "nothing
/// qualified" is a legitimate outcome, not an error.
pub fn rank(mut runs: Vec<DayRun>, limit: Option<usize>) -> Vec<DayRun> {
    runs.sort_by(|a, b| {
        a.start_date
            .cmp(&b.start_date)
            .then_with(|| b.total_free_minutes().cmp(&a.total_free_minutes()))
    });
    runs.dedup_by_key(|r| r.start_date);
    if let Some(limit) = limit {
        runs.truncate(limit);
    }
    runs
}
