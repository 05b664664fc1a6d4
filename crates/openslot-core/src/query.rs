//! Structured scheduling request and its policies.
//!
//! An [`AvailabilityQuery`] carries every knob the engine needs for one
//! resolution: the search range, the recurring daily window, the minimum
//! block duration, how many consecutive days are required, and the
//! policies for disallowed weekdays and days with no calendar data. The
//! engine never reads ambient state; everything comes in on this value.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::QueryError;
use crate::window::DayWindow;

/// Set of weekdays a run may be built from, stored as a bitmask.
///
/// Serialized as a list of weekday names (`["Mon", "Tue", ...]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdaySet(u8);

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

impl WeekdaySet {
    /// The empty set. A query with this set never validates.
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    /// Monday through Friday.
    pub fn business_days() -> Self {
        Self::from_weekdays(&[
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ])
    }

    /// Every day of the week.
    pub fn all_days() -> Self {
        Self::from_weekdays(&ALL_WEEKDAYS)
    }

    pub fn from_weekdays(days: &[Weekday]) -> Self {
        let mut set = Self::EMPTY;
        for day in days {
            set.insert(*day);
        }
        set
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= Self::bit(day);
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Weekdays in Monday-first order.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        ALL_WEEKDAYS.into_iter().filter(|d| self.contains(*d))
    }

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }
}

impl Default for WeekdaySet {
    fn default() -> Self {
        Self::business_days()
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|d| d.to_string()).collect();
        write!(f, "{}", names.join(","))
    }
}

impl Serialize for WeekdaySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let names: Vec<String> = self.iter().map(|d| d.to_string()).collect();
        names.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WeekdaySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names: Vec<String> = Vec::deserialize(deserializer)?;
        let mut set = WeekdaySet::EMPTY;
        for name in &names {
            let day = Weekday::from_str(name)
                .map_err(|_| D::Error::custom(format!("unknown weekday: {name}")))?;
            set.insert(day);
        }
        Ok(set)
    }
}

/// Treatment of a calendar day the provider returned no data for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownDayPolicy {
    /// No data means the whole window is open (optimistic).
    #[default]
    Free,
    /// No data means the day cannot be offered (conservative).
    Busy,
}

/// Treatment of days whose weekday is outside the allowed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisallowedDayPolicy {
    /// Skipped entirely: a Saturday between two qualifying weekdays does
    /// not break a weekday-only run, and is never counted toward it.
    #[default]
    Bridge,
    /// A disallowed day resets any open run.
    Break,
}

/// One availability resolution request.
///
/// Wire shape matches the external request contract (camelCase fields);
/// policy fields and the result limit default when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub search_range_start: NaiveDate,
    pub search_range_end: NaiveDate,
    pub daily_open_time: NaiveTime,
    pub daily_close_time: NaiveTime,
    pub min_duration_minutes: u32,
    pub required_consecutive_days: u32,
    #[serde(default)]
    pub allowed_weekdays: WeekdaySet,
    #[serde(default)]
    pub unknown_day_policy: UnknownDayPolicy,
    #[serde(default)]
    pub disallowed_day_policy: DisallowedDayPolicy,
    /// Maximum number of ranked candidates to return. `None` = unlimited.
    #[serde(default)]
    pub result_limit: Option<usize>,
}

impl AvailabilityQuery {
    /// Check the structural invariants. Run before any computation; a
    /// failing query is rejected outright, never partially evaluated.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.search_range_start > self.search_range_end {
            return Err(QueryError::InvertedRange {
                start: self.search_range_start,
                end: self.search_range_end,
            });
        }
        if self.daily_open_time >= self.daily_close_time {
            return Err(QueryError::InvertedWindow {
                open: self.daily_open_time,
                close: self.daily_close_time,
            });
        }
        if self.min_duration_minutes == 0 {
            return Err(QueryError::ZeroDuration);
        }
        if self.required_consecutive_days == 0 {
            return Err(QueryError::ZeroConsecutiveDays);
        }
        if self.allowed_weekdays.is_empty() {
            return Err(QueryError::EmptyWeekdaySet);
        }
        Ok(())
    }

    /// Calendar days of the search range, inclusive on both ends.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let end = self.search_range_end;
        self.search_range_start
            .iter_days()
            .take_while(move |d| *d <= end)
    }

    /// The daily availability window applied to a specific date.
    pub fn window_for(&self, date: NaiveDate) -> DayWindow {
        DayWindow::new(date, self.daily_open_time, self.daily_close_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_query() -> AvailabilityQuery {
        AvailabilityQuery {
            search_range_start: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            search_range_end: NaiveDate::from_ymd_opt(2026, 3, 6).unwrap(),
            daily_open_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            daily_close_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            min_duration_minutes: 240,
            required_consecutive_days: 3,
            allowed_weekdays: WeekdaySet::default(),
            unknown_day_policy: UnknownDayPolicy::default(),
            disallowed_day_policy: DisallowedDayPolicy::default(),
            result_limit: None,
        }
    }

    #[test]
    fn test_valid_query_passes() {
        assert!(base_query().validate().is_ok());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut q = base_query();
        q.search_range_end = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert!(matches!(
            q.validate(),
            Err(QueryError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let mut q = base_query();
        q.daily_close_time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert!(matches!(
            q.validate(),
            Err(QueryError::InvertedWindow { .. })
        ));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut q = base_query();
        q.min_duration_minutes = 0;
        assert_eq!(q.validate(), Err(QueryError::ZeroDuration));
    }

    #[test]
    fn test_zero_consecutive_days_rejected() {
        let mut q = base_query();
        q.required_consecutive_days = 0;
        assert_eq!(q.validate(), Err(QueryError::ZeroConsecutiveDays));
    }

    #[test]
    fn test_empty_weekday_set_rejected() {
        let mut q = base_query();
        q.allowed_weekdays = WeekdaySet::EMPTY;
        assert_eq!(q.validate(), Err(QueryError::EmptyWeekdaySet));
    }

    #[test]
    fn test_days_iterates_inclusive_range() {
        let q = base_query();
        let days: Vec<NaiveDate> = q.days().collect();
        assert_eq!(days.len(), 5);
        assert_eq!(days[0], q.search_range_start);
        assert_eq!(days[4], q.search_range_end);
    }

    #[test]
    fn test_weekday_set_defaults_to_business_days() {
        let set = WeekdaySet::default();
        assert!(set.contains(Weekday::Mon));
        assert!(set.contains(Weekday::Fri));
        assert!(!set.contains(Weekday::Sat));
        assert!(!set.contains(Weekday::Sun));
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_weekday_set_serde_round_trip() {
        let set = WeekdaySet::from_weekdays(&[Weekday::Mon, Weekday::Sat]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["Mon","Sat"]"#);
        let back: WeekdaySet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_weekday_set_deserializes_full_names() {
        let set: WeekdaySet = serde_json::from_str(r#"["monday","Friday"]"#).unwrap();
        assert!(set.contains(Weekday::Mon));
        assert!(set.contains(Weekday::Fri));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_weekday_set_rejects_unknown_name() {
        let result: Result<WeekdaySet, _> = serde_json::from_str(r#"["Noday"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_query_deserializes_with_defaults() {
        let json = r#"{
            "searchRangeStart": "2026-03-02",
            "searchRangeEnd": "2026-03-06",
            "dailyOpenTime": "09:00:00",
            "dailyCloseTime": "17:00:00",
            "minDurationMinutes": 240,
            "requiredConsecutiveDays": 3
        }"#;
        let q: AvailabilityQuery = serde_json::from_str(json).unwrap();
        assert_eq!(q.allowed_weekdays, WeekdaySet::business_days());
        assert_eq!(q.unknown_day_policy, UnknownDayPolicy::Free);
        assert_eq!(q.disallowed_day_policy, DisallowedDayPolicy::Bridge);
        assert_eq!(q.result_limit, None);
        assert!(q.validate().is_ok());
    }
}
