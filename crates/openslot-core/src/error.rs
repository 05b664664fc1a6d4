//! Core error types for openslot-core.
//!
//! Each concern gets its own thiserror enum so callers can tell apart
//! "the request was malformed" (caller-fixable, never retried), "a busy
//! record was bad" (recovered per record), and "the provider could not be
//! reached" (retryable or not, but never confused with an empty result).

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

/// Rejections raised by query validation before any computation runs.
///
/// These are always caller-fixable; retrying the same query cannot help.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Search range end precedes its start.
    #[error("search range is inverted: {start} is after {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    /// Daily window closes at or before it opens.
    #[error("daily window is empty: opens {open}, closes {close}")]
    InvertedWindow { open: NaiveTime, close: NaiveTime },

    /// Minimum block duration must be positive.
    #[error("minimum duration must be a positive number of minutes")]
    ZeroDuration,

    /// At least one consecutive day must be requested.
    #[error("required consecutive days must be at least 1")]
    ZeroConsecutiveDays,

    /// No weekday is allowed, so no day could ever qualify.
    #[error("allowed weekday set is empty")]
    EmptyWeekdaySet,
}

/// A busy record violating the interval contract (`start < end`).
///
/// Recovered locally: the offending record is dropped and the query
/// continues with the rest of that day's data.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("malformed busy interval: start {start} is not before end {end}")]
pub struct MalformedInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Failures at the calendar provider boundary.
///
/// Kept distinct from engine errors so the presentation layer can
/// distinguish "no availability" from "could not check availability".
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Credentials rejected. Surfaced immediately, never retried.
    #[error("calendar access unauthorized")]
    Unauthorized,

    /// Provider throttled the request.
    #[error("calendar provider rate limited the request")]
    RateLimited,

    /// Provider is down or returned a server error.
    #[error("calendar provider unavailable: {0}")]
    Unavailable(String),

    /// A single call exceeded its deadline.
    #[error("calendar fetch timed out after {0:?}")]
    Timeout(Duration),

    /// Response body did not match the expected shape.
    #[error("unexpected calendar provider response: {0}")]
    InvalidResponse(String),

    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ProviderError {
    /// Whether retry-with-backoff is appropriate for this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited
                | ProviderError::Unavailable(_)
                | ProviderError::Timeout(_)
                | ProviderError::Network(_)
        )
    }
}

/// Configuration load/save failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_retryable_classification() {
        assert!(!ProviderError::Unauthorized.is_retryable());
        assert!(ProviderError::RateLimited.is_retryable());
        assert!(ProviderError::Unavailable("503".into()).is_retryable());
        assert!(ProviderError::Timeout(Duration::from_secs(30)).is_retryable());
        assert!(!ProviderError::InvalidResponse("bad json".into()).is_retryable());
    }

    #[test]
    fn test_malformed_interval_message() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let err = MalformedInterval { start, end };
        assert!(err.to_string().contains("is not before"));
    }
}
