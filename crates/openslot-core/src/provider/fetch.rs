//! Bounded fan-out fetch across calendars.
//!
//! One task per calendar, gated by a fixed-size semaphore; each page call
//! gets a deadline and transient failures are retried with exponential
//! backoff. `Unauthorized` is surfaced immediately. Dropping the returned
//! future aborts every in-flight call, so cancelling a query upstream
//! simply means the engine is never invoked.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

use crate::config::FetchConfig;
use crate::engine::BusyCalendar;
use crate::error::ProviderError;
use crate::interval::BusyInterval;
use crate::provider::{BusyIntervalProvider, BusyPage};

/// Tuning for one fan-out invocation.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    /// Maximum concurrently executing calendar fetches.
    pub max_concurrency: usize,
    /// Deadline for a single page call.
    pub call_timeout: Duration,
    /// Retry budget per page call for transient failures.
    pub max_retries: u32,
    /// First backoff delay; doubles per attempt.
    pub initial_backoff: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for FetchPolicy {
    fn from(config: &FetchConfig) -> Self {
        Self {
            max_concurrency: config.max_concurrency.max(1),
            call_timeout: Duration::from_secs(config.timeout_secs),
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
        }
    }
}

/// Fetch busy data for every calendar over the search range and assemble
/// the per-day [`BusyCalendar`] the engine consumes.
///
/// Pages are drained per calendar; the first non-recoverable failure wins
/// and aborts the remaining tasks.
pub async fn fetch_busy_calendar(
    provider: Arc<dyn BusyIntervalProvider>,
    calendar_ids: &[String],
    range_start: NaiveDate,
    range_end: NaiveDate,
    policy: &FetchPolicy,
) -> Result<BusyCalendar, ProviderError> {
    let fetch_start = range_start.and_time(NaiveTime::MIN).and_utc();
    let fetch_end = match range_end.succ_opt() {
        Some(next) => next.and_time(NaiveTime::MIN).and_utc(),
        None => range_end.and_time(NaiveTime::MIN).and_utc(),
    };

    let semaphore = Arc::new(Semaphore::new(policy.max_concurrency.max(1)));
    let mut tasks: JoinSet<Result<Vec<BusyInterval>, ProviderError>> = JoinSet::new();

    for calendar_id in calendar_ids {
        let provider = Arc::clone(&provider);
        let semaphore = Arc::clone(&semaphore);
        let policy = policy.clone();
        let calendar_id = calendar_id.clone();
        tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|_| ProviderError::Unavailable("fetch pool closed".into()))?;
            fetch_calendar(provider.as_ref(), &calendar_id, fetch_start, fetch_end, &policy).await
        });
    }

    let mut all_intervals = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let intervals = joined
            .map_err(|e| ProviderError::Unavailable(format!("fetch task failed: {e}")))??;
        all_intervals.extend(intervals);
    }

    Ok(BusyCalendar::from_intervals(
        range_start,
        range_end,
        &all_intervals,
    ))
}

/// Drain every page of one calendar.
async fn fetch_calendar(
    provider: &dyn BusyIntervalProvider,
    calendar_id: &str,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    policy: &FetchPolicy,
) -> Result<Vec<BusyInterval>, ProviderError> {
    let mut intervals = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = fetch_page_with_retry(
            provider,
            calendar_id,
            range_start,
            range_end,
            page_token.as_deref(),
            policy,
        )
        .await?;
        intervals.extend(page.intervals);
        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(intervals)
}

async fn fetch_page_with_retry(
    provider: &dyn BusyIntervalProvider,
    calendar_id: &str,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    page_token: Option<&str>,
    policy: &FetchPolicy,
) -> Result<BusyPage, ProviderError> {
    let mut delay = policy.initial_backoff;
    let mut attempt: u32 = 0;

    loop {
        let call = provider.fetch_page(calendar_id, range_start, range_end, page_token);
        let result = match tokio::time::timeout(policy.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(policy.call_timeout)),
        };

        match result {
            Ok(page) => return Ok(page),
            Err(err) if err.is_retryable() && attempt < policy.max_retries => {
                attempt += 1;
                warn!(calendar = calendar_id, error = %err, attempt, "retrying busy fetch");
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(err) => return Err(err),
        }
    }
}
