//! Calendar provider boundary.
//!
//! The engine never performs I/O; these modules fetch busy-time data from
//! an external calendar service and assemble the `BusyCalendar` the engine
//! consumes. Pagination, bounded fan-out, timeouts and retry policy all
//! live on this side of the boundary.

pub mod fetch;
pub mod google;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ProviderError;
use crate::interval::BusyInterval;

/// One page of busy intervals from the provider.
#[derive(Debug, Clone, Default)]
pub struct BusyPage {
    pub intervals: Vec<BusyInterval>,
    /// Token for the next page, `None` when this page is the last.
    pub next_page_token: Option<String>,
}

/// Source of busy-time data, paginated per calendar.
///
/// Implementations map their transport failures onto [`ProviderError`] so
/// the fetch layer can decide what to retry.
#[async_trait]
pub trait BusyIntervalProvider: Send + Sync {
    async fn fetch_page(
        &self,
        calendar_id: &str,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        page_token: Option<&str>,
    ) -> Result<BusyPage, ProviderError>;
}
