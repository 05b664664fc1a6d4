//! Google Calendar API provider.
//!
//! Pulls busy time from the events endpoint with `singleEvents=true`, so
//! recurring meetings arrive pre-expanded. Transparent ("free") and
//! cancelled events are skipped; all-day events block the whole day.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::error::ProviderError;
use crate::interval::BusyInterval;
use crate::provider::{BusyIntervalProvider, BusyPage};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar events client.
pub struct GoogleBusyProvider {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl GoogleBusyProvider {
    /// Create a client with an already-acquired bearer token. Token
    /// acquisition and refresh belong to the surrounding application.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn events_url(
        &self,
        calendar_id: &str,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        page_token: Option<&str>,
    ) -> String {
        let mut params = vec![
            ("singleEvents".to_string(), "true".to_string()),
            ("orderBy".to_string(), "startTime".to_string()),
            ("timeMin".to_string(), range_start.to_rfc3339()),
            ("timeMax".to_string(), range_end.to_rfc3339()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken".to_string(), token.to_string()));
        }
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!(
            "{}/calendars/{}/events?{}",
            self.base_url,
            urlencoding::encode(calendar_id),
            query
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsPage {
    #[serde(default)]
    items: Vec<EventItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventItem {
    start: Option<EventTime>,
    end: Option<EventTime>,
    status: Option<String>,
    transparency: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    date_time: Option<DateTime<Utc>>,
    /// All-day events carry a date instead of a timestamp.
    date: Option<NaiveDate>,
}

impl EventTime {
    fn resolve(&self) -> Option<DateTime<Utc>> {
        self.date_time
            .or_else(|| Some(self.date?.and_time(NaiveTime::MIN).and_utc()))
    }
}

impl EventItem {
    /// Busy interval for this event, or `None` when it doesn't block time.
    fn to_busy(&self) -> Option<BusyInterval> {
        if self.status.as_deref() == Some("cancelled") {
            return None;
        }
        // Transparent events are marked "free" and reserve no time.
        if self.transparency.as_deref() == Some("transparent") {
            return None;
        }
        let start = self.start.as_ref()?.resolve()?;
        let end = self.end.as_ref()?.resolve()?;
        Some(BusyInterval::new(start, end))
    }
}

#[async_trait]
impl BusyIntervalProvider for GoogleBusyProvider {
    async fn fetch_page(
        &self,
        calendar_id: &str,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        page_token: Option<&str>,
    ) -> Result<BusyPage, ProviderError> {
        let url = self.events_url(calendar_id, range_start, range_end, page_token);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => return Err(ProviderError::Unauthorized),
            // Google reports quota exhaustion as 403 as often as 429.
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                return Err(ProviderError::RateLimited)
            }
            s if s.is_server_error() => {
                return Err(ProviderError::Unavailable(format!(
                    "calendar {calendar_id}: HTTP {s}"
                )))
            }
            s if !s.is_success() => {
                return Err(ProviderError::InvalidResponse(format!(
                    "calendar {calendar_id}: unexpected HTTP {s}"
                )))
            }
            _ => {}
        }

        let page: EventsPage = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let mut intervals = Vec::with_capacity(page.items.len());
        for item in &page.items {
            match item.to_busy() {
                Some(interval) => intervals.push(interval),
                None => debug!(calendar = calendar_id, "skipping non-blocking event"),
            }
        }

        Ok(BusyPage {
            intervals,
            next_page_token: page.next_page_token,
        })
    }
}
