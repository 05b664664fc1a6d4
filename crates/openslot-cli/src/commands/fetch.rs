use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use openslot_core::provider::google::GoogleBusyProvider;
use openslot_core::provider::BusyIntervalProvider;
use openslot_core::{fetch_busy_calendar, resolve, Config, FetchPolicy};

use crate::common;

#[derive(Args)]
pub struct FetchArgs {
    /// Availability query JSON file
    #[arg(long)]
    pub query: PathBuf,
    /// Bearer token for the calendar API
    #[arg(long)]
    pub token: String,
    /// Calendar IDs to fan out over (repeatable)
    #[arg(long = "calendar", required = true)]
    pub calendars: Vec<String>,
    /// Cap on the number of candidates (overrides query and config)
    #[arg(long)]
    pub limit: Option<usize>,
}

pub fn run(args: FetchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut query = common::load_query(&args.query, &config)?;
    if args.limit.is_some() {
        query.result_limit = args.limit;
    }
    // Reject a bad query before spending any network calls on it.
    query.validate()?;

    let provider: Arc<dyn BusyIntervalProvider> = Arc::new(GoogleBusyProvider::new(args.token));
    let policy = FetchPolicy::from(&config.fetch);

    let runtime = tokio::runtime::Runtime::new()?;
    let busy = runtime.block_on(fetch_busy_calendar(
        provider,
        &args.calendars,
        query.search_range_start,
        query.search_range_end,
        &policy,
    ))?;

    let result = resolve(&query, &busy)?;
    println!("{}", serde_json::to_string_pretty(&result.to_response())?);
    Ok(())
}
