use std::path::PathBuf;

use clap::Args;
use openslot_core::{resolve, BusyCalendar, Config};

use crate::common;

#[derive(Args)]
pub struct ResolveArgs {
    /// Availability query JSON file
    #[arg(long)]
    pub query: PathBuf,
    /// Busy data JSON file: a map of date to busy intervals
    #[arg(long)]
    pub busy: PathBuf,
    /// Cap on the number of candidates (overrides query and config)
    #[arg(long)]
    pub limit: Option<usize>,
}

pub fn run(args: ResolveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut query = common::load_query(&args.query, &config)?;
    if args.limit.is_some() {
        query.result_limit = args.limit;
    }

    let busy: BusyCalendar = serde_json::from_str(&std::fs::read_to_string(&args.busy)?)?;

    let result = resolve(&query, &busy)?;
    println!("{}", serde_json::to_string_pretty(&result.to_response())?);
    Ok(())
}
