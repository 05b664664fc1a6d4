use clap::Subcommand;
use openslot_core::{Config, DisallowedDayPolicy, UnknownDayPolicy};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the policy for days with no calendar data (free|busy)
    SetUnknownDay { policy: String },
    /// Set the policy for disallowed weekdays (bridge|break)
    SetDisallowedDay { policy: String },
    /// Set the default result limit ("none" clears it)
    SetLimit { limit: String },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load_or_default();
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::SetUnknownDay { policy } => {
            let value = match policy.as_str() {
                "free" => UnknownDayPolicy::Free,
                "busy" => UnknownDayPolicy::Busy,
                other => return Err(format!("unknown policy: {other} (free|busy)").into()),
            };
            let mut config = Config::load_or_default();
            config.policy.unknown_day = value;
            config.save()?;
            println!("unknown-day policy set to {policy}");
        }
        ConfigAction::SetDisallowedDay { policy } => {
            let value = match policy.as_str() {
                "bridge" => DisallowedDayPolicy::Bridge,
                "break" => DisallowedDayPolicy::Break,
                other => return Err(format!("unknown policy: {other} (bridge|break)").into()),
            };
            let mut config = Config::load_or_default();
            config.policy.disallowed_day = value;
            config.save()?;
            println!("disallowed-day policy set to {policy}");
        }
        ConfigAction::SetLimit { limit } => {
            let value = if limit == "none" {
                None
            } else {
                Some(limit.parse::<usize>()?)
            };
            let mut config = Config::load_or_default();
            config.policy.result_limit = value;
            config.save()?;
            println!("result limit set to {limit}");
        }
    }
    Ok(())
}
