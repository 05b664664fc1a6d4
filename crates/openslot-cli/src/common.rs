//! Shared helpers for CLI commands.

use std::path::Path;

use openslot_core::{AvailabilityQuery, Config};

/// Load an availability query from a JSON file, filling policy fields the
/// file leaves out from the config defaults. Keys present in the file
/// always win over config.
pub fn load_query(
    path: &Path,
    config: &Config,
) -> Result<AvailabilityQuery, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    let mut value: serde_json::Value = serde_json::from_str(&raw)?;

    if let Some(object) = value.as_object_mut() {
        object
            .entry("unknownDayPolicy")
            .or_insert(serde_json::to_value(config.policy.unknown_day)?);
        object
            .entry("disallowedDayPolicy")
            .or_insert(serde_json::to_value(config.policy.disallowed_day)?);
        if let Some(limit) = config.policy.result_limit {
            object
                .entry("resultLimit")
                .or_insert(serde_json::json!(limit));
        }
    }

    Ok(serde_json::from_value(value)?)
}
