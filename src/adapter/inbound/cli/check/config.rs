use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Validate the configuration file without starting the pipeline.
pub fn execute_config(path: &Path, config: &Config) -> Result<()> {
    if output::is_json() {
        output::json_output(json!({
            "command": "check.config",
            "path": path.display().to_string(),
            "exists": path.exists(),
            "database": config.database,
            "ring_capacity": config.signal.ring_capacity,
            "low_threshold": config.signal.low_threshold,
            "telegram_enabled": config.telegram.enabled,
            "poller_enabled": config.poller.enabled,
            "status": "valid",
        }));
        return Ok(());
    }

    output::section("Configuration Check");
    output::field("Config", path.display());
    if path.exists() {
        output::success("Configuration file is valid");
    } else {
        output::warning("Configuration file not found, using defaults");
    }

    output::section("Summary");
    output::field("Database", &config.database);
    output::field("Ring", config.signal.ring_capacity);
    output::field("Threshold", format!("{:.2}x", config.signal.low_threshold));
    output::field("Target", &config.signal.target_multiplier);
    output::field("Confidence", format!("{:?}", config.signal.confidence).to_lowercase());
    output::field("History", config.statistics.history_capacity);
    if config.poller.enabled {
        output::field(
            "Poller",
            format!(
                "every {}s{}",
                config.poller.interval_secs,
                if config.poller.simulate { " (simulated)" } else { "" }
            ),
        );
    } else {
        output::field("Poller", "disabled");
    }

    if config.telegram.enabled {
        if cfg!(feature = "telegram") {
            output::success("Telegram delivery enabled");
        } else {
            output::warning("Telegram enabled but this build has no Telegram support");
        }
    } else {
        output::field("Telegram", "disabled (signals are logged)");
    }

    output::success("Configuration check complete");
    Ok(())
}
