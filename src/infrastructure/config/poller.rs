//! Background poller configuration.

use serde::Deserialize;

use crate::application::poller::DEFAULT_POLL_INTERVAL_SECS;

/// Background poller configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PollerConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Feed pollers from the bundled simulator.
    #[serde(default)]
    pub simulate: bool,
    /// Simulator seed. Random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

const fn default_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: default_interval_secs(),
            simulate: false,
            seed: None,
        }
    }
}
