//! Composition root: turns a [`Config`] into wired application services.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::adapter::outbound::memory::MemoryStore;
use crate::adapter::outbound::notifier::log::LogMessenger;
#[cfg(feature = "telegram")]
use crate::adapter::outbound::notifier::telegram::TelegramMessenger;
use crate::adapter::outbound::sqlite::{create_pool, run_migrations, SqliteStore};
use crate::application::catalog::Catalog;
use crate::application::poller::{Poller, SimulatedSource};
use crate::application::signal::{SeededScorer, SignalDispatcher, SignalState, TailScorer};
use crate::application::statistics::StatisticsAggregator;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::signal::ConfidenceKind;
use crate::port::inbound::signal::SignalService;
use crate::port::outbound::messenger::Messenger;
use crate::port::outbound::scorer::ConfidenceScorer;
use crate::port::outbound::source::OutcomeSource;
use crate::port::outbound::store::ConfigStore;

/// Open the configuration store: in-process for `:memory:`, SQLite otherwise.
pub(crate) fn build_store(config: &Config) -> Result<Arc<dyn ConfigStore>> {
    if config.uses_memory_store() {
        info!("Using in-memory configuration store");
        return Ok(Arc::new(MemoryStore::new()));
    }
    let pool = create_pool(&config.database)?;
    run_migrations(&pool)?;
    info!(database = %config.database, "SQLite store ready");
    Ok(Arc::new(SqliteStore::new(pool)))
}

/// Build the messenger. Falls back to logging when Telegram is off.
#[cfg(feature = "telegram")]
pub(crate) fn build_messenger(config: &Config) -> Arc<dyn Messenger> {
    if config.telegram.enabled {
        info!(timeout_secs = config.telegram.timeout_secs, "Telegram delivery enabled");
        Arc::new(TelegramMessenger::new(Duration::from_secs(
            config.telegram.timeout_secs,
        )))
    } else {
        info!("Telegram disabled, signals will only be logged");
        Arc::new(LogMessenger)
    }
}

/// Build the messenger (non-telegram variant).
#[cfg(not(feature = "telegram"))]
pub(crate) fn build_messenger(config: &Config) -> Arc<dyn Messenger> {
    if config.telegram.enabled {
        warn!("Telegram enabled in config but the binary was built without it");
    }
    Arc::new(LogMessenger)
}

pub(crate) fn build_scorer(config: &Config) -> Arc<dyn ConfidenceScorer> {
    match config.signal.confidence {
        ConfidenceKind::Tail => Arc::new(TailScorer),
        ConfidenceKind::Seeded => {
            let seed = config.signal.seed.unwrap_or_else(rand::random);
            Arc::new(SeededScorer::new(seed))
        }
    }
}

/// The outcome source for pollers, if one is configured.
pub(crate) fn build_source(config: &Config) -> Option<Arc<dyn OutcomeSource>> {
    if config.poller.simulate {
        let seed = config.poller.seed.unwrap_or_else(rand::random);
        Some(Arc::new(SimulatedSource::new(seed)))
    } else {
        None
    }
}

/// Wired application services.
pub struct App {
    pub config: Config,
    pub store: Arc<dyn ConfigStore>,
    pub messenger: Arc<dyn Messenger>,
    pub dispatcher: Arc<SignalDispatcher>,
    pub catalog: Catalog,
}

impl App {
    /// Wire every component from configuration.
    ///
    /// # Errors
    /// Returns an error if the store cannot be opened or migrated.
    pub fn build(config: Config) -> Result<Self> {
        let store = build_store(&config)?;
        let messenger = build_messenger(&config);
        Ok(Self::with_parts(config, store, messenger))
    }

    /// Wire the pipeline around an existing store and messenger.
    #[must_use]
    pub fn with_parts(
        config: Config,
        store: Arc<dyn ConfigStore>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        let state = Arc::new(SignalState::new(config.signal.ring_capacity));
        let stats = Arc::new(StatisticsAggregator::new(
            config.statistics.history_capacity,
            config.statistics.recent_limit,
        ));
        let dispatcher = Arc::new(SignalDispatcher::new(
            Arc::clone(&store),
            Arc::clone(&messenger),
            build_scorer(&config),
            Arc::clone(&state),
            stats,
            config.signal.dispatch_settings(),
        ));
        let catalog = Catalog::new(Arc::clone(&store)).with_state(state);

        Self {
            config,
            store,
            messenger,
            dispatcher,
            catalog,
        }
    }

    /// Start one poller per eligible bot when polling is enabled.
    ///
    /// # Errors
    /// Returns an error if the bot list cannot be loaded.
    pub async fn start_pollers(
        &self,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<Vec<JoinHandle<()>>> {
        if !self.config.poller.enabled {
            return Ok(Vec::new());
        }
        let Some(source) = build_source(&self.config) else {
            warn!("Polling enabled without an outcome source, pollers not started");
            return Ok(Vec::new());
        };

        let bots = self.catalog.bots().await?;
        let poller = Poller::new(
            Arc::clone(&self.dispatcher) as Arc<dyn SignalService>,
            source,
            Duration::from_secs(self.config.poller.interval_secs),
        );
        let handles = poller.spawn_all(&bots, shutdown);
        info!(
            pollers = handles.len(),
            interval_secs = self.config.poller.interval_secs,
            "Pollers started"
        );
        Ok(handles)
    }
}
