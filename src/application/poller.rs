//! Background pollers.
//!
//! A poller is just another caller of the ingestion entry point: every
//! interval it asks an [`OutcomeSource`] for the bot's next value and feeds
//! it through [`SignalService::ingest`]. Shutdown stops future iterations;
//! an iteration that already started always runs to completion.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::Bot;
use crate::error::Result;
use crate::port::inbound::{OutcomeRequest, SignalService};
use crate::port::outbound::source::OutcomeSource;

/// Default seconds between polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Spawns one cancellable polling task per bot.
pub struct Poller {
    service: Arc<dyn SignalService>,
    source: Arc<dyn OutcomeSource>,
    interval: Duration,
}

impl Poller {
    #[must_use]
    pub fn new(
        service: Arc<dyn SignalService>,
        source: Arc<dyn OutcomeSource>,
        interval: Duration,
    ) -> Self {
        Self {
            service,
            source,
            interval,
        }
    }

    /// Start a polling task for each eligible bot.
    pub fn spawn_all(&self, bots: &[Bot], shutdown: &watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        bots.iter()
            .filter(|bot| bot.is_eligible())
            .map(|bot| self.spawn(bot.clone(), shutdown.clone()))
            .collect()
    }

    /// Start a polling task for one bot.
    pub fn spawn(&self, bot: Bot, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        let service = Arc::clone(&self.service);
        let source = Arc::clone(&self.source);
        let interval = self.interval;
        tokio::spawn(poll_bot(service, source, bot, interval, shutdown))
    }
}

async fn poll_bot(
    service: Arc<dyn SignalService>,
    source: Arc<dyn OutcomeSource>,
    bot: Bot,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(
        bot_id = %bot.id,
        source = source.name(),
        interval_secs = interval.as_secs(),
        "Poller started"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            result = shutdown.changed() => {
                match result {
                    Ok(()) if *shutdown.borrow() => break,
                    Ok(()) => continue,
                    Err(_) => break,
                }
            }
            _ = ticker.tick() => {}
        }

        // Not raced against shutdown: once started, the iteration finishes.
        poll_once(service.as_ref(), source.as_ref(), &bot).await;
    }

    info!(bot_id = %bot.id, "Poller stopped");
}

/// One polling iteration. Errors are logged, never propagated.
pub async fn poll_once(service: &dyn SignalService, source: &dyn OutcomeSource, bot: &Bot) {
    let value = match source.next_value(bot).await {
        Ok(Some(value)) => value,
        Ok(None) => {
            debug!(bot_id = %bot.id, "No new outcome");
            return;
        }
        Err(err) => {
            warn!(bot_id = %bot.id, error = %err, "Outcome source failed");
            return;
        }
    };

    match service.ingest(OutcomeRequest::for_bot(bot.id, value)).await {
        Ok(report) => debug!(
            bot_id = %bot.id,
            event_index = report.event_index,
            dispatched = report.dispatched(),
            "Polled outcome ingested"
        ),
        Err(err) => warn!(
            bot_id = %bot.id,
            error = %err,
            kind = err.kind(),
            "Polled outcome rejected"
        ),
    }
}

/// Seeded stand-in for a live game feed.
///
/// Roughly 3% instant crashes at 1.00x, otherwise a heavy-tailed multiplier
/// rounded to two decimals.
pub struct SimulatedSource {
    rng: Mutex<StdRng>,
}

impl SimulatedSource {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn draw(&self) -> f64 {
        let mut rng = self.rng.lock();
        if rng.gen_bool(0.03) {
            return 1.0;
        }
        let u: f64 = rng.gen_range(0.0..0.99);
        let value = 0.99 / (1.0 - u);
        (value.max(1.01) * 100.0).round() / 100.0
    }
}

#[async_trait]
impl OutcomeSource for SimulatedSource {
    async fn next_value(&self, _bot: &Bot) -> Result<Option<f64>> {
        Ok(Some(self.draw()))
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}
