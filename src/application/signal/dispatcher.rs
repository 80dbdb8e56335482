//! Signal dispatcher: the per-event state machine.
//!
//! ```text
//! Received -> BufferUpdated -> PerStrategyEvaluation -> Dispatched/Suppressed -> Recorded
//! ```
//!
//! Validation and bot resolution happen before any state is touched. The
//! buffer push, counter increment, and every ledger claim for an event run
//! inside the bot's lane lock with no await point; message hand-off and
//! persistence happen after the lock is released.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use super::filter::in_window;
use super::format::{self, SignalContext};
use super::matcher;
use super::state::SignalState;
use crate::application::statistics::StatisticsAggregator;
use crate::domain::{Bot, Credentials, NewGameResult, Stage, Strategy};
use crate::error::{Error, Result, SignalError};
use crate::port::inbound::{
    HistoryEntry, IngestReport, OutcomeRequest, OutcomeStatus, SignalService, StatsSummary,
    StrategyOutcome,
};
use crate::port::outbound::messenger::Messenger;
use crate::port::outbound::scorer::{ConfidenceScorer, ScoreInput};
use crate::port::outbound::store::ConfigStore;

/// Source of the current time. Injected so tests can pin the active window.
pub type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// Tunables of the matching stage.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// Multipliers below this count as low (and as red tokens).
    pub low_threshold: f64,
    /// Target shown in default messages, e.g. `2.5x`.
    pub target_multiplier: String,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            low_threshold: 2.0,
            target_multiplier: "2.5x".to_string(),
        }
    }
}

/// A stage that passed the ledger and must be handed off.
struct Claim<'a> {
    strategy: &'a Strategy,
    stage: Stage,
    tail: usize,
}

/// Orchestrates one outcome event end to end.
pub struct SignalDispatcher {
    store: Arc<dyn ConfigStore>,
    messenger: Arc<dyn Messenger>,
    scorer: Arc<dyn ConfidenceScorer>,
    state: Arc<SignalState>,
    stats: Arc<StatisticsAggregator>,
    settings: DispatchSettings,
    clock: Clock,
}

impl SignalDispatcher {
    #[must_use]
    pub fn new(
        store: Arc<dyn ConfigStore>,
        messenger: Arc<dyn Messenger>,
        scorer: Arc<dyn ConfidenceScorer>,
        state: Arc<SignalState>,
        stats: Arc<StatisticsAggregator>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            store,
            messenger,
            scorer,
            state,
            stats,
            settings,
            clock: Arc::new(Local::now),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn state(&self) -> &Arc<SignalState> {
        &self.state
    }

    #[must_use]
    pub fn statistics(&self) -> &Arc<StatisticsAggregator> {
        &self.stats
    }

    /// Resolve the target bot of an event.
    ///
    /// An explicit id must exist and be eligible. Otherwise the newest
    /// eligible bot of the event's game type is used.
    async fn resolve_bot(&self, request: &OutcomeRequest) -> Result<Bot> {
        if let Some(bot_id) = request.bot_id {
            let bot = self.store.get_bot(bot_id).await?.ok_or(Error::NotFound {
                entity: "bot",
                id: bot_id.get(),
            })?;
            if !bot.is_eligible() {
                return Err(SignalError::NoEligibleBot(format!(
                    "bot {bot_id} is inactive or has no messaging credentials"
                ))
                .into());
            }
            return Ok(bot);
        }

        let game_type = request
            .game_type
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty());

        self.store
            .latest_eligible_bot(game_type)
            .await?
            .ok_or_else(|| {
                SignalError::NoEligibleBot(format!(
                    "no active bot with credentials for game type '{}'",
                    game_type.unwrap_or("any")
                ))
                .into()
            })
    }

    #[allow(clippy::too_many_arguments)]
    async fn dispatch(
        &self,
        bot: &Bot,
        credentials: &Credentials,
        claim: Claim<'_>,
        event_index: u64,
        value: f64,
        history_len: usize,
        now: DateTime<Local>,
    ) -> StrategyOutcome {
        let strategy = claim.strategy;
        let pattern = strategy.parsed_pattern();
        let confidence = self.scorer.score(&ScoreInput {
            pattern: &pattern,
            tail: claim.tail,
            need: strategy.need,
            history_len,
        });

        let text = format::render(&SignalContext {
            bot,
            strategy,
            stage: claim.stage,
            tail: claim.tail,
            value,
            confidence,
            target: &self.settings.target_multiplier,
            at: now,
        });

        let mut outcome = StrategyOutcome {
            strategy_id: strategy.id,
            name: strategy.name.clone(),
            stage: claim.stage,
            tail: claim.tail,
            status: OutcomeStatus::Error,
            detail: None,
            result_id: None,
        };

        match self.messenger.send(credentials, &text).await {
            Ok(delivery) if delivery.delivered => {
                info!(
                    bot_id = %bot.id,
                    strategy_id = %strategy.id,
                    event_index,
                    stage = %claim.stage,
                    tail = claim.tail,
                    messenger = self.messenger.name(),
                    "Signal dispatched"
                );
            }
            Ok(delivery) => {
                warn!(
                    bot_id = %bot.id,
                    strategy_id = %strategy.id,
                    stage = %claim.stage,
                    detail = %delivery.detail,
                    "Signal not delivered"
                );
                outcome.detail = Some(delivery.detail);
                return outcome;
            }
            Err(err) => {
                warn!(
                    bot_id = %bot.id,
                    strategy_id = %strategy.id,
                    stage = %claim.stage,
                    error = %err,
                    "Signal hand-off failed"
                );
                outcome.detail = Some(err.to_string());
                return outcome;
            }
        }

        let game_data = json!({
            "event_index": event_index,
            "value": value,
            "tail": claim.tail,
            "need": strategy.need,
            "pattern": strategy.pattern,
            "confidence": confidence,
        });

        let recorded = self
            .store
            .record_signal(NewGameResult {
                strategy_id: strategy.id,
                stage: claim.stage,
                game_data: game_data.to_string(),
                signal_sent: true,
            })
            .await;

        match recorded {
            Ok(result) => {
                outcome.status = match claim.stage {
                    Stage::Pre => OutcomeStatus::Pre,
                    Stage::Confirmed => OutcomeStatus::Confirmed,
                };
                outcome.result_id = Some(result.id);
            }
            Err(err) => {
                warn!(
                    strategy_id = %strategy.id,
                    error = %err,
                    "Signal delivered but bookkeeping failed"
                );
                outcome.detail = Some(format!("delivered, but not recorded: {err}"));
            }
        }
        outcome
    }
}

#[async_trait]
impl SignalService for SignalDispatcher {
    #[instrument(skip(self, request), fields(bot_id = ?request.bot_id))]
    async fn ingest(&self, request: OutcomeRequest) -> Result<IngestReport> {
        let value = request.parse_value()?;
        let bot = self.resolve_bot(&request).await?;
        let credentials = bot.credentials().ok_or_else(|| {
            SignalError::NoEligibleBot(format!("bot {} has no messaging credentials", bot.id))
        })?;
        let strategies = self.store.active_strategies(bot.id).await?;
        let history_len = self.stats.len(&bot.game_type);
        let now = (self.clock)();

        let mut outcomes = Vec::new();
        let mut claims = Vec::new();

        let lane = self.state.lane(bot.id);
        let (event_index, buffer_len) = {
            let mut lane = lane.lock();
            lane.ring.push(value);
            let event_index = lane.counter.next();
            let buffer = lane.ring.tail();

            for strategy in strategies.iter().filter(|s| s.is_active) {
                if !in_window(strategy, now.time()) {
                    debug!(strategy_id = %strategy.id, "Outside active window");
                    continue;
                }

                let evaluation = matcher::evaluate(
                    &strategy.parsed_pattern(),
                    &buffer,
                    strategy.need,
                    self.settings.low_threshold,
                );

                for stage in evaluation.stages() {
                    if lane.ledger.claim(&strategy.pattern, stage, event_index) {
                        claims.push(Claim {
                            strategy,
                            stage,
                            tail: evaluation.tail,
                        });
                    } else {
                        debug!(
                            strategy_id = %strategy.id,
                            pattern = %strategy.pattern,
                            stage = %stage,
                            event_index,
                            "Stage already fired for this event"
                        );
                        outcomes.push(StrategyOutcome {
                            strategy_id: strategy.id,
                            name: strategy.name.clone(),
                            stage,
                            tail: evaluation.tail,
                            status: OutcomeStatus::Suppressed,
                            detail: None,
                            result_id: None,
                        });
                    }
                }
            }

            (event_index, buffer.len())
        };

        debug!(
            bot_id = %bot.id,
            event_index,
            value,
            buffer_len,
            claims = claims.len(),
            "Outcome buffered"
        );

        for claim in claims {
            let outcome = self
                .dispatch(
                    &bot,
                    &credentials,
                    claim,
                    event_index,
                    value,
                    history_len,
                    now,
                )
                .await;
            outcomes.push(outcome);
        }

        self.stats.record(
            &bot.game_type,
            HistoryEntry {
                bot_id: bot.id,
                event_index,
                value,
                recorded_at: Utc::now(),
            },
        );

        Ok(IngestReport {
            bot_id: bot.id,
            game_type: bot.game_type.clone(),
            event_index,
            value,
            buffer_len,
            outcomes,
        })
    }

    fn summary(&self, game_type: &str) -> StatsSummary {
        self.stats.summary(game_type)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::adapter::outbound::memory::MemoryStore;
    use crate::application::signal::scorer::TailScorer;
    use crate::domain::{BotId, NewBot, NewStrategy};
    use crate::port::outbound::store::{BotStore, StrategyStore};
    use crate::testkit::messenger::RecordingMessenger;

    struct Fixture {
        dispatcher: SignalDispatcher,
        messenger: Arc<RecordingMessenger>,
        store: Arc<MemoryStore>,
        bot: BotId,
    }

    async fn fixture(strategy: NewStrategy) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let bot = store
            .create_bot(NewBot {
                telegram_token: Some("123:abc".into()),
                telegram_chat_id: Some("-100".into()),
                ..NewBot::default()
            })
            .await
            .unwrap();
        store
            .create_strategy(NewStrategy {
                bot_id: bot.id,
                ..strategy
            })
            .await
            .unwrap();

        let messenger = Arc::new(RecordingMessenger::new());
        let dispatcher = SignalDispatcher::new(
            store.clone(),
            messenger.clone(),
            Arc::new(TailScorer),
            Arc::new(SignalState::default()),
            Arc::new(StatisticsAggregator::default()),
            DispatchSettings::default(),
        )
        .with_clock(Arc::new(|| Local.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()));

        Fixture {
            dispatcher,
            messenger,
            store,
            bot: bot.id,
        }
    }

    fn low_mults() -> NewStrategy {
        NewStrategy {
            bot_id: BotId::new(0),
            name: "Lows".into(),
            pattern: "low-mults".into(),
            need: 3,
            action: "enter 2.5x".into(),
            use_default_message: true,
            custom_message: None,
            start_time: None,
            end_time: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn invalid_payload_leaves_state_untouched() {
        let f = fixture(low_mults()).await;
        let request = OutcomeRequest {
            bot_id: Some(f.bot),
            game_type: None,
            value: json!("abc"),
        };
        let err = f.dispatcher.ingest(request).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_payload");
        assert_eq!(f.dispatcher.state().event_index(f.bot), 0);
        assert!(f.dispatcher.state().tail(f.bot).is_empty());
    }

    #[tokio::test]
    async fn unknown_game_type_has_no_eligible_bot() {
        let f = fixture(low_mults()).await;
        let err = f
            .dispatcher
            .ingest(OutcomeRequest::for_game("mines", 1.5))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "no_eligible_bot");
    }

    #[tokio::test]
    async fn missing_bot_id_is_not_found() {
        let f = fixture(low_mults()).await;
        let err = f
            .dispatcher
            .ingest(OutcomeRequest::for_bot(BotId::new(99), 1.5))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "config_not_found");
    }

    #[tokio::test]
    async fn pre_then_confirmed_then_confirmed_again() {
        let f = fixture(low_mults()).await;
        let mut reports = Vec::new();
        for v in [2.5, 1.9, 1.3, 1.7, 1.1] {
            reports.push(
                f.dispatcher
                    .ingest(OutcomeRequest::for_game("aviator", v))
                    .await
                    .unwrap(),
            );
        }

        assert!(reports[0].outcomes.is_empty());
        assert!(reports[1].outcomes.is_empty());
        assert_eq!(reports[2].event_index, 3);
        assert_eq!(reports[2].outcomes[0].status, OutcomeStatus::Pre);
        assert_eq!(reports[3].outcomes[0].status, OutcomeStatus::Confirmed);
        assert_eq!(reports[4].event_index, 5);
        assert_eq!(reports[4].outcomes[0].status, OutcomeStatus::Confirmed);
        assert_eq!(f.messenger.count(), 3);

        let strategy = f.store.active_strategies(f.bot).await.unwrap().remove(0);
        assert_eq!(strategy.counters.total_signals, 3);
    }

    #[tokio::test]
    async fn failed_hand_off_is_reported_per_strategy() {
        let f = fixture(NewStrategy {
            need: 1,
            ..low_mults()
        })
        .await;
        f.messenger.fail_next("chat not found");

        let report = f
            .dispatcher
            .ingest(OutcomeRequest::for_bot(f.bot, 1.2))
            .await
            .unwrap();
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].status, OutcomeStatus::Error);
        assert_eq!(report.outcomes[0].detail.as_deref(), Some("chat not found"));

        let strategy = f.store.active_strategies(f.bot).await.unwrap().remove(0);
        assert_eq!(strategy.counters.total_signals, 0);
    }

    #[tokio::test]
    async fn out_of_window_strategy_is_skipped() {
        let f = fixture(NewStrategy {
            need: 1,
            start_time: Some("22:00".into()),
            end_time: Some("06:00".into()),
            ..low_mults()
        })
        .await;
        let report = f
            .dispatcher
            .ingest(OutcomeRequest::for_bot(f.bot, 1.2))
            .await
            .unwrap();
        assert!(report.outcomes.is_empty());
        assert_eq!(report.event_index, 1);
    }

    #[tokio::test]
    async fn statistics_follow_ingestion() {
        let f = fixture(low_mults()).await;
        for v in [1.5, 3.0] {
            f.dispatcher
                .ingest(OutcomeRequest::for_bot(f.bot, v))
                .await
                .unwrap();
        }
        let summary = f.dispatcher.summary("aviator");
        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.recent[0].value, 3.0);
    }
}
