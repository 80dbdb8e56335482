//! SQLite configuration store behaviour against a real database file.

mod support;

use std::sync::Arc;

use roasbot::domain::{
    BotId, BotPatch, NewGameResult, Resolution, Stage, StrategyId, StrategyPatch,
};
use roasbot::error::Error;
use roasbot::port::outbound::store::{BotStore, GameResultStore, StrategyStore};
use roasbot::testkit::domain::{new_bot, new_strategy};
use support::db::TempDb;

fn result_for(strategy_id: StrategyId, stage: Stage) -> NewGameResult {
    NewGameResult {
        strategy_id,
        stage,
        game_data: r#"{"value":1.3}"#.to_string(),
        signal_sent: true,
    }
}

#[tokio::test]
async fn bots_round_trip_and_list_newest_first() {
    let db = TempDb::create("bots");
    let store = db.store();

    let first = store.create_bot(new_bot("first")).await.unwrap();
    let second = store.create_bot(new_bot("second")).await.unwrap();

    let loaded = store.get_bot(first.id).await.unwrap().unwrap();
    assert_eq!(loaded.name, "first");
    assert_eq!(loaded.game_type, "aviator");
    assert!(loaded.is_eligible());

    let names: Vec<_> = store
        .list_bots()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert_eq!(names, vec!["second", "first"]);
    assert!(second.id > first.id);
}

#[tokio::test]
async fn bot_patch_touches_only_given_fields() {
    let db = TempDb::create("bot-patch");
    let store = db.store();
    let bot = store.create_bot(new_bot("main")).await.unwrap();

    let updated = store
        .update_bot(
            bot.id,
            BotPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert!(!updated.is_active);
    assert_eq!(updated.name, "main");
    assert_eq!(updated.telegram_token, bot.telegram_token);
    assert!(store
        .update_bot(BotId::new(999), BotPatch::default())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn latest_eligible_bot_respects_game_type_and_activity() {
    let db = TempDb::create("eligible");
    let store = db.store();

    let aviator = store.create_bot(new_bot("aviator-old")).await.unwrap();
    let mut mines = new_bot("mines");
    mines.game_type = "mines".to_string();
    let mines = store.create_bot(mines).await.unwrap();
    let mut muted = new_bot("no-creds");
    muted.telegram_token = None;
    store.create_bot(muted).await.unwrap();

    let any = store.latest_eligible_bot(None).await.unwrap().unwrap();
    assert_eq!(any.id, mines.id);

    let by_game = store
        .latest_eligible_bot(Some("AVIATOR"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_game.id, aviator.id);

    store
        .update_bot(
            aviator.id,
            BotPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(store
        .latest_eligible_bot(Some("aviator"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn strategy_requires_existing_bot() {
    let db = TempDb::create("orphan");
    let store = db.store();

    let err = store
        .create_strategy(new_strategy(BotId::new(42)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { entity: "bot", id: 42 }));
}

#[tokio::test]
async fn active_strategies_are_oldest_first() {
    let db = TempDb::create("active");
    let store = db.store();
    let bot = store.create_bot(new_bot("main")).await.unwrap();

    let a = store.create_strategy(new_strategy(bot.id)).await.unwrap();
    let mut inactive = new_strategy(bot.id);
    inactive.is_active = false;
    store.create_strategy(inactive).await.unwrap();
    let c = store.create_strategy(new_strategy(bot.id)).await.unwrap();

    let active: Vec<_> = store
        .active_strategies(bot.id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(active, vec![a.id, c.id]);
    assert_eq!(store.list_strategies(bot.id).await.unwrap().len(), 3);
}

#[tokio::test]
async fn strategy_patch_and_counter_updates() {
    let db = TempDb::create("counters");
    let store = db.store();
    let bot = store.create_bot(new_bot("main")).await.unwrap();
    let strategy = store.create_strategy(new_strategy(bot.id)).await.unwrap();

    let patched = store
        .update_strategy(
            strategy.id,
            StrategyPatch {
                need: Some(5),
                start_time: Some("09:00".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(patched.need, 5);
    assert_eq!(patched.start_time.as_deref(), Some("09:00"));
    assert_eq!(patched.pattern, "low-mults");
    assert!(patched.updated_at >= strategy.updated_at);

    for stage in [Stage::Pre, Stage::Confirmed] {
        store.record_signal(result_for(strategy.id, stage)).await.unwrap();
    }
    let counted = store.get_strategy(strategy.id).await.unwrap().unwrap();
    assert_eq!(counted.counters.total_signals, 2);

    let reset = store.reset_counters(strategy.id).await.unwrap().unwrap();
    assert_eq!(reset.counters.total_signals, 0);
    assert_eq!(reset.need, 5);
}

#[tokio::test]
async fn resolving_updates_counters_once() {
    let db = TempDb::create("resolve");
    let store = db.store();
    let bot = store.create_bot(new_bot("main")).await.unwrap();
    let strategy = store.create_strategy(new_strategy(bot.id)).await.unwrap();

    let win = store
        .append_result(result_for(strategy.id, Stage::Confirmed))
        .await
        .unwrap();
    let loss = store
        .append_result(result_for(strategy.id, Stage::Confirmed))
        .await
        .unwrap();
    assert!(win.resolution.is_none());

    let resolved = store
        .resolve_result(win.id, Resolution::Win { gale: true })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.resolution, Some(Resolution::Win { gale: true }));
    assert!(resolved.resolved_at.is_some());
    store
        .resolve_result(loss.id, Resolution::Loss)
        .await
        .unwrap();

    let counters = store
        .get_strategy(strategy.id)
        .await
        .unwrap()
        .unwrap()
        .counters;
    assert_eq!(counters.wins, 1);
    assert_eq!(counters.wins_with_gale, 1);
    assert_eq!(counters.losses, 1);
    assert_eq!(counters.accuracy_percent(), 50);

    let again = store.resolve_result(win.id, Resolution::Loss).await;
    assert!(matches!(again, Err(Error::Validation(_))));
    assert!(store
        .resolve_result(9999, Resolution::Loss)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn recent_results_are_newest_first_and_limited() {
    let db = TempDb::create("recent");
    let store = db.store();
    let bot = store.create_bot(new_bot("main")).await.unwrap();
    let strategy = store.create_strategy(new_strategy(bot.id)).await.unwrap();

    let mut ids = Vec::new();
    for stage in [Stage::Pre, Stage::Confirmed, Stage::Confirmed] {
        ids.push(
            store
                .append_result(result_for(strategy.id, stage))
                .await
                .unwrap()
                .id,
        );
    }

    let recent = store.recent_results(strategy.id, 2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, ids[2]);
    assert_eq!(recent[1].id, ids[1]);
    assert_eq!(recent[1].stage, Stage::Confirmed);
}

#[tokio::test]
async fn deleting_a_bot_cascades_to_strategies_and_results() {
    let db = TempDb::create("cascade");
    let store = db.store();
    let bot = store.create_bot(new_bot("doomed")).await.unwrap();
    let keep = store.create_bot(new_bot("keeper")).await.unwrap();
    let strategy = store.create_strategy(new_strategy(bot.id)).await.unwrap();
    let kept_strategy = store.create_strategy(new_strategy(keep.id)).await.unwrap();
    let result = store
        .append_result(result_for(strategy.id, Stage::Pre))
        .await
        .unwrap();

    assert!(store.delete_bot(bot.id).await.unwrap());
    assert!(!store.delete_bot(bot.id).await.unwrap());

    assert!(store.get_bot(bot.id).await.unwrap().is_none());
    assert!(store.get_strategy(strategy.id).await.unwrap().is_none());
    assert!(store.get_result(result.id).await.unwrap().is_none());
    assert!(store.get_strategy(kept_strategy.id).await.unwrap().is_some());
}

/// Concurrent appends must each get back the row they inserted.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn append_returns_its_own_id_under_concurrency() {
    let db = TempDb::create("concurrent");
    let store = db.store();
    let bot = store.create_bot(new_bot("main")).await.unwrap();
    let strategy = store.create_strategy(new_strategy(bot.id)).await.unwrap();

    const TASKS: usize = 10;
    let mut handles = Vec::new();
    for i in 0..TASKS {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let appended = store
                .append_result(NewGameResult {
                    strategy_id: strategy.id,
                    stage: Stage::Confirmed,
                    game_data: format!(r#"{{"task":{i}}}"#),
                    signal_sent: true,
                })
                .await
                .unwrap();
            (i, appended)
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        let (i, appended) = handle.await.unwrap();
        assert_eq!(appended.game_data, format!(r#"{{"task":{i}}}"#));
        ids.push(appended.id);
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), TASKS);
}

#[tokio::test]
async fn recorded_signal_counts_and_appends_in_one_step() {
    let db = TempDb::create("record-signal");
    let store = db.store();
    let bot = store.create_bot(new_bot("main")).await.unwrap();
    let strategy = store.create_strategy(new_strategy(bot.id)).await.unwrap();

    let recorded = store
        .record_signal(result_for(strategy.id, Stage::Confirmed))
        .await
        .unwrap();
    assert!(recorded.signal_sent);
    let stored = store.get_strategy(strategy.id).await.unwrap().unwrap();
    assert_eq!(stored.counters.total_signals, 1);

    let err = store
        .record_signal(result_for(StrategyId::new(404), Stage::Confirmed))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::NotFound {
            entity: "strategy",
            id: 404
        }
    ));
    assert_eq!(store.recent_results(strategy.id, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn game_type_lookup_is_exact_not_a_pattern() {
    let db = TempDb::create("game-type-exact");
    let store = db.store();
    let bot = store.create_bot(new_bot("main")).await.unwrap();

    for wildcard in ["%", "_viator", "a%", "aviat_r", "avi%"] {
        let picked = store.latest_eligible_bot(Some(wildcard)).await.unwrap();
        assert!(picked.is_none(), "{wildcard:?} must not match");
    }

    let picked = store.latest_eligible_bot(Some("  AVIATOR ")).await.unwrap();
    assert_eq!(picked.map(|b| b.id), Some(bot.id));
}
