//! Per-game-type statistics as seen through the signal service.

use std::sync::Arc;

use roasbot::adapter::outbound::memory::MemoryStore;
use roasbot::domain::NewBot;
use roasbot::infrastructure::bootstrap::App;
use roasbot::infrastructure::config::settings::Config;
use roasbot::port::inbound::{OutcomeRequest, SignalService};
use roasbot::port::outbound::messenger::Messenger;
use roasbot::testkit::domain::new_bot;
use roasbot::testkit::messenger::RecordingMessenger;

fn app(history_capacity: usize, recent_limit: usize) -> App {
    let mut config = Config::default();
    config.statistics.history_capacity = history_capacity;
    config.statistics.recent_limit = recent_limit;
    App::with_parts(
        config,
        Arc::new(MemoryStore::new()),
        Arc::new(RecordingMessenger::new()) as Arc<dyn Messenger>,
    )
}

#[tokio::test]
async fn summary_keeps_newest_entries_within_capacity() {
    let app = app(4, 2);
    app.catalog.add_bot(new_bot("main")).await.unwrap();

    for value in [1.0, 2.0, 3.0, 4.0, 5.0, 6.0] {
        app.dispatcher
            .ingest(OutcomeRequest::for_game("aviator", value))
            .await
            .unwrap();
    }

    let summary = app.dispatcher.summary("aviator");
    assert_eq!(summary.total_count, 4);
    let recent: Vec<f64> = summary.recent.iter().map(|e| e.value).collect();
    assert_eq!(recent, vec![6.0, 5.0]);
    assert_eq!(summary.recent[0].event_index, 6);

    let distribution = summary.distribution.unwrap();
    assert!((distribution.min - 3.0).abs() < f64::EPSILON);
    assert!((distribution.max - 6.0).abs() < f64::EPSILON);
    assert!((distribution.mean - 4.5).abs() < f64::EPSILON);
    assert!(summary.last_update.is_some());
}

#[tokio::test]
async fn game_types_are_tracked_separately() {
    let app = app(100, 10);
    app.catalog.add_bot(new_bot("planes")).await.unwrap();
    app.catalog
        .add_bot(NewBot {
            game_type: "mines".to_string(),
            ..new_bot("gems")
        })
        .await
        .unwrap();

    app.dispatcher
        .ingest(OutcomeRequest::for_game("aviator", 1.5))
        .await
        .unwrap();
    app.dispatcher
        .ingest(OutcomeRequest::for_game("MINES", 3.0))
        .await
        .unwrap();
    app.dispatcher
        .ingest(OutcomeRequest::for_game("mines", 4.0))
        .await
        .unwrap();

    assert_eq!(app.dispatcher.summary("aviator").total_count, 1);
    assert_eq!(app.dispatcher.summary(" Mines ").total_count, 2);
}

#[tokio::test]
async fn rejected_events_are_not_recorded() {
    let app = app(100, 10);
    app.catalog.add_bot(new_bot("main")).await.unwrap();

    let mut request = OutcomeRequest::for_game("aviator", 1.0);
    request.value = serde_json::json!("not-a-number");
    let err = app.dispatcher.ingest(request).await.unwrap_err();
    assert_eq!(err.kind(), "invalid_payload");

    let err = app
        .dispatcher
        .ingest(OutcomeRequest::for_game("crash", 1.2))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "no_eligible_bot");

    assert_eq!(app.dispatcher.summary("aviator").total_count, 0);
    assert_eq!(app.dispatcher.summary("crash").total_count, 0);
}

#[test]
fn unknown_game_type_has_an_empty_summary() {
    let app = app(100, 10);
    let summary = tokio_test::block_on(async { app.dispatcher.summary("plinko") });

    assert_eq!(summary.game_type, "plinko");
    assert_eq!(summary.total_count, 0);
    assert!(summary.recent.is_empty());
    assert!(summary.last_update.is_none());
    assert!(summary.distribution.is_none());
}
