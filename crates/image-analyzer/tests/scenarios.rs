//! End-to-end flows across the sessions and the SQLite store.

use std::sync::Arc;
use std::time::Duration;

use analyzer_database::{history, Database, NewHistoryRecord};
use generation_core::{GenerationError, ImageInput};
use image_analyzer::{HistoryRepository, HistorySession, HistoryState, PromptSession, PromptState};
use mock_generator::ScriptedGenerator;
use tokio::sync::watch;

async fn test_db() -> Database {
    let db = Database::connect_with_pool_size("sqlite::memory:", 1)
        .await
        .unwrap();
    db.migrate().await.unwrap();
    db
}

fn image() -> ImageInput {
    ImageInput::new("image/png", vec![0x89, 0x50, 0x4e, 0x47])
}

/// Collect every state published until `done` returns true.
async fn record_until<T: Clone>(
    mut rx: watch::Receiver<T>,
    done: impl Fn(&T) -> bool,
) -> Vec<T> {
    let mut seen = vec![rx.borrow_and_update().clone()];
    while !done(seen.last().unwrap()) {
        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .expect("timed out waiting for state")
            .unwrap();
        seen.push(rx.borrow_and_update().clone());
    }
    seen
}

#[tokio::test]
async fn describe_success_scenario() {
    let db = test_db().await;
    let session = PromptSession::new(
        Arc::new(ScriptedGenerator::always_text("A cat.")),
        HistoryRepository::new(db.clone()),
    );

    let rx = session.subscribe();
    assert_eq!(*rx.borrow(), PromptState::Idle);

    let handle = session.submit(image(), "describe");
    let states = record_until(rx, |s| !matches!(s, PromptState::Idle | PromptState::Loading)).await;
    handle.await.unwrap();

    assert_eq!(
        states,
        vec![PromptState::Loading, PromptState::Success("A cat.".to_string())]
    );

    let rows = history::list_history(db.pool()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].prompt, "describe");
    assert_eq!(rows[0].response, "A cat.");
}

#[tokio::test]
async fn network_timeout_scenario() {
    let db = test_db().await;
    let session = PromptSession::new(
        Arc::new(ScriptedGenerator::always_error(GenerationError::Network(
            "timeout".to_string(),
        ))),
        HistoryRepository::new(db.clone()),
    );

    session.submit(image(), "describe").await.unwrap();

    assert_eq!(session.state(), PromptState::Error("timeout".to_string()));
    assert_eq!(history::count_history(db.pool()).await.unwrap(), 0);
}

#[tokio::test]
async fn history_ordering_scenario() {
    let db = test_db().await;
    for ts in [100, 300, 200] {
        history::insert_history(&db, &NewHistoryRecord::new("p", "r", ts))
            .await
            .unwrap();
    }

    let session = HistorySession::new(HistoryRepository::new(db));
    let states = record_until(session.subscribe(), |s| matches!(s, HistoryState::Success(_))).await;

    match states.last().unwrap() {
        HistoryState::Success(records) => {
            let timestamps: Vec<i64> = records.iter().map(|r| r.timestamp).collect();
            assert_eq!(timestamps, vec![300, 200, 100]);
        }
        other => panic!("unexpected state {:?}", other),
    }
}

#[tokio::test]
async fn prompt_results_appear_in_history_session() {
    let db = test_db().await;
    let repository = HistoryRepository::new(db.clone());
    let history_session = HistorySession::new(repository.clone());
    let mut history_rx = history_session.subscribe();
    history_rx
        .wait_for(|s| matches!(s, HistoryState::Success(r) if r.is_empty()))
        .await
        .unwrap();

    let prompt_session = PromptSession::new(
        Arc::new(ScriptedGenerator::always_text("A red bicycle.")),
        repository,
    );
    prompt_session.submit(image(), "what is this?").await.unwrap();

    let state = tokio::time::timeout(
        Duration::from_secs(5),
        history_rx.wait_for(|s| matches!(s, HistoryState::Success(r) if r.len() == 1)),
    )
    .await
    .unwrap()
    .unwrap()
    .clone();

    let HistoryState::Success(records) = state else {
        panic!("expected success");
    };
    assert_eq!(records[0].prompt, "what is this?");
    assert_eq!(records[0].response, "A red bicycle.");

    // Deleting through the session removes it from the next emission.
    history_session.delete_history_item(records[0].id).await;
    tokio::time::timeout(
        Duration::from_secs(5),
        history_rx.wait_for(|s| matches!(s, HistoryState::Success(r) if r.is_empty())),
    )
    .await
    .unwrap()
    .unwrap();
}
