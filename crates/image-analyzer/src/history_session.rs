//! History browsing session.

use std::sync::Arc;

use analyzer_database::HistoryRecord;
use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::repository::HistoryRepository;

/// Observable state of a [`HistorySession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryState {
    /// Waiting for the first snapshot.
    Loading,
    /// Latest snapshot, newest first.
    Success(Vec<HistoryRecord>),
    /// The live query or a delete failed.
    Error(String),
}

/// Mirrors the live history list and forwards delete requests.
///
/// The subscription starts on construction and runs until the live query
/// fails, the session is disposed, or the session is dropped.
pub struct HistorySession {
    repository: HistoryRepository,
    state: Arc<watch::Sender<HistoryState>>,
    cancel: CancellationToken,
    subscription: JoinHandle<()>,
}

impl HistorySession {
    /// Start a session. Must be called from within a Tokio runtime.
    pub fn new(repository: HistoryRepository) -> Self {
        Self::with_cancellation(repository, &CancellationToken::new())
    }

    /// Start a session that is also cancelled when `parent` is.
    pub fn with_cancellation(repository: HistoryRepository, parent: &CancellationToken) -> Self {
        let (state, _) = watch::channel(HistoryState::Loading);
        let state = Arc::new(state);
        let cancel = parent.child_token();

        let subscription = tokio::spawn(run_subscription(
            repository.clone(),
            Arc::clone(&state),
            cancel.clone(),
        ));

        Self {
            repository,
            state,
            cancel,
            subscription,
        }
    }

    /// Current state.
    pub fn state(&self) -> HistoryState {
        self.state.borrow().clone()
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<HistoryState> {
        self.state.subscribe()
    }

    /// Whether the live subscription has stopped.
    pub fn is_subscription_finished(&self) -> bool {
        self.subscription.is_finished()
    }

    /// Delete a history entry.
    ///
    /// On success nothing is published here; the live subscription emits the
    /// updated list. On failure the state becomes
    /// `Error("Failed to delete item: ...")` until the next emission.
    pub async fn delete_history_item(&self, id: i64) {
        if let Err(e) = self.repository.delete_history(id).await {
            warn!("Failed to delete history item {}: {}", id, e);
            self.state
                .send_replace(HistoryState::Error(format!("Failed to delete item: {}", e)));
        }
    }

    /// Stop the live subscription. Idempotent.
    pub fn dispose(&self) {
        if !self.cancel.is_cancelled() {
            debug!("Disposing history session");
            self.cancel.cancel();
        }
    }
}

impl Drop for HistorySession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_subscription(
    repository: HistoryRepository,
    state: Arc<watch::Sender<HistoryState>>,
    cancel: CancellationToken,
) {
    let mut live = repository.get_all_history();

    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => break,
            next = live.next() => next,
        };

        match next {
            Some(Ok(records)) => {
                debug!("History snapshot with {} entries", records.len());
                state.send_replace(HistoryState::Success(records));
            }
            Some(Err(e)) => {
                warn!("{}", e);
                state.send_replace(HistoryState::Error(e.to_string()));
                break;
            }
            None => break,
        }
    }

    debug!("History subscription ended");
}
