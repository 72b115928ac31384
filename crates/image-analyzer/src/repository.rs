//! History repository over the local store.

use std::sync::Arc;

use analyzer_database::{history, Database, HistoryRecord, NewHistoryRecord};
use async_trait::async_trait;
use futures::future;
use futures::stream::{BoxStream, StreamExt};

use crate::error::HistoryError;

/// Storage operations the history repository relies on.
///
/// Implemented for [`Database`]; tests substitute stores that fail on demand.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Store a record and return its ID.
    async fn insert_history(&self, record: NewHistoryRecord) -> analyzer_database::Result<i64>;

    /// Live query of all records, newest first.
    fn watch_history(&self) -> BoxStream<'static, analyzer_database::Result<Vec<HistoryRecord>>>;

    /// Delete a record. Returns whether a record was removed.
    async fn delete_history(&self, id: i64) -> analyzer_database::Result<bool>;
}

#[async_trait]
impl HistoryStore for Database {
    async fn insert_history(&self, record: NewHistoryRecord) -> analyzer_database::Result<i64> {
        history::insert_history(self, &record).await
    }

    fn watch_history(&self) -> BoxStream<'static, analyzer_database::Result<Vec<HistoryRecord>>> {
        history::watch_history(self)
    }

    async fn delete_history(&self, id: i64) -> analyzer_database::Result<bool> {
        history::delete_history(self, id).await
    }
}

/// Thin adapter over a [`HistoryStore`] that turns storage faults into
/// [`HistoryError`]s.
#[derive(Clone)]
pub struct HistoryRepository {
    store: Arc<dyn HistoryStore>,
}

impl HistoryRepository {
    pub fn new(store: impl HistoryStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Share an existing store.
    pub fn from_arc(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// Store a prompt/response pair created at `timestamp` (epoch millis).
    pub async fn insert_history(
        &self,
        prompt: &str,
        response: &str,
        timestamp: i64,
    ) -> Result<i64, HistoryError> {
        self.store
            .insert_history(NewHistoryRecord::new(prompt, response, timestamp))
            .await
            .map_err(HistoryError::Insert)
    }

    /// Live history, newest first.
    ///
    /// A storage fault is yielded once as [`HistoryError::Load`] and ends the
    /// stream, even if the underlying store would keep going.
    pub fn get_all_history(&self) -> BoxStream<'static, Result<Vec<HistoryRecord>, HistoryError>> {
        self.store
            .watch_history()
            .scan(false, |failed, item| {
                if *failed {
                    return future::ready(None);
                }
                let item = item.map_err(HistoryError::Load);
                *failed = item.is_err();
                future::ready(Some(item))
            })
            .boxed()
    }

    /// Delete a record. Deleting an unknown ID succeeds without effect.
    pub async fn delete_history(&self, id: i64) -> Result<(), HistoryError> {
        self.store
            .delete_history(id)
            .await
            .map(|_| ())
            .map_err(HistoryError::Delete)
    }
}
