//! Prompt history persistence.
//!
//! Mutations take a [`Database`] rather than a bare pool so they can notify
//! live queries opened with [`watch_history`].

use futures::stream::{self, BoxStream, StreamExt};
use sqlx::SqlitePool;
use tokio::sync::watch;

use crate::error::{DatabaseError, Result};
use crate::models::{HistoryRecord, NewHistoryRecord};
use crate::Database;

/// Insert a history record and return its ID.
///
/// A record without an explicit ID gets a fresh one from SQLite.
pub async fn insert_history(db: &Database, record: &NewHistoryRecord) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO history (id, image_path, prompt, response, timestamp)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id)
    .bind(&record.image_path)
    .bind(&record.prompt)
    .bind(&record.response)
    .bind(record.timestamp)
    .execute(db.pool())
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "HistoryRecord",
                    id: record.id.map(|id| id.to_string()).unwrap_or_default(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    let id = result.last_insert_rowid();
    tracing::debug!(id, "Inserted history record");
    db.notify_history_changed();

    Ok(id)
}

/// List all history records, newest first.
pub async fn list_history(pool: &SqlitePool) -> Result<Vec<HistoryRecord>> {
    let rows = sqlx::query_as::<_, HistoryRecord>(
        r#"
        SELECT id, image_path, prompt, response, timestamp
        FROM history
        ORDER BY timestamp DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Get a single history record by ID.
pub async fn get_history(pool: &SqlitePool, id: i64) -> Result<Option<HistoryRecord>> {
    let record = sqlx::query_as::<_, HistoryRecord>(
        r#"
        SELECT id, image_path, prompt, response, timestamp
        FROM history
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Delete a history record by ID.
///
/// Returns true if a record was deleted, false if none existed.
pub async fn delete_history(db: &Database, id: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM history
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(db.pool())
    .await?;

    let deleted = result.rows_affected() > 0;
    if deleted {
        db.notify_history_changed();
    }

    Ok(deleted)
}

/// Count stored history records.
pub async fn count_history(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM history
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Open a live query over the history table.
///
/// The stream yields the current snapshot immediately, then a fresh snapshot
/// after each committed history mutation. Bursts of mutations may collapse
/// into a single snapshot. A failed query is yielded once as `Err` and ends
/// the stream; subscribe again to restart.
pub fn watch_history(db: &Database) -> BoxStream<'static, Result<Vec<HistoryRecord>>> {
    let pool = db.pool().clone();
    let changes = db.subscribe_history_changes();

    stream::unfold(Some((pool, changes, true)), next_snapshot).boxed()
}

type WatchState = Option<(SqlitePool, watch::Receiver<u64>, bool)>;

async fn next_snapshot(state: WatchState) -> Option<(Result<Vec<HistoryRecord>>, WatchState)> {
    let (pool, mut changes, first) = state?;

    if first {
        changes.borrow_and_update();
    } else if changes.changed().await.is_err() {
        // Every Database handle is gone.
        return None;
    }

    match list_history(&pool).await {
        Ok(rows) => Some((Ok(rows), Some((pool, changes, false)))),
        Err(e) => {
            tracing::warn!("History live query failed: {}", e);
            Some((Err(e), None))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_support::test_db;

    fn timestamps(rows: &[HistoryRecord]) -> Vec<i64> {
        rows.iter().map(|r| r.timestamp).collect()
    }

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let db = test_db().await;

        let first = insert_history(&db, &NewHistoryRecord::new("a", "1", 10))
            .await
            .unwrap();
        let second = insert_history(&db, &NewHistoryRecord::new("b", "2", 20))
            .await
            .unwrap();
        assert_ne!(first, second);

        let fetched = get_history(db.pool(), second).await.unwrap().unwrap();
        assert_eq!(fetched.prompt, "b");
        assert_eq!(fetched.response, "2");
        assert!(fetched.image_path.is_none());
    }

    #[tokio::test]
    async fn test_insert_with_explicit_id() {
        let db = test_db().await;

        let record = NewHistoryRecord::new("p", "r", 5)
            .with_id(42)
            .with_image_path("/tmp/cat.jpg");
        let id = insert_history(&db, &record).await.unwrap();
        assert_eq!(id, 42);

        let fetched = get_history(db.pool(), 42).await.unwrap().unwrap();
        assert_eq!(fetched.image_path.as_deref(), Some("/tmp/cat.jpg"));

        // Reusing the ID is rejected
        let result = insert_history(&db, &record).await;
        assert!(matches!(result, Err(DatabaseError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_prompt() {
        let db = test_db().await;
        let mut changes = db.subscribe_history_changes();

        let result = insert_history(&db, &NewHistoryRecord::new("  \t", "A cat.", 10)).await;
        assert!(matches!(result, Err(DatabaseError::Sqlx(_))));

        assert_eq!(count_history(db.pool()).await.unwrap(), 0);
        assert!(!changes.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_list_orders_by_timestamp_desc() {
        let db = test_db().await;

        for ts in [100, 300, 200] {
            insert_history(&db, &NewHistoryRecord::new("p", "r", ts))
                .await
                .unwrap();
        }

        let rows = list_history(db.pool()).await.unwrap();
        assert_eq!(timestamps(&rows), vec![300, 200, 100]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let db = test_db().await;
        insert_history(&db, &NewHistoryRecord::new("p", "r", 1))
            .await
            .unwrap();
        let before = list_history(db.pool()).await.unwrap();

        let deleted = delete_history(&db, 9999).await.unwrap();
        assert!(!deleted);

        let after = list_history(db.pool()).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_delete_removes_only_target() {
        let db = test_db().await;
        let keep = insert_history(&db, &NewHistoryRecord::new("keep", "r", 1))
            .await
            .unwrap();
        let removed = insert_history(&db, &NewHistoryRecord::new("drop", "r", 2))
            .await
            .unwrap();

        assert!(delete_history(&db, removed).await.unwrap());

        let rows = list_history(db.pool()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, keep);
    }

    #[tokio::test]
    async fn test_watch_emits_current_then_updates() {
        let db = test_db().await;
        insert_history(&db, &NewHistoryRecord::new("old", "r", 100))
            .await
            .unwrap();

        let mut live = watch_history(&db);

        let initial = live.next().await.unwrap().unwrap();
        assert_eq!(timestamps(&initial), vec![100]);

        insert_history(&db, &NewHistoryRecord::new("new", "r", 500))
            .await
            .unwrap();
        let updated = live.next().await.unwrap().unwrap();
        assert_eq!(timestamps(&updated), vec![500, 100]);
        assert_eq!(updated[0].prompt, "new");

        delete_history(&db, updated[1].id).await.unwrap();
        let after_delete = live.next().await.unwrap().unwrap();
        assert_eq!(timestamps(&after_delete), vec![500]);
    }

    #[tokio::test]
    async fn test_watch_ignores_noop_delete() {
        let db = test_db().await;
        let mut live = watch_history(&db);
        assert!(live.next().await.unwrap().unwrap().is_empty());

        delete_history(&db, 12345).await.unwrap();

        let next = tokio::time::timeout(Duration::from_millis(50), live.next()).await;
        assert!(next.is_err(), "no snapshot expected after a no-op delete");
    }

    #[tokio::test]
    async fn test_watch_is_restartable() {
        let db = test_db().await;
        insert_history(&db, &NewHistoryRecord::new("p", "r", 1))
            .await
            .unwrap();

        let mut first = watch_history(&db);
        assert_eq!(first.next().await.unwrap().unwrap().len(), 1);
        drop(first);

        let mut second = watch_history(&db);
        assert_eq!(second.next().await.unwrap().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_watch_fault_ends_stream() {
        let db = test_db().await;
        let mut live = watch_history(&db);
        live.next().await.unwrap().unwrap();

        db.close().await;
        db.notify_history_changed();

        let fault = live.next().await.unwrap();
        assert!(fault.is_err());
        assert!(live.next().await.is_none());
    }
}
