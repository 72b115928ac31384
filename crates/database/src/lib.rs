//! SQLite persistence layer for the image analyzer.
//!
//! This crate provides async database operations for prompt history and
//! user profiles using SQLx with SQLite. History reads can be observed as a
//! live query via [`history::watch_history`].
//!
//! # Example
//!
//! ```no_run
//! use database::{Database, NewHistoryRecord, history};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:image_analyzer.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Store a generation result
//!     let record = NewHistoryRecord::new("describe", "A cat.", 1_717_000_000_000);
//!     let id = history::insert_history(&db, &record).await?;
//!     println!("stored history entry {id}");
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod history;
pub mod models;
pub mod user;

pub use error::{DatabaseError, Result};
pub use models::{HistoryRecord, NewHistoryRecord, UserProfile};

use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::sync::watch;

/// Database connection wrapper.
///
/// Cloning is cheap; clones share the pool and the history change feed.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    history_changes: Arc<watch::Sender<u64>>,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 5;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/analyzer.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        let (history_changes, _) = watch::channel(0);

        Ok(Self {
            pool,
            history_changes: Arc::new(history_changes),
        })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    ///
    /// Any later query fails with a pool-closed error.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Subscribe to the history change counter.
    ///
    /// The value is bumped after every committed history mutation.
    pub fn subscribe_history_changes(&self) -> watch::Receiver<u64> {
        self.history_changes.subscribe()
    }

    pub(crate) fn notify_history_changed(&self) {
        self.history_changes.send_modify(|version| *version = version.wrapping_add(1));
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Database;

    /// In-memory database with migrations applied.
    ///
    /// A single connection keeps concurrent readers and writers from tripping
    /// over shared-cache table locks.
    pub async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::test_db;
    use super::*;

    #[tokio::test]
    async fn test_history_and_users_are_independent() {
        let db = test_db().await;

        let profile = UserProfile {
            uid: "uid-123".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            email: "alice@example.com".to_string(),
            phone_number: "+15551234567".to_string(),
            address: "1 Main St".to_string(),
        };
        user::upsert_user(db.pool(), &profile).await.unwrap();

        let id = history::insert_history(&db, &NewHistoryRecord::new("describe", "A cat.", 100))
            .await
            .unwrap();

        // Deleting the history entry leaves the profile alone
        assert!(history::delete_history(&db, id).await.unwrap());
        let fetched = user::get_user(db.pool(), &profile.uid).await.unwrap();
        assert_eq!(fetched, Some(profile.clone()));

        // And deleting the profile leaves history alone
        history::insert_history(&db, &NewHistoryRecord::new("again", "A dog.", 200))
            .await
            .unwrap();
        assert!(user::delete_user(db.pool(), &profile).await.unwrap());
        assert_eq!(history::count_history(db.pool()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_change_counter_bumps_on_mutation() {
        let db = test_db().await;
        let changes = db.subscribe_history_changes();
        let before = *changes.borrow();

        history::insert_history(&db, &NewHistoryRecord::new("p", "r", 1))
            .await
            .unwrap();

        assert!(changes.has_changed().unwrap());
        assert_eq!(*changes.borrow(), before + 1);
    }

    #[tokio::test]
    async fn test_closed_pool_reports_fault() {
        let db = test_db().await;
        db.close().await;

        let result = history::list_history(db.pool()).await;
        assert!(matches!(result, Err(DatabaseError::Sqlx(_))));
    }
}
