//! Configuration for the analyzer.

use std::env;

use analyzer_database::{Database, Result};

/// Default SQLite URL for the local store.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:image_analyzer.db?mode=rwc";

/// Default number of pooled connections.
const DEFAULT_POOL_SIZE: u32 = 5;

/// Configuration for the analyzer's local store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// SQLite connection URL.
    pub database_url: String,

    /// Maximum number of pooled connections.
    pub db_pool_size: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl AnalyzerConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `ANALYZER_DATABASE_URL` - SQLite URL (default: sqlite:image_analyzer.db?mode=rwc)
    /// - `ANALYZER_DB_POOL_SIZE` - Pool size (default: 5)
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let database_url = env::var("ANALYZER_DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let db_pool_size = env::var("ANALYZER_DB_POOL_SIZE")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_POOL_SIZE);

        Self {
            database_url,
            db_pool_size,
        }
    }

    /// Set the database URL.
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    /// Set the pool size. Zero is raised to one connection.
    pub fn with_pool_size(mut self, size: u32) -> Self {
        self.db_pool_size = size.max(1);
        self
    }

    /// Connect to the configured database and apply migrations.
    pub async fn open_database(&self) -> Result<Database> {
        let db = Database::connect_with_pool_size(&self.database_url, self.db_pool_size).await?;
        db.migrate().await?;
        Ok(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = AnalyzerConfig::default()
            .with_database_url("sqlite::memory:")
            .with_pool_size(1);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.db_pool_size, 1);
    }

    #[test]
    fn test_zero_pool_size_is_raised() {
        let config = AnalyzerConfig::default().with_pool_size(0);
        assert_eq!(config.db_pool_size, 1);
    }

    #[tokio::test]
    async fn test_open_in_memory_database() {
        let config = AnalyzerConfig::default()
            .with_database_url("sqlite::memory:")
            .with_pool_size(1);
        let db = config.open_database().await.unwrap();
        let count = analyzer_database::history::count_history(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
