//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored prompt/response pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct HistoryRecord {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Path of the analyzed image, if it was saved.
    pub image_path: Option<String>,
    /// Prompt supplied by the user.
    pub prompt: String,
    /// Text returned by the generator.
    pub response: String,
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
}

/// A history record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHistoryRecord {
    /// Explicit ID, or `None` to let SQLite assign one.
    pub id: Option<i64>,
    pub image_path: Option<String>,
    pub prompt: String,
    pub response: String,
    pub timestamp: i64,
}

impl NewHistoryRecord {
    /// Create a record with no image path and an auto-assigned ID.
    pub fn new(prompt: impl Into<String>, response: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: None,
            image_path: None,
            prompt: prompt.into(),
            response: response.into(),
            timestamp,
        }
    }

    /// Use an explicit ID instead of an auto-assigned one.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Record where the analyzed image was saved.
    pub fn with_image_path(mut self, path: impl Into<String>) -> Self {
        self.image_path = Some(path.into());
        self
    }
}

/// A locally stored profile, keyed by the identity provider's uid.
///
/// Column names follow the on-disk `users` schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    /// Identity provider uid.
    pub uid: String,
    #[sqlx(rename = "firstName")]
    pub first_name: String,
    #[sqlx(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    #[sqlx(rename = "phoneNumber")]
    pub phone_number: String,
    pub address: String,
}
