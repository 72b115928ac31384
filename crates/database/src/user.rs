//! User profile CRUD operations.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::UserProfile;

/// Insert a profile, or replace every field of the profile with the same uid.
pub async fn upsert_user(pool: &SqlitePool, profile: &UserProfile) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (uid, firstName, lastName, email, phoneNumber, address)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(uid) DO UPDATE SET
            firstName = excluded.firstName,
            lastName = excluded.lastName,
            email = excluded.email,
            phoneNumber = excluded.phoneNumber,
            address = excluded.address
        "#,
    )
    .bind(&profile.uid)
    .bind(&profile.first_name)
    .bind(&profile.last_name)
    .bind(&profile.email)
    .bind(&profile.phone_number)
    .bind(&profile.address)
    .execute(pool)
    .await?;

    tracing::debug!(uid = %profile.uid, "Stored user profile");
    Ok(())
}

/// Get a profile by uid.
pub async fn get_user(pool: &SqlitePool, uid: &str) -> Result<Option<UserProfile>> {
    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT uid, firstName, lastName, email, phoneNumber, address
        FROM users
        WHERE uid = ?
        "#,
    )
    .bind(uid)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

/// Delete a profile.
///
/// Matches on uid only. Returns true if a profile was deleted, false if none existed.
pub async fn delete_user(pool: &SqlitePool, profile: &UserProfile) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM users
        WHERE uid = ?
        "#,
    )
    .bind(&profile.uid)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
