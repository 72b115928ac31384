//! Account registration, login, and local profiles.

use std::sync::Arc;

use analyzer_database::{user, Database, UserProfile};
use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::error::AccountError;

const FILL_ALL_FIELDS: &str = "Please fill all fields";
const PASSWORDS_DONT_MATCH: &str = "Passwords don't match";
const SIGN_UP_FAILED: &str = "Sign up failed";
const LOGIN_FAILED: &str = "Login failed";
const LOGOUT_FAILED: &str = "Logout failed";

/// Failure reported by an identity provider, optionally with a description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .message.as_deref().unwrap_or("authentication failed"))]
pub struct AuthError {
    pub message: Option<String>,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

/// External email/password identity provider.
///
/// Issues the opaque, stable uid that local profiles are keyed by.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Register a new account and return its uid.
    async fn create_account(&self, email: &str, password: &str) -> Result<String, AuthError>;

    /// Sign in to an existing account and return its uid.
    async fn sign_in(&self, email: &str, password: &str) -> Result<String, AuthError>;

    /// End the current session, if any.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Uid of the signed-in account, if any.
    async fn current_uid(&self) -> Option<String>;
}

fn auth_failure(error: AuthError, fallback: &str) -> AccountError {
    AccountError::Auth(error.message.unwrap_or_else(|| fallback.to_string()))
}

/// Fields collected by the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    fn validate(&self) -> Result<(), AccountError> {
        let required = [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.password,
            &self.confirm_password,
            &self.phone_number,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(AccountError::Validation(FILL_ALL_FIELDS.to_string()));
        }
        if self.password != self.confirm_password {
            return Err(AccountError::Validation(PASSWORDS_DONT_MATCH.to_string()));
        }
        Ok(())
    }

    fn into_profile(self, uid: String) -> UserProfile {
        UserProfile {
            uid,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            address: self.address,
        }
    }
}

/// Coordinates the identity provider with local profile storage.
#[derive(Clone)]
pub struct AccountService {
    auth: Arc<dyn AuthProvider>,
    db: Database,
}

impl AccountService {
    pub fn new(auth: Arc<dyn AuthProvider>, db: Database) -> Self {
        Self { auth, db }
    }

    /// Register an account and store its profile.
    ///
    /// An existing profile with the same uid is replaced wholesale.
    pub async fn sign_up(&self, form: SignUpForm) -> Result<UserProfile, AccountError> {
        form.validate()?;

        let uid = self
            .auth
            .create_account(&form.email, &form.password)
            .await
            .map_err(|e| auth_failure(e, SIGN_UP_FAILED))?;

        let profile = form.into_profile(uid);
        user::upsert_user(self.db.pool(), &profile).await?;
        info!(uid = %profile.uid, "Registered account");

        Ok(profile)
    }

    /// Sign in and return the account's uid.
    pub async fn log_in(&self, email: &str, password: &str) -> Result<String, AccountError> {
        if email.trim().is_empty() || password.trim().is_empty() {
            return Err(AccountError::Validation(FILL_ALL_FIELDS.to_string()));
        }

        let uid = self
            .auth
            .sign_in(email, password)
            .await
            .map_err(|e| auth_failure(e, LOGIN_FAILED))?;

        info!(%uid, "Signed in");
        Ok(uid)
    }

    /// Sign out of the current account.
    pub async fn log_out(&self) -> Result<(), AccountError> {
        self.auth
            .sign_out()
            .await
            .map_err(|e| auth_failure(e, LOGOUT_FAILED))?;

        info!("Signed out");
        Ok(())
    }

    /// Stored profile of the signed-in account.
    ///
    /// `None` when nobody is signed in or the account has no local profile.
    pub async fn current_profile(&self) -> Result<Option<UserProfile>, AccountError> {
        match self.auth.current_uid().await {
            Some(uid) => self.profile(&uid).await,
            None => Ok(None),
        }
    }

    /// Look up the stored profile for a uid.
    pub async fn profile(&self, uid: &str) -> Result<Option<UserProfile>, AccountError> {
        Ok(user::get_user(self.db.pool(), uid).await?)
    }

    /// Remove a stored profile. Returns false if none existed.
    pub async fn delete_profile(&self, profile: &UserProfile) -> Result<bool, AccountError> {
        Ok(user::delete_user(self.db.pool(), profile).await?)
    }
}
