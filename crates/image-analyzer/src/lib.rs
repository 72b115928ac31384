//! Prompt and history sessions for the image analyzer.
//!
//! This crate coordinates an external generation capability with the local
//! SQLite store:
//!
//! - [`PromptSession`] submits an image and prompt, publishes
//!   `Idle → Loading → Success | Error`, and records successful results
//! - [`HistorySession`] mirrors the live history list and forwards deletes
//! - [`HistoryRepository`] wraps the store and turns faults into [`HistoryError`]
//! - [`AccountService`] registers users with an [`AuthProvider`] and keeps
//!   their profiles locally
//!
//! # Architecture
//!
//! ```text
//! submit(image, prompt)
//!          ↓
//! ┌────────────────────┐   generate()   ┌──────────────────┐
//! │   PromptSession    │ ─────────────→ │    Generator     │
//! └────────────────────┘                └──────────────────┘
//!          ↓ on success
//! ┌────────────────────┐                ┌──────────────────┐
//! │ HistoryRepository  │ ─────────────→ │ Database (SQLite)│
//! └────────────────────┘                └──────────────────┘
//!          ↑ live query                          │
//! ┌────────────────────┐                         │
//! │   HistorySession   │ ←───────────────────────┘
//! └────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use image_analyzer::{AnalyzerConfig, HistoryRepository, PromptSession, PromptState};
//! use generation_core::ImageInput;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = AnalyzerConfig::from_env().open_database().await?;
//!     let session = PromptSession::new(Arc::new(MyGenerator::new()), HistoryRepository::new(db));
//!
//!     let image = ImageInput::new("image/jpeg", std::fs::read("cat.jpg")?);
//!     session.submit(image, "What is in this picture?").await?;
//!
//!     if let PromptState::Success(text) = session.state() {
//!         println!("{text}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod account;
mod config;
mod error;
mod history_session;
mod prompt_session;
mod repository;

pub use account::{AccountService, AuthError, AuthProvider, SignUpForm};
pub use config::{AnalyzerConfig, DEFAULT_DATABASE_URL};
pub use error::{AccountError, HistoryError};
pub use history_session::{HistorySession, HistoryState};
pub use prompt_session::{
    PromptSession, PromptState, EMPTY_PROMPT_MESSAGE, EMPTY_RESPONSE_MESSAGE, NOT_READY_MESSAGE,
};
pub use repository::{HistoryRepository, HistoryStore};
