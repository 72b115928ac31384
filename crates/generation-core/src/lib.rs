//! Core trait and types for generation capabilities.
//!
//! A generation capability turns an image plus a text prompt into generated
//! text. This crate defines the shared interface consumed by the analyzer
//! sessions:
//!
//! - [`Generator`] - The trait every capability implements
//! - [`GenerationRequest`] / [`GenerationOutput`] - Input and output types
//! - [`ImageInput`] - The pixel buffer submitted alongside the prompt
//! - [`GenerationError`] - Error types for generation calls
//!
//! # Example
//!
//! ```rust
//! use generation_core::{Generator, GenerationError, GenerationOutput, GenerationRequest};
//! use async_trait::async_trait;
//!
//! struct Describer;
//!
//! #[async_trait]
//! impl Generator for Describer {
//!     async fn generate(
//!         &self,
//!         request: GenerationRequest,
//!     ) -> Result<GenerationOutput, GenerationError> {
//!         Ok(GenerationOutput::text(format!("{} bytes of image", request.image.len())))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Describer"
//!     }
//! }
//! ```

mod error;
mod request;
mod trait_def;

pub use error::GenerationError;
pub use request::{GenerationOutput, GenerationRequest, ImageInput};
pub use trait_def::Generator;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
