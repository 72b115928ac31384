//! Mock generation capabilities.
//!
//! This crate provides mock implementations of the `Generator` trait for
//! testing:
//! - `EchoGenerator` - Returns the prompt back as the generated text
//! - `ScriptedGenerator` - Replays a queue of canned outcomes
//! - `DelayedGenerator` - Wraps another generator with artificial delay
//!
//! # Example
//!
//! ```rust
//! use mock_generator::{Generator, GenerationRequest, ImageInput, ScriptedGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_generator::GenerationError> {
//!     let generator = ScriptedGenerator::always_text("A cat.");
//!
//!     let request = GenerationRequest::new(ImageInput::new("image/png", vec![0; 4]), "describe");
//!
//!     let output = generator.generate(request).await?;
//!     assert_eq!(output.text.as_deref(), Some("A cat."));
//!     Ok(())
//! }
//! ```

mod delayed;
mod echo;
mod scripted;

// Re-export generation-core types for convenience
pub use generation_core::{
    async_trait, GenerationError, GenerationOutput, GenerationRequest, Generator, ImageInput,
};

pub use delayed::DelayedGenerator;
pub use echo::EchoGenerator;
pub use scripted::ScriptedGenerator;
