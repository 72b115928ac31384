//! The Generator trait definition.

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::request::{GenerationOutput, GenerationRequest};

/// A capability that produces text from an image and a prompt.
///
/// Implementations range from scripted test doubles to remote multimodal
/// models. This trait is object-safe and can be used with `Arc<dyn Generator>`.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate text for the given image and prompt.
    ///
    /// # Returns
    ///
    /// A `GenerationOutput` whose `text` may be absent when the capability
    /// produced nothing, or an error if the call failed.
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationOutput, GenerationError>;

    /// Get a human-readable name for this capability.
    fn name(&self) -> &str;

    /// Check if the capability is ready to accept requests.
    ///
    /// Default implementation always returns true.
    async fn is_ready(&self) -> bool {
        true
    }
}
