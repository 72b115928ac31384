//! Delayed generator - wraps another generator with artificial delay.

use std::time::Duration;

use generation_core::{async_trait, GenerationError, GenerationOutput, GenerationRequest, Generator};
use tokio::time::sleep;

/// A generator that wraps another generator and adds artificial delay.
///
/// Useful for testing overlapping submissions and cancellation.
pub struct DelayedGenerator<G: Generator> {
    inner: G,
    delay: Duration,
}

impl<G: Generator> DelayedGenerator<G> {
    /// Create a new DelayedGenerator wrapping the given generator with the specified delay.
    pub fn new(inner: G, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a generator with a delay in milliseconds.
    pub fn with_millis(inner: G, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    /// Create a generator with a delay in seconds.
    pub fn with_secs(inner: G, secs: u64) -> Self {
        Self::new(inner, Duration::from_secs(secs))
    }
}

#[async_trait]
impl<G: Generator> Generator for DelayedGenerator<G> {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationOutput, GenerationError> {
        sleep(self.delay).await;
        self.inner.generate(request).await
    }

    fn name(&self) -> &str {
        "DelayedGenerator"
    }

    async fn is_ready(&self) -> bool {
        self.inner.is_ready().await
    }
}
