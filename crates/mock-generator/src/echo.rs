//! Echo generator - returns the prompt as the generated text.

use async_trait::async_trait;
use generation_core::{GenerationError, GenerationOutput, GenerationRequest, Generator};

/// A simple generator that echoes the prompt back.
///
/// Useful for exercising the submit flow without any model behind it.
#[derive(Debug, Clone, Default)]
pub struct EchoGenerator {
    /// Optional prefix to add before the echo.
    prefix: Option<String>,
}

impl EchoGenerator {
    /// Create a new EchoGenerator with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new EchoGenerator with a custom prefix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mock_generator::EchoGenerator;
    ///
    /// let generator = EchoGenerator::with_prefix("Seen: ");
    /// // Will respond with "Seen: <prompt>"
    /// ```
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationOutput, GenerationError> {
        let text = match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, request.prompt),
            None => request.prompt,
        };

        Ok(GenerationOutput::text(text))
    }

    fn name(&self) -> &str {
        "EchoGenerator"
    }
}
