//! Request and response types for generation calls.

use serde::{Deserialize, Serialize};

/// An image submitted for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInput {
    /// MIME type of the encoded buffer (e.g., "image/jpeg").
    pub content_type: String,
    /// Encoded image bytes.
    pub data: Vec<u8>,
    /// Width in pixels, if known.
    pub width: Option<u32>,
    /// Height in pixels, if known.
    pub height: Option<u32>,
}

impl ImageInput {
    /// Create an image from an encoded buffer.
    pub fn new(content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            content_type: content_type.into(),
            data,
            width: None,
            height: None,
        }
    }

    /// Attach pixel dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Size of the encoded buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A single generation request: one image plus the user's prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub image: ImageInput,
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(image: ImageInput, prompt: impl Into<String>) -> Self {
        Self {
            image,
            prompt: prompt.into(),
        }
    }
}

/// The result of a generation call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationOutput {
    /// Generated text, absent if the capability returned no candidates.
    pub text: Option<String>,
}

impl GenerationOutput {
    /// Output carrying generated text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// Output with no text.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The generated text, if it contains anything besides whitespace.
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}
