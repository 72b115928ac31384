//! Prompt submission session.
//!
//! Drives one image+prompt generation at a time through
//! `Idle → Loading → Success | Error` and records successful results in the
//! history repository.

use std::sync::Arc;

use chrono::Utc;
use generation_core::{GenerationError, GenerationRequest, Generator, ImageInput};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::repository::HistoryRepository;

/// Message published when the generator returns no usable text.
pub const EMPTY_RESPONSE_MESSAGE: &str = "empty response";

/// Message published when a blank prompt is submitted.
pub const EMPTY_PROMPT_MESSAGE: &str = "Please enter a prompt";

/// Message published when the generator reports it cannot take requests.
pub const NOT_READY_MESSAGE: &str = "generator not ready";

/// Observable state of a [`PromptSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptState {
    /// Nothing submitted yet.
    Idle,
    /// A generation is in flight.
    Loading,
    /// The latest completed generation produced this text.
    Success(String),
    /// The latest completed generation failed with this message.
    Error(String),
}

impl PromptState {
    pub fn is_loading(&self) -> bool {
        matches!(self, PromptState::Loading)
    }
}

/// Submits images and prompts to a [`Generator`] and publishes the outcome.
///
/// Overlapping submissions are not serialized: whichever call completes last
/// determines the published state.
pub struct PromptSession {
    generator: Arc<dyn Generator>,
    history: HistoryRepository,
    state: Arc<watch::Sender<PromptState>>,
    cancel: CancellationToken,
}

impl PromptSession {
    /// Create a session with its own cancellation token.
    pub fn new(generator: Arc<dyn Generator>, history: HistoryRepository) -> Self {
        Self::with_cancellation(generator, history, &CancellationToken::new())
    }

    /// Create a session that is also cancelled when `parent` is.
    pub fn with_cancellation(
        generator: Arc<dyn Generator>,
        history: HistoryRepository,
        parent: &CancellationToken,
    ) -> Self {
        let (state, _) = watch::channel(PromptState::Idle);
        info!("Prompt session started with {}", generator.name());

        Self {
            generator,
            history,
            state: Arc::new(state),
            cancel: parent.child_token(),
        }
    }

    /// Current state.
    pub fn state(&self) -> PromptState {
        self.state.borrow().clone()
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<PromptState> {
        self.state.subscribe()
    }

    /// Token cancelled when this session is disposed.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Submit an image and prompt.
    ///
    /// The state switches to `Loading` before this returns. The returned
    /// handle completes once the outcome has been published and, on success,
    /// the history write has been attempted.
    ///
    /// A blank prompt never reaches the generator: the state becomes
    /// `Error(EMPTY_PROMPT_MESSAGE)` immediately.
    pub fn submit(&self, image: ImageInput, prompt: impl Into<String>) -> JoinHandle<()> {
        let request = GenerationRequest::new(image, prompt);
        if request.prompt.trim().is_empty() {
            warn!("Rejected blank prompt");
            self.state
                .send_replace(PromptState::Error(EMPTY_PROMPT_MESSAGE.to_string()));
            return tokio::spawn(std::future::ready(()));
        }

        debug!(
            "Submitting prompt ({} chars, {} image bytes)",
            request.prompt.len(),
            request.image.len()
        );
        self.state.send_replace(PromptState::Loading);

        tokio::spawn(run_submission(
            Arc::clone(&self.generator),
            self.history.clone(),
            Arc::clone(&self.state),
            self.cancel.clone(),
            request,
        ))
    }

    /// Cancel in-flight generations. Idempotent.
    pub fn dispose(&self) {
        if !self.cancel.is_cancelled() {
            debug!("Disposing prompt session");
            self.cancel.cancel();
        }
    }
}

impl Drop for PromptSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_submission(
    generator: Arc<dyn Generator>,
    history: HistoryRepository,
    state: Arc<watch::Sender<PromptState>>,
    cancel: CancellationToken,
    request: GenerationRequest,
) {
    let prompt = request.prompt.clone();

    let call = async {
        if !generator.is_ready().await {
            return Err(GenerationError::Unavailable(NOT_READY_MESSAGE.to_string()));
        }
        generator.generate(request).await
    };

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(GenerationError::Cancelled),
        result = call => result,
    };

    let output = match outcome {
        Ok(output) => output,
        Err(e) => {
            warn!("Generation failed: {}", e);
            state.send_replace(PromptState::Error(e.message()));
            return;
        }
    };

    let Some(text) = output.non_empty_text().map(str::to_string) else {
        warn!("Generator returned no text");
        state.send_replace(PromptState::Error(EMPTY_RESPONSE_MESSAGE.to_string()));
        return;
    };

    info!("Generated {} chars", text.len());
    state.send_replace(PromptState::Success(text.clone()));

    // The session has already committed to Success; a failed write is only logged.
    let timestamp = Utc::now().timestamp_millis();
    if let Err(e) = history.insert_history(&prompt, &text, timestamp).await {
        warn!("{}", e);
    }
}
