//! Scripted generator - replays canned outcomes in order.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use generation_core::{GenerationError, GenerationOutput, GenerationRequest, Generator};
use tokio::sync::Mutex;

type Outcome = Result<GenerationOutput, GenerationError>;

/// A generator that returns pre-programmed outcomes.
///
/// Outcomes queued with [`push`](Self::push) are consumed one per call. Once
/// the queue is drained, every call returns the fallback outcome. Readiness
/// can be toggled with [`set_ready`](Self::set_ready).
pub struct ScriptedGenerator {
    queue: Mutex<VecDeque<Outcome>>,
    fallback: Outcome,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    ready: AtomicBool,
}

impl ScriptedGenerator {
    /// Create a generator that always returns `fallback`.
    pub fn new(fallback: Outcome) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            ready: AtomicBool::new(true),
        }
    }

    /// Always succeed with the given text.
    pub fn always_text(text: impl Into<String>) -> Self {
        Self::new(Ok(GenerationOutput::text(text)))
    }

    /// Always fail with the given error.
    pub fn always_error(error: GenerationError) -> Self {
        Self::new(Err(error))
    }

    /// Always succeed but with no text.
    pub fn always_empty() -> Self {
        Self::new(Ok(GenerationOutput::empty()))
    }

    /// Queue an outcome ahead of the fallback.
    pub async fn push(&self, outcome: Outcome) {
        self.queue.lock().await.push_back(outcome);
    }

    /// Number of `generate` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Set what [`Generator::is_ready`] reports.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Prompts received, in call order.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationOutput, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().await.push(request.prompt);

        match self.queue.lock().await.pop_front() {
            Some(outcome) => outcome,
            None => self.fallback.clone(),
        }
    }

    fn name(&self) -> &str {
        "ScriptedGenerator"
    }

    async fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}
