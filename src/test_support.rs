//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::inference::{CompletionProvider, CompletionRequest, ProviderError};

/// A provider that replays canned outcomes in order, then reports no content.
pub struct ScriptedProvider {
    outcomes: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: AtomicUsize,
    last_turn_count: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(outcomes: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicUsize::new(0),
            last_turn_count: AtomicUsize::new(0),
        }
    }

    pub fn ok(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn err(error: ProviderError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_turn_count(&self) -> usize {
        self.last_turn_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_turn_count
            .store(request.turns.len(), Ordering::SeqCst);
        self.outcomes
            .lock()
            .expect("scripted provider lock poisoned")
            .pop_front()
            .unwrap_or(Err(ProviderError::EmptyContent))
    }
}

/// A provider whose every call panics.
pub struct PanickingProvider;

#[async_trait]
impl CompletionProvider for PanickingProvider {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn complete(&self, _request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        panic!("provider exploded");
    }
}

/// Creates a test App with a provider that answers "ok" once.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(
        Arc::new(ScriptedProvider::ok("ok")),
        Some("You are the clinic assistant.".to_string()),
        "test-endpoint".to_string(),
    )
}
