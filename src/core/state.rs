//! # Application State
//!
//! Core business state for Medichat. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── provider: Arc<dyn CompletionProvider>  // completion endpoint client
//! ├── session: ChatSession                   // conversation transcript
//! ├── status_message: String                 // status bar text
//! └── endpoint_label: String                 // endpoint host, for display
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::core::config::ResolvedConfig;
use crate::core::session::ChatSession;
use crate::inference::CompletionProvider;

pub struct App {
    pub provider: Arc<dyn CompletionProvider>,
    pub session: ChatSession,
    pub status_message: String,
    pub endpoint_label: String,
}

impl App {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        context: Option<String>,
        endpoint_label: String,
    ) -> Self {
        Self {
            provider,
            session: ChatSession::new(context),
            status_message: String::from("Ask the clinic assistant anything."),
            endpoint_label,
        }
    }

    /// Builds the app from resolved configuration.
    pub fn from_config(provider: Arc<dyn CompletionProvider>, config: &ResolvedConfig) -> Self {
        Self::new(provider, config.context_prompt.clone(), config.endpoint_label())
    }

    /// True while a reply is outstanding.
    pub fn is_loading(&self) -> bool {
        self.session.pending().is_some()
    }
}
