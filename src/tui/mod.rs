//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (reply pending, transcript easing to the bottom): draws
//!   every ~50ms.
//! - **Idle**: sleeps up to 500ms and only redraws on events.
//!
//! ## Background Requests
//!
//! Each `Effect::SpawnRequest` spawns one tokio task that sends exactly one
//! `Action::ResponseReady` back over a std channel. Requests are never
//! aborted; a reply that arrives after the conversation was reset is
//! discarded by the session as stale.

mod component;
pub mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::{ConfigError, ResolvedConfig};
use crate::core::generator;
use crate::core::session::RequestId;
use crate::core::state::App;
use crate::inference::{CompletionProvider, GeminiProvider, ProviderError};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, TranscriptState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub transcript: TranscriptState,
    pub input_box: InputBox,
    pub pulse_value: f32,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            transcript: TranscriptState::new(),
            input_box: InputBox::new(),
            pulse_value: 0.0,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape
        );
    }
}

/// Error raised before the terminal is taken over.
#[derive(Debug)]
pub enum StartupError {
    Config(ConfigError),
    Provider(ProviderError),
}

impl std::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupError::Config(e) => write!(f, "{e}"),
            StartupError::Provider(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for StartupError {}

/// Build the completion provider from resolved configuration.
pub fn build_provider(config: &ResolvedConfig) -> Result<Arc<dyn CompletionProvider>, StartupError> {
    let endpoint = config
        .endpoint_url
        .clone()
        .ok_or(StartupError::Config(ConfigError::MissingEndpoint))?;
    let provider = GeminiProvider::new(endpoint, Some(config.request_timeout))
        .map_err(StartupError::Provider)?;
    info!("Using {} provider at {}", provider.name(), provider.host());
    Ok(Arc::new(provider))
}

pub fn run(config: ResolvedConfig, provider: Arc<dyn CompletionProvider>) -> std::io::Result<()> {
    let mut app = App::from_config(provider, &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true;

    loop {
        let animating = app.is_loading() || tui.transcript.is_animating();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            tui.pulse_value = (elapsed * 5.0).sin() * 0.5 + 0.5;
            let spinner_frame = (elapsed * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain all pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                TuiEvent::Resize => {}
                TuiEvent::ForceQuit | TuiEvent::Quit => {
                    if update(&mut app, Action::Quit) == Effect::Quit {
                        should_quit = true;
                    }
                }
                TuiEvent::NewConversation => {
                    run_effect(&mut app, Action::NewConversation, &tx, &mut should_quit);
                }
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown => {
                    tui.transcript.handle_event(&event);
                }
                _ => {
                    tui.input_box.busy = app.is_loading();
                    if let Some(InputEvent::Submit(text)) = tui.input_box.handle_event(&event) {
                        run_effect(&mut app, Action::Submit(text), &tx, &mut should_quit);
                    }
                }
            }
        }

        if should_quit {
            break;
        }

        // Replies from background requests
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            run_effect(&mut app, action, &tx, &mut should_quit);
        }

        if should_quit {
            break;
        }
    }

    if app.is_loading() {
        info!("Quitting with a request in flight; its reply will be ignored");
    }

    ratatui::restore();
    Ok(())
}

/// Applies an action and carries out the effect it requests.
fn run_effect(app: &mut App, action: Action, tx: &mpsc::Sender<Action>, should_quit: &mut bool) {
    match update(app, action) {
        Effect::None => {}
        Effect::SpawnRequest(id) => spawn_request(app, id, tx.clone()),
        Effect::Quit => *should_quit = true,
    }
}

/// Sends the current transcript in the background. Exactly one
/// `Action::ResponseReady` tagged `request_id` comes back on `tx`.
fn spawn_request(app: &App, request_id: RequestId, tx: mpsc::Sender<Action>) {
    info!("Spawning request {}", request_id);

    let provider = app.provider.clone();
    let payload = app.session.payload();

    tokio::spawn(async move {
        let started = Instant::now();
        let reply = generator::respond_guarded(provider, payload).await;
        info!(
            "Request {} finished in {}ms (error={})",
            request_id,
            started.elapsed().as_millis(),
            reply.is_error
        );
        if tx.send(Action::ResponseReady { request_id, reply }).is_err() {
            warn!("Failed to deliver reply for request {}: receiver dropped", request_id);
        }
    });
}
