//! # Chat Session
//!
//! The conversation transcript for one widget lifetime. In-memory only.
//!
//! ```text
//! ChatSession
//! ├── turns: Vec<Turn>        // ordered, append-only except placeholder resolution
//! ├── context: Option<String> // hidden seed turn, re-applied on reset
//! ├── next_request: u64       // monotonic across resets
//! └── revision: u64           // bumped on every mutation
//! ```
//!
//! A submission appends two turns: the user's text and a placeholder tagged
//! with a fresh [`RequestId`]. The placeholder is the only turn that is ever
//! rewritten, and only by a resolution carrying the same id.

use std::fmt;

use chrono::{DateTime, Local};
use log::debug;

/// Text shown in the placeholder turn while a reply is outstanding.
pub const PLACEHOLDER_TEXT: &str = "Thinking...";

/// Identifies one outstanding completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Placeholder awaiting the reply for this request.
    Pending(RequestId),
    Complete,
    /// A failed completion; the text carries the diagnostic.
    Error,
}

/// One entry in the transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    /// False only for the seeded context turn.
    pub visible: bool,
    pub state: TurnState,
    pub at: DateTime<Local>,
}

impl Turn {
    fn new(role: Role, text: String, visible: bool, state: TurnState) -> Self {
        Self {
            role,
            text,
            visible,
            state,
            at: Local::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text.into(), true, TurnState::Complete)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text.into(), true, TurnState::Complete)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text.into(), true, TurnState::Error)
    }

    /// The hidden context turn seeded at session start.
    pub fn context(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text.into(), false, TurnState::Complete)
    }

    fn placeholder(id: RequestId) -> Self {
        Self::new(
            Role::Model,
            PLACEHOLDER_TEXT.to_string(),
            true,
            TurnState::Pending(id),
        )
    }

    pub fn is_error(&self) -> bool {
        self.state == TurnState::Error
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, TurnState::Pending(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Submitted text was empty or whitespace.
    EmptyTurn,
    /// A reply is still outstanding for this request.
    Busy(RequestId),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::EmptyTurn => write!(f, "cannot send an empty message"),
            SessionError::Busy(id) => write!(f, "still waiting for the reply to request {id}"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Outcome of [`ChatSession::resolve_placeholder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Resolved,
    /// No pending turn carries this id; the transcript was left untouched.
    Stale,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    turns: Vec<Turn>,
    context: Option<String>,
    next_request: u64,
    revision: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ChatSession {
    /// Creates a session, seeding a hidden context turn when `context` is given.
    pub fn new(context: Option<String>) -> Self {
        let mut session = Self {
            turns: Vec::new(),
            context,
            next_request: 1,
            revision: 0,
        };
        session.seed();
        session
    }

    fn seed(&mut self) {
        if let Some(context) = &self.context {
            self.turns.push(Turn::context(context.clone()));
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Turns the transcript view shows, in order.
    pub fn visible_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|turn| turn.visible)
    }

    /// Settled turns to send to the completion endpoint, hidden context included.
    pub fn payload(&self) -> Vec<Turn> {
        self.turns
            .iter()
            .filter(|turn| !turn.is_pending())
            .cloned()
            .collect()
    }

    /// The id of the outstanding request, if any.
    pub fn pending(&self) -> Option<RequestId> {
        self.turns.iter().rev().find_map(|turn| match turn.state {
            TurnState::Pending(id) => Some(id),
            _ => None,
        })
    }

    /// Changes every time the transcript is mutated.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Appends the user's turn followed by a placeholder for the reply.
    pub fn append_user_turn(&mut self, text: &str) -> Result<RequestId, SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyTurn);
        }
        if let Some(id) = self.pending() {
            return Err(SessionError::Busy(id));
        }

        let id = RequestId(self.next_request);
        self.next_request += 1;

        self.turns.push(Turn::user(text));
        self.turns.push(Turn::placeholder(id));
        self.revision += 1;
        debug!("Appended user turn, awaiting request {}", id);
        Ok(id)
    }

    /// Replaces the placeholder tagged `id` with the final reply.
    pub fn resolve_placeholder(&mut self, id: RequestId, text: &str, is_error: bool) -> Resolution {
        let Some(turn) = self
            .turns
            .iter_mut()
            .rev()
            .find(|turn| turn.state == TurnState::Pending(id))
        else {
            debug!("Dropping resolution for request {}: no matching placeholder", id);
            return Resolution::Stale;
        };

        *turn = if is_error {
            Turn::error(text)
        } else {
            Turn::model(text)
        };
        self.revision += 1;
        Resolution::Resolved
    }

    /// Starts a new conversation. Request ids keep counting so replies for
    /// the discarded conversation resolve as stale.
    pub fn reset(&mut self) {
        self.turns.clear();
        self.seed();
        self.revision += 1;
    }
}
