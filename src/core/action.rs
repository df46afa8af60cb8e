//! # Actions
//!
//! Everything that can happen in Medichat becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The endpoint answers? That's `Action::ResponseReady { request_id, reply }`.
//!
//! `update()` applies an action to the state and returns an `Effect` for the
//! event loop to carry out. No I/O here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info};

use crate::core::generator::Reply;
use crate::core::session::{RequestId, Resolution, SessionError};
use crate::core::state::App;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The user submitted text from the input box.
    Submit(String),
    /// A background request finished.
    ResponseReady { request_id: RequestId, reply: Reply },
    /// Discard the transcript and start over.
    NewConversation,
    Quit,
}

/// Side effects requested by `update`, performed by the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Send the current transcript; the reply must resolve this request.
    SpawnRequest(RequestId),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => match app.session.append_user_turn(&text) {
            Ok(id) => {
                info!("Submitted user turn, request {}", id);
                app.status_message = String::from("Waiting for a reply...");
                Effect::SpawnRequest(id)
            }
            Err(SessionError::EmptyTurn) => Effect::None,
            Err(e @ SessionError::Busy(_)) => {
                debug!("Submit ignored: {}", e);
                app.status_message = String::from("Please wait for the current reply.");
                Effect::None
            }
        },
        Action::ResponseReady { request_id, reply } => {
            match app
                .session
                .resolve_placeholder(request_id, &reply.text, reply.is_error)
            {
                Resolution::Resolved => {
                    app.status_message = if reply.is_error {
                        String::from("The last request failed.")
                    } else {
                        String::from("Ready")
                    };
                }
                Resolution::Stale => {
                    info!("Discarded stale reply for request {}", request_id);
                }
            }
            Effect::None
        }
        Action::NewConversation => {
            if app.is_loading() {
                info!("New conversation while a request is pending; its reply will be dropped");
            }
            app.session.reset();
            app.status_message = String::from("Started a new conversation.");
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}
