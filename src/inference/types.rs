//! Wire types for the `generateContent` request and response bodies.
//!
//! ```text
//! request:  {"contents": [{"role": "user", "parts": [{"text": "..."}]}]}
//! response: {"candidates": [{"content": {"parts": [{"text": "..."}]}}]}
//! ```
//!
//! Response fields are optional all the way down so that a body missing any
//! of them still deserializes and can be reported as "no content".

use serde::{Deserialize, Serialize};

use crate::core::session::{Role, Turn};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    User,
    Model,
}

impl From<Role> for WireRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => WireRole::User,
            Role::Model => WireRole::Model,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<WireRole>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl From<&Turn> for Content {
    fn from(turn: &Turn) -> Self {
        Content {
            role: Some(turn.role.into()),
            parts: vec![Part {
                text: Some(turn.text.clone()),
            }],
        }
    }
}

/// The request body.
#[derive(Serialize, Debug)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

impl GenerateRequest {
    pub fn from_turns(turns: &[Turn]) -> Self {
        Self {
            contents: turns.iter().map(Content::from).collect(),
        }
    }
}

/// Response-side content. The role is not needed and is not parsed, so an
/// unexpected role string cannot reject an otherwise usable reply.
#[derive(Deserialize, Debug, Default)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

/// The success response body.
#[derive(Deserialize, Debug, Default)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

impl GenerateResponse {
    /// `candidates[0].content.parts[0].text`, if every step is present.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

/// Error body returned with non-2xx statuses: `{"error": {"message": "..."}}`.
#[derive(Deserialize, Debug)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Deserialize, Debug)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: String,
}
