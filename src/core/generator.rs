//! # Response Generation
//!
//! Turns a transcript into exactly one [`Reply`]. Every provider outcome
//! (success, error status, malformed body, transport failure, even a panic
//! inside the provider) becomes a reply, so the placeholder waiting on the
//! request is always resolved.

use std::sync::Arc;

use log::warn;

use crate::core::session::Turn;
use crate::inference::{CompletionProvider, CompletionRequest, NO_CONTENT_MESSAGE};

/// The final text for a placeholder turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub is_error: bool,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Removes Markdown bold markers: `**text**` becomes `text`.
///
/// Pairs are matched left to right, shortest first, and never across a
/// line break. An unpaired `**` is kept as is.
pub fn strip_bold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        match after.find("**") {
            Some(end) if !after[..end].contains('\n') => {
                out.push_str(&rest[..start]);
                out.push_str(&after[..end]);
                rest = &after[end + 2..];
            }
            _ => {
                out.push_str(&rest[..start + 2]);
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Cleans raw model output for display.
pub fn clean_reply(raw: &str) -> String {
    strip_bold(raw).trim().to_string()
}

/// Sends `turns` to the provider and converts the outcome into a reply.
pub async fn respond(provider: &dyn CompletionProvider, turns: &[Turn]) -> Reply {
    let request = CompletionRequest { turns };
    match provider.complete(request).await {
        Ok(raw) => {
            let text = clean_reply(&raw);
            if text.is_empty() {
                warn!("{} returned a blank reply", provider.name());
                return Reply::error(NO_CONTENT_MESSAGE);
            }
            Reply::text(text)
        }
        Err(e) => {
            warn!("{} request failed: {:?}", provider.name(), e);
            Reply::error(e.to_string())
        }
    }
}

/// Like [`respond`], but isolated in its own task: a panic in the provider
/// still yields an error reply.
pub async fn respond_guarded(provider: Arc<dyn CompletionProvider>, turns: Vec<Turn>) -> Reply {
    let task = tokio::spawn(async move { respond(provider.as_ref(), &turns).await });
    match task.await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Completion task aborted: {}", e);
            Reply::error(format!("Unexpected error while generating a reply: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::ProviderError;
    use crate::test_support::{PanickingProvider, ScriptedProvider};

    macro_rules! test_strip_bold_rules {
        ( $($name:ident: $input:expr => $expected:expr,)+ ) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(strip_bold($input), $expected);
                }
            )+
        };
    }

    test_strip_bold_rules! {
        test_strip_bold_leading: "**bold** and plain" => "bold and plain",
        test_strip_bold_multiple: "**a** b **c**" => "a b c",
        test_strip_bold_no_markers: "plain text" => "plain text",
        test_strip_bold_unpaired: "2 ** 3" => "2 ** 3",
        test_strip_bold_empty_pair: "x****y" => "xy",
        test_strip_bold_keeps_single_stars: "*italic* **bold**" => "*italic* bold",
        test_strip_bold_triple_stars: "***x***" => "*x*",
        test_strip_bold_not_across_lines: "**open\nclose** and **done**" => "**open\nclose and done**",
        test_strip_bold_unicode: "**héllo** wörld" => "héllo wörld",
    }

    #[test]
    fn test_clean_reply_trims() {
        assert_eq!(clean_reply("\n  **Hi** there \n"), "Hi there");
    }

    #[tokio::test]
    async fn test_respond_success_strips_and_trims() {
        let provider = ScriptedProvider::ok("  **bold** and plain\n");
        let reply = respond(&provider, &[Turn::user("hi")]).await;
        assert_eq!(reply, Reply::text("bold and plain"));
    }

    #[tokio::test]
    async fn test_respond_network_error_passes_message_through() {
        let provider = ScriptedProvider::err(ProviderError::Network("Failed to fetch".to_string()));
        let reply = respond(&provider, &[Turn::user("hi")]).await;
        assert_eq!(reply, Reply::error("Failed to fetch"));
    }

    #[tokio::test]
    async fn test_respond_empty_content_is_error() {
        let provider = ScriptedProvider::err(ProviderError::EmptyContent);
        let reply = respond(&provider, &[Turn::user("hi")]).await;
        assert!(reply.is_error);
        assert_eq!(reply.text, NO_CONTENT_MESSAGE);
    }

    #[tokio::test]
    async fn test_respond_blank_reply_is_error() {
        for raw in ["", "  \n ", "****"] {
            let provider = ScriptedProvider::ok(raw);
            let reply = respond(&provider, &[Turn::user("hi")]).await;
            assert_eq!(reply, Reply::error(NO_CONTENT_MESSAGE), "raw reply {raw:?}");
        }
    }

    #[tokio::test]
    async fn test_respond_sends_every_turn() {
        let provider = ScriptedProvider::ok("ok");
        let turns = vec![Turn::context("hidden"), Turn::user("hi")];
        respond(&provider, &turns).await;
        assert_eq!(provider.calls(), 1);
        assert_eq!(provider.last_turn_count(), 2);
    }

    #[tokio::test]
    async fn test_respond_guarded_recovers_from_panic() {
        let reply = respond_guarded(Arc::new(PanickingProvider), vec![Turn::user("hi")]).await;
        assert!(reply.is_error);
        assert!(reply.text.starts_with("Unexpected error"));
    }

    #[tokio::test]
    async fn test_respond_guarded_passes_success_through() {
        let reply = respond_guarded(Arc::new(ScriptedProvider::ok("Paris")), vec![Turn::user("q")]).await;
        assert_eq!(reply, Reply::text("Paris"));
    }
}
