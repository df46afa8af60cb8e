use std::fmt;

use async_trait::async_trait;

use crate::core::session::Turn;

/// Message shown when a successful response carries no usable text.
pub const NO_CONTENT_MESSAGE: &str = "No content returned from the API";

/// Errors that can occur during provider operations.
///
/// `Display` yields the text shown in the transcript's error turn, so
/// transport messages pass through verbatim.
#[derive(Debug)]
pub enum ProviderError {
    /// Provider misconfigured (bad URL, client could not be built).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Endpoint answered with a non-2xx status.
    Api { status: u16, message: String },
    /// Response body was not the JSON we expected.
    Parse(String),
    /// Response parsed but had no `candidates[0].content` text.
    EmptyContent,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "configuration error: {msg}"),
            ProviderError::Network(msg) => write!(f, "{msg}"),
            ProviderError::Api { status, message } if message.is_empty() => {
                write!(f, "Request failed (HTTP {status})")
            }
            ProviderError::Api { status, message } => write!(f, "{message} (HTTP {status})"),
            ProviderError::Parse(msg) => write!(f, "Could not read the API response: {msg}"),
            ProviderError::EmptyContent => write!(f, "{NO_CONTENT_MESSAGE}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Everything a provider needs to fulfill a completion request.
pub struct CompletionRequest<'a> {
    /// Settled transcript turns, hidden context included.
    pub turns: &'a [Turn],
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Sends the transcript and returns the raw reply text.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_displays_raw_message() {
        let e = ProviderError::Network("Failed to fetch".to_string());
        assert_eq!(e.to_string(), "Failed to fetch");
    }

    #[test]
    fn test_api_error_display_includes_status() {
        let e = ProviderError::Api {
            status: 403,
            message: "Permission denied".to_string(),
        };
        assert_eq!(e.to_string(), "Permission denied (HTTP 403)");

        let bare = ProviderError::Api {
            status: 502,
            message: String::new(),
        };
        assert_eq!(bare.to_string(), "Request failed (HTTP 502)");
    }

    #[test]
    fn test_empty_content_display() {
        assert_eq!(ProviderError::EmptyContent.to_string(), NO_CONTENT_MESSAGE);
    }
}
