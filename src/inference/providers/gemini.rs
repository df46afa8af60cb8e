//! Provider for the `generateContent` REST endpoint.
//!
//! One non-streaming POST per request. The endpoint URL is taken verbatim
//! from configuration (it typically carries the model name and API key), so
//! it is never written to the log or into error messages.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::inference::types::{ErrorEnvelope, GenerateRequest, GenerateResponse};
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError};

pub struct GeminiProvider {
    endpoint: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Creates a provider posting to `endpoint`.
    ///
    /// # Arguments
    /// * `endpoint` - Full URL of the completion endpoint
    /// * `timeout` - Optional per-request timeout
    pub fn new(endpoint: String, timeout: Option<Duration>) -> Result<Self, ProviderError> {
        let parsed = reqwest::Url::parse(&endpoint)
            .map_err(|e| ProviderError::Config(format!("invalid endpoint URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProviderError::Config(format!(
                "unsupported endpoint scheme '{}'",
                parsed.scheme()
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::Config(e.to_string()))?;

        Ok(Self { endpoint, client })
    }

    /// Host part of the endpoint, safe to display.
    pub fn host(&self) -> String {
        endpoint_host(&self.endpoint)
    }
}

/// Host of `url` without path or query, or "unknown endpoint".
pub fn endpoint_host(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| match u.port() {
            Some(port) => format!("{h}:{port}"),
            None => h.to_string(),
        }))
        .unwrap_or_else(|| "unknown endpoint".to_string())
}

/// Maps a transport error to the message shown to the user.
fn network_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        return ProviderError::Network("Request timed out".to_string());
    }
    ProviderError::Network(e.without_url().to_string())
}

/// Pulls `error.message` out of an error body, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let body = GenerateRequest::from_turns(request.turns);
        let json_body = serde_json::to_string(&body)
            .map_err(|e| ProviderError::Config(format!("request serialization failed: {e}")))?;

        info!(
            "generateContent request: host={}, contents={}, bytes={}",
            self.host(),
            body.contents.len(),
            json_body.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .body(json_body)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        debug!("generateContent response status: {}", status);

        let text = response.text().await.map_err(network_error)?;

        if !status.is_success() {
            let message = api_error_message(&text);
            warn!("generateContent error: {} - {}", status.as_u16(), message);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::Parse(e.to_string()))?;

        match parsed.first_text() {
            Some(reply) => {
                info!("generateContent reply: {} bytes", reply.len());
                Ok(reply.to_string())
            }
            None => {
                warn!("generateContent response had no candidate content");
                debug!("Response body: {}", text);
                Err(ProviderError::EmptyContent)
            }
        }
    }
}
