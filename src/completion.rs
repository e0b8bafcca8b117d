//! Chat-completions HTTP gateway.
//!
//! Sends one POST per call to the configured endpoint with a bearer
//! token and a fixed timeout, and collapses every failure mode --
//! missing token, transport error, timeout, non-200 status, malformed
//! body -- into `None`. The distinguishing cause is logged where it is
//! observed; the caller only decides present vs absent. No retries:
//! retrying is a caller policy, not built in here.

use anyhow::Result;
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

use crate::config::CompletionConfig;
use crate::context::Turn;

/// Request body for the chat-completions endpoint.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
}

/// Client for a hosted chat-completions endpoint.
pub struct CompletionGateway {
    client: reqwest::Client,
    api_url: String,
    model: String,
    token: Option<String>,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
}

impl CompletionGateway {
    /// Build the gateway and its HTTP client with the fixed timeout.
    ///
    /// An absent or empty token is detected here, once: it is logged
    /// and every subsequent [`complete`](Self::complete) call returns
    /// `None` without a network round-trip.
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let token = config
            .api_token
            .clone()
            .filter(|token| !token.trim().is_empty());

        if token.is_none() {
            warn!("no API token configured; completion calls will be skipped");
        }

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            token,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
        })
    }

    /// Whether a credential is configured at all.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Request a completion for the given message sequence.
    ///
    /// Returns the first choice's message content, trimmed, or `None`
    /// on any failure.
    pub async fn complete(&self, messages: &[Turn]) -> Option<String> {
        let token = self.token.as_ref()?;

        let body = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!(url = %self.api_url, "completion request timed out");
                return None;
            }
            Err(e) => {
                warn!(url = %self.api_url, error = %e, "completion request failed");
                return None;
            }
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            warn!(%status, body = %text, "completion endpoint returned an error");
            return None;
        }

        let json: serde_json::Value = match response.json().await {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "completion response body was not valid JSON");
                return None;
            }
        };

        match extract_reply(&json) {
            Some(reply) => Some(reply),
            None => {
                warn!("completion response missing choices[0].message.content");
                None
            }
        }
    }
}

/// Pull `choices[0].message.content` out of a response body, trimmed.
fn extract_reply(json: &serde_json::Value) -> Option<String> {
    json.get("choices")?
        .as_array()?
        .first()?
        .get("message")?
        .get("content")?
        .as_str()
        .map(|s| s.trim().to_string())
}
