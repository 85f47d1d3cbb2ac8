//! Blocking client for the Cerebras chat-completions API.

use crate::sse;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::BufReader;
use std::time::Duration;

pub const DEFAULT_COMPLETIONS_URL: &str = "https://api.cerebras.ai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "qwen-3-32b";

/// One entry of the ordered `messages` array.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone)]
pub struct SamplingParams {
    pub temperature: f64,
    pub top_p: f64,
    pub max_completion_tokens: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            max_completion_tokens: 16382,
        }
    }
}

/// Wire payload for the completions endpoint. Constructed fresh per call,
/// never persisted.
#[derive(Debug, Serialize)]
pub struct ChatCompletionPayload {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub stream: bool,
    pub max_completion_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
}

impl ChatCompletionPayload {
    fn new(model: &str, messages: Vec<ChatMessage>, stream: bool, params: &SamplingParams) -> Self {
        Self {
            messages,
            model: model.to_string(),
            stream,
            max_completion_tokens: params.max_completion_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
        }
    }
}

/// Authenticated client for the completions endpoint.
///
/// Calls block the current thread for the full round trip, bounded by the
/// configured timeout. Inside the server every call occupies one pool
/// worker; a slow upstream can pin all of them until the timeout fires
/// while the listener keeps accepting into the queue.
pub struct CerebrasClient {
    http: reqwest::blocking::Client,
    url: String,
    api_key: String,
}

impl CerebrasClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            url: DEFAULT_COMPLETIONS_URL.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Point the client at a different completions endpoint (tests).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    fn post(&self, payload: &ChatCompletionPayload) -> Result<reqwest::blocking::Response> {
        self.http
            .post(&self.url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .context("upstream request failed")
    }

    /// Buffered mode: block until the full response body arrives and return
    /// it raw. The body is returned regardless of the upstream HTTP status;
    /// upstream error objects pass through for the caller to surface.
    /// Single attempt, no retries.
    pub fn chat_completions(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        params: &SamplingParams,
    ) -> Result<String> {
        let payload = ChatCompletionPayload::new(model, messages, false, params);
        self.post(&payload)?
            .text()
            .context("failed to read upstream response body")
    }

    /// Streaming mode: decode the `text/event-stream` body as it arrives,
    /// handing each content fragment to `sink`.
    pub fn stream_chat_completions<F: FnMut(&str)>(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        params: &SamplingParams,
        sink: F,
    ) -> Result<()> {
        let payload = ChatCompletionPayload::new(model, messages, true, params);
        let response = self.post(&payload)?;
        sse::decode_stream(BufReader::new(response), sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let payload = ChatCompletionPayload::new(
            "qwen-3-32b",
            vec![ChatMessage::system("s"), ChatMessage::user("u")],
            false,
            &SamplingParams::default(),
        );
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["model"], "qwen-3-32b");
        assert_eq!(value["stream"], false);
        assert_eq!(value["max_completion_tokens"], 16382);
        assert_eq!(value["temperature"], 0.7);
        assert_eq!(value["top_p"], 0.95);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["messages"][1]["content"], "u");
    }
}
