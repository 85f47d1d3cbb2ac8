//! The `POST /api/chat` proxy handler.

use crate::client::{CerebrasClient, ChatMessage, SamplingParams};
use crate::postprocess::ResponsePostProcessor;
use crate::server::{HttpRequest, HttpResponse};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing::error;

pub struct ChatHandler {
    client: CerebrasClient,
    postprocessor: Box<dyn ResponsePostProcessor>,
}

impl ChatHandler {
    pub fn new(client: CerebrasClient, postprocessor: Box<dyn ResponsePostProcessor>) -> Self {
        Self {
            client,
            postprocessor,
        }
    }

    /// Proxy one chat request. Any failure (bad inbound JSON, missing
    /// field, transport error, unparseable upstream body) becomes a 500
    /// with `{"error": <message>}`.
    pub fn handle(&self, req: &HttpRequest) -> HttpResponse {
        match self.proxy(req) {
            Ok(body) => HttpResponse::new(200)
                .header("Content-Type", "application/json")
                .body(body),
            Err(err) => {
                error!(error = %err, "chat request failed");
                HttpResponse::json(500, &json!({ "error": format!("{err:#}") }))
            }
        }
    }

    fn proxy(&self, req: &HttpRequest) -> Result<String> {
        let body: Value =
            serde_json::from_slice(&req.body).context("invalid request body")?;
        let model = required_field(&body, "model")?;
        let system_prompt = required_field(&body, "system_prompt")?;
        let user_prompt = required_field(&body, "user_prompt")?;

        let messages = vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(user_prompt),
        ];
        let raw = self
            .client
            .chat_completions(model, messages, &SamplingParams::default())?;

        let mut response: Value =
            serde_json::from_str(&raw).context("invalid upstream response")?;
        match message_content(&response) {
            Some(content) => {
                let cleaned = self.postprocessor.process(content);
                response["choices"][0]["message"]["content"] = Value::String(cleaned);
                Ok(response.to_string())
            }
            // Unexpected shape (e.g. an upstream error object): pass it
            // through untouched, as the original server did.
            None => Ok(raw),
        }
    }
}

fn required_field<'a>(body: &'a Value, name: &str) -> Result<&'a str> {
    body.get(name)
        .and_then(Value::as_str)
        .with_context(|| format!("missing field '{name}'"))
}

fn message_content(response: &Value) -> Option<&str> {
    response
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
}
