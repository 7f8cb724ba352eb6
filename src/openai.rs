//! # openai: chat-completions backend for the review conversation
//!
//! Implements [`Conversation`](crate::contract::Conversation) against an
//! OpenAI-compatible chat-completions endpoint. The full exchange history is
//! kept client-side and resent with every prompt, so each follow-up sees
//! everything before it. Replies are streamed as server-sent events and
//! surfaced fragment by fragment through the caller's `on_chunk` callback.
//!
//! Credentials come from the environment (`OPENAI_API_KEY`, optional
//! `OPENAI_BASE_URL`) and are read at the first submission rather than at
//! construction, so runs that never reach the model need no key.

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::contract::{Conversation, ConversationError, UsageRecord};

/// Chat models accepted for `--model`.
pub const AVAILABLE_MODELS: &[&str] = &[
    "gpt-4o-mini",
    "gpt-4o",
    "gpt-4.1-mini",
    "gpt-4.1",
    "o4-mini",
];

pub fn available_models() -> Vec<&'static str> {
    AVAILABLE_MODELS.to_vec()
}

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// One event parsed from a line of the chat-completions SSE stream.
#[derive(Debug, Default, PartialEq)]
pub struct StreamEvent {
    /// Reply text carried by this chunk, if any.
    pub delta: Option<String>,
    /// Usage totals, present on the final accounting chunk.
    pub usage: Option<UsageRecord>,
    /// True for the `[DONE]` sentinel.
    pub done: bool,
}

#[derive(Deserialize)]
struct ChunkPayload {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    usage: Option<UsageRecord>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Deserialize, Default)]
struct ChunkDelta {
    content: Option<String>,
}

/// Parses one SSE line from the stream. Returns `None` for blank lines,
/// comments, non-data fields and payloads this client cannot decode.
pub fn parse_stream_line(line: &str) -> Option<StreamEvent> {
    let data = line.strip_prefix("data:")?.trim();
    if data == "[DONE]" {
        return Some(StreamEvent {
            done: true,
            ..StreamEvent::default()
        });
    }
    match serde_json::from_str::<ChunkPayload>(data) {
        Ok(payload) => Some(StreamEvent {
            delta: payload
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.content),
            usage: payload.usage,
            done: false,
        }),
        Err(e) => {
            warn!(error = ?e, "Skipping malformed stream payload");
            None
        }
    }
}

/// Splits one `\n`-terminated line off the front of `pending`, if present.
fn take_line(pending: &mut Vec<u8>) -> Option<String> {
    let pos = pending.iter().position(|b| *b == b'\n')?;
    let raw: Vec<u8> = pending.drain(..=pos).collect();
    let mut line = String::from_utf8_lossy(&raw).into_owned();
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Some(line)
}

/// A single model conversation backed by the chat-completions API.
pub struct OpenAiConversation {
    client: reqwest::Client,
    model: String,
    messages: Vec<ChatMessage>,
    usage: Vec<UsageRecord>,
}

impl OpenAiConversation {
    /// Opens a conversation for `model`, seeded with the system instruction
    /// to answer in Markdown.
    pub fn new(model: impl Into<String>) -> Self {
        let model = model.into();
        info!(model = %model, "Opening model conversation");
        Self {
            client: reqwest::Client::new(),
            model,
            messages: vec![ChatMessage {
                role: "system",
                content: "Output markdown".to_string(),
            }],
            usage: Vec::new(),
        }
    }

    fn credentials() -> Result<(String, String), ConversationError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|e| {
            error!(error = ?e, "OPENAI_API_KEY missing in environment");
            "OPENAI_API_KEY environment variable not set"
        })?;
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok((api_key, base_url))
    }
}

#[async_trait]
impl Conversation for OpenAiConversation {
    async fn send(
        &mut self,
        prompt: &str,
        on_chunk: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<String, ConversationError> {
        let (api_key, base_url) = Self::credentials()?;
        self.messages.push(ChatMessage {
            role: "user",
            content: prompt.to_string(),
        });

        let body = serde_json::json!({
            "model": self.model,
            "messages": self.messages,
            "stream": true,
            "stream_options": { "include_usage": true },
        });

        debug!(
            model = %self.model,
            history_len = self.messages.len(),
            "Submitting prompt"
        );
        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                base_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to reach chat completions endpoint");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to decode response body>"));
            error!(status = %status, "Chat completions returned an error: {text}");
            return Err(format!("model call failed ({status}): {text}").into());
        }

        let mut stream = response.bytes_stream();
        let mut pending: Vec<u8> = Vec::new();
        let mut reply = String::new();
        'read: while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| {
                error!(error = ?e, "Stream interrupted mid-reply");
                e
            })?;
            pending.extend_from_slice(&bytes);
            while let Some(line) = take_line(&mut pending) {
                if let Some(event) = parse_stream_line(&line) {
                    if let Some(delta) = event.delta {
                        on_chunk(&delta);
                        reply.push_str(&delta);
                    }
                    if let Some(usage) = event.usage {
                        self.usage.push(usage);
                    }
                    if event.done {
                        break 'read;
                    }
                }
            }
        }

        info!(reply_chars = reply.len(), "Reply complete");
        self.messages.push(ChatMessage {
            role: "assistant",
            content: reply.clone(),
        });
        Ok(reply)
    }

    fn usage(&self) -> Vec<UsageRecord> {
        self.usage.clone()
    }
}
