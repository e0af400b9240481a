//! Streaming client for the hosted assistant backend. The backend answers
//! one POST per turn with newline-delimited JSON `StreamEvent`s; malformed
//! lines are skipped rather than failing the turn.

use crate::chat::reducer::StreamEvent;
use crate::chat::types::{Message, Role};
use anyhow::Result;
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use serde::Serialize;
use tokio_util::codec::{FramedRead, LinesCodec};

#[derive(Clone)]
pub struct AssistantClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

/// Prior-turn context sent to the backend. Tool payloads stay client-side;
/// the backend only needs the prose.
#[derive(Debug, Clone, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct TurnRequest {
    model: String,
    messages: Vec<WireMessage>,
}

impl AssistantClient {
    pub fn new(base_url: String, model: String, api_key: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
        }
    }

    /// Start a streaming turn. `history` already contains the new user
    /// message at its tail.
    pub async fn stream_turn(
        &self,
        history: &[Message],
    ) -> Result<impl Stream<Item = StreamEvent> + Send> {
        let wire: Vec<WireMessage> = history
            .iter()
            .map(|m| WireMessage {
                role: match m.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                content: m.text(),
            })
            .collect();
        tracing::info!(
            "assistant turn: model={}, history={} messages",
            self.model,
            wire.len()
        );

        let url = format!("{}/v1/chat/stream", self.base_url);
        let req = TurnRequest {
            model: self.model.clone(),
            messages: wire,
        };

        let mut rb = self.http.post(url).json(&req);
        if let Some(key) = &self.api_key {
            rb = rb.header("Authorization", format!("Bearer {}", key));
        }
        let resp = rb.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("assistant backend error ({}): {}", status, text);
        }

        let stream = resp
            .bytes_stream()
            .map(|item| item.map_err(std::io::Error::other));
        let reader = tokio_util::io::StreamReader::new(stream);
        let lines = FramedRead::new(reader, LinesCodec::new());

        // One JSON event per line; blank and unparseable lines are dropped.
        let events = lines.filter_map(|line_result| {
            let parsed = match line_result {
                Ok(line) if line.trim().is_empty() => None,
                Ok(line) => match serde_json::from_str::<StreamEvent>(line.trim()) {
                    Ok(event) => Some(event),
                    Err(e) => {
                        tracing::warn!("skipping malformed stream line: {}", e);
                        None
                    }
                },
                Err(e) => Some(StreamEvent::Error {
                    message: format!("stream error: {e}"),
                }),
            };
            futures_util::future::ready(parsed)
        });

        Ok(events)
    }
}
