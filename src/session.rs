//! The per-conversation turn driver: send / stop / status plumbing over
//! the streaming backend, the event fold into the message list, and the
//! broadcast fan-out both surfaces subscribe to.

use crate::assistant::AssistantClient;
use crate::chat::compose::{compose_message, RenderBlock, Surface};
use crate::chat::reducer::{apply_event, StreamEvent};
use crate::chat::types::{ChatStatus, Message, Role, ToolName};
use crate::config::AgentIdentity;
use crate::places::PlacesClient;
use crate::store::ConversationStore;
use crate::widgets::places::PlacesSeed;
use anyhow::Result;
use futures_util::StreamExt;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Fan-out event for subscribed surfaces. Web clients fold the raw stream
/// events themselves; the TUI refetches composed blocks on any event.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SessionEvent {
    Status { status: ChatStatus },
    Stream {
        message_id: String,
        event: StreamEvent,
    },
    Cleared,
}

/// One assistant or user message, composed for a surface.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedMessage {
    pub id: String,
    pub role: Role,
    pub blocks: Vec<RenderBlock>,
}

struct SessionInner {
    messages: Vec<Message>,
    status: ChatStatus,
    turn: Option<JoinHandle<()>>,
    store: ConversationStore,
}

/// Shared conversation session. Cheap to clone; all clones point at the
/// same conversation.
#[derive(Clone)]
pub struct ChatSession {
    inner: Arc<Mutex<SessionInner>>,
    events_tx: broadcast::Sender<SessionEvent>,
    assistant: AssistantClient,
    places: PlacesClient,
    agent: AgentIdentity,
}

/// Canned shortcuts surfaced next to the input box.
pub const QUICK_REPLIES: &[&str] = &[
    "What would the property transfer tax be on an $850k home?",
    "Show me the mortgage calculator",
    "What's Kitsilano like?",
    "I'd like to book a viewing",
];

impl ChatSession {
    pub fn new(
        store: ConversationStore,
        assistant: AssistantClient,
        places: PlacesClient,
        agent: AgentIdentity,
    ) -> Self {
        let messages = store.load();
        info!("restored {} messages from history", messages.len());
        let (events_tx, _) = broadcast::channel(256);
        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                messages,
                status: ChatStatus::Idle,
                turn: None,
                store,
            })),
            events_tx,
            assistant,
            places,
            agent,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events_tx.subscribe()
    }

    pub async fn status(&self) -> ChatStatus {
        self.inner.lock().await.status
    }

    /// Send visitor input and start a streaming assistant turn. Only one
    /// turn runs at a time.
    pub async fn send(&self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            anyhow::bail!("message is empty");
        }
        let history = {
            let mut inner = self.inner.lock().await;
            if inner.status != ChatStatus::Idle {
                anyhow::bail!("a turn is already in flight");
            }
            inner.messages.push(Message::user(text));
            inner.store.save(&inner.messages);
            inner.status = ChatStatus::Submitted;
            inner.messages.clone()
        };
        self.broadcast(SessionEvent::Status {
            status: ChatStatus::Submitted,
        });

        let session = self.clone();
        let handle = tokio::spawn(async move {
            session.run_turn(history).await;
        });
        self.inner.lock().await.turn = Some(handle);
        Ok(())
    }

    async fn run_turn(&self, history: Vec<Message>) {
        let stream = match self.assistant.stream_turn(&history).await {
            Ok(s) => s,
            Err(e) => {
                // Transport failure: prior messages stay visible, status
                // reverts, the visitor may simply send again.
                warn!("assistant turn failed to start: {}", e);
                self.finish_turn().await;
                return;
            }
        };
        tokio::pin!(stream);

        let message_id = {
            let mut inner = self.inner.lock().await;
            let message = Message::assistant();
            let id = message.id.clone();
            inner.messages.push(message);
            inner.status = ChatStatus::Streaming;
            id
        };
        self.broadcast(SessionEvent::Status {
            status: ChatStatus::Streaming,
        });

        while let Some(event) = stream.next().await {
            if let StreamEvent::Error { message } = &event {
                warn!("assistant stream error: {}", message);
            }
            if event.is_terminal() {
                break;
            }

            // The places lookup is ours: when its input completes, run the
            // external search and fold the output back in as an event.
            // Other ready parts of the message keep rendering meanwhile.
            let followup = match &event {
                StreamEvent::ToolInputAvailable {
                    call_id,
                    tool: ToolName::NearbyPlaces,
                    input,
                } => Some((call_id.clone(), input.clone())),
                _ => None,
            };

            self.apply_and_broadcast(&message_id, event).await;

            if let Some((call_id, input)) = followup {
                let seed: PlacesSeed = serde_json::from_value(input).unwrap_or_default();
                let query = seed.query.as_deref().unwrap_or("nearby");
                let slug = seed
                    .neighbourhood
                    .as_deref()
                    .map(|n| n.to_lowercase().replace(' ', "-"));
                let output = self.places.lookup(query, slug.as_deref()).await;
                self.apply_and_broadcast(
                    &message_id,
                    StreamEvent::ToolOutputAvailable { call_id, output },
                )
                .await;
            }
        }

        self.finish_turn().await;
    }

    async fn apply_and_broadcast(&self, message_id: &str, event: StreamEvent) {
        {
            let mut inner = self.inner.lock().await;
            if let Some(message) = inner.messages.iter_mut().find(|m| m.id == message_id) {
                apply_event(message, event.clone());
            }
            inner.store.save(&inner.messages);
        }
        self.broadcast(SessionEvent::Stream {
            message_id: message_id.to_string(),
            event,
        });
    }

    async fn finish_turn(&self) {
        {
            let mut inner = self.inner.lock().await;
            inner.status = ChatStatus::Idle;
            inner.turn = None;
            inner.store.save(&inner.messages);
        }
        self.broadcast(SessionEvent::Status {
            status: ChatStatus::Idle,
        });
    }

    /// Stop the in-flight turn, if any. Idempotent: stopping when nothing
    /// is streaming is a no-op. Already-applied parts stay as they are.
    pub async fn stop(&self) {
        let handle = {
            let mut inner = self.inner.lock().await;
            let handle = inner.turn.take();
            if handle.is_some() {
                inner.status = ChatStatus::Idle;
                inner.store.save(&inner.messages);
            }
            handle
        };
        if let Some(handle) = handle {
            handle.abort();
            self.broadcast(SessionEvent::Status {
                status: ChatStatus::Idle,
            });
        }
    }

    /// Start the conversation over: stops any turn and erases history.
    pub async fn clear(&self) {
        self.stop().await;
        {
            let mut inner = self.inner.lock().await;
            inner.messages.clear();
            inner.store.clear();
        }
        self.broadcast(SessionEvent::Cleared);
    }

    /// The whole conversation composed for one surface. The tail message
    /// counts as in-progress while a turn is streaming.
    pub async fn rendered(&self, surface: Surface) -> Vec<RenderedMessage> {
        let inner = self.inner.lock().await;
        let streaming = inner.status != ChatStatus::Idle;
        let last_id = inner.messages.last().map(|m| m.id.clone());
        inner
            .messages
            .iter()
            .map(|m| {
                let in_progress =
                    streaming && m.role == Role::Assistant && Some(&m.id) == last_id.as_ref();
                RenderedMessage {
                    id: m.id.clone(),
                    role: m.role,
                    blocks: compose_message(m, surface, in_progress, &self.agent),
                }
            })
            .collect()
    }

    pub fn agent(&self) -> &AgentIdentity {
        &self.agent
    }

    fn broadcast(&self, event: SessionEvent) {
        // No subscribers is fine; the TUI may not have attached yet.
        let _ = self.events_tx.send(event);
    }
}
