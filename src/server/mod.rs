//! HTTP API for the web surfaces. The site's pages are rendered elsewhere;
//! this server only exposes the conversation: composed render blocks per
//! surface, an SSE feed of session events, and the lead form endpoint.

use crate::chat::compose::Surface;
use crate::leads::{LeadSink, LeadSubmission};
use crate::session::{ChatSession, SessionEvent, QUICK_REPLIES};
use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, Sse},
        IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tower_http::cors::CorsLayer;
use tracing::info;

pub struct ServerState {
    pub session: ChatSession,
    pub leads: LeadSink,
}

pub struct ServerHandle {
    pub port: u16,
    pub task: JoinHandle<()>,
}

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/chat", post(send_chat))
        .route("/api/stop", post(stop_chat))
        .route("/api/events", get(events))
        .route("/api/messages", get(messages).delete(clear_messages))
        .route("/api/quick-replies", get(quick_replies))
        .route("/api/lead", post(submit_lead))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve in a background task; the TUI runs in the foreground.
pub async fn prepare_server(state: Arc<ServerState>, port: u16) -> Result<ServerHandle> {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    let port = listener.local_addr()?.port();
    info!("api listening on http://127.0.0.1:{}", port);
    let app = router(state);
    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("server error: {}", e);
        }
    });
    Ok(ServerHandle { port, task })
}

/// Foreground server (web-only mode).
pub async fn start_server(state: Arc<ServerState>, port: u16) -> Result<()> {
    let handle = prepare_server(state, port).await?;
    handle.task.await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
}

async fn send_chat(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<ChatRequest>,
) -> impl IntoResponse {
    match state.session.send(&req.message).await {
        Ok(()) => (StatusCode::ACCEPTED, Json(json!({ "ok": true }))),
        Err(e) => (
            StatusCode::CONFLICT,
            Json(json!({ "ok": false, "error": e.to_string() })),
        ),
    }
}

async fn stop_chat(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    state.session.stop().await;
    Json(json!({ "ok": true }))
}

#[derive(Debug, Deserialize)]
struct MessagesQuery {
    #[serde(default = "default_surface")]
    surface: Surface,
}

fn default_surface() -> Surface {
    Surface::Inline
}

async fn messages(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<MessagesQuery>,
) -> impl IntoResponse {
    let rendered = state.session.rendered(query.surface).await;
    Json(json!({
        "status": state.session.status().await,
        "messages": rendered,
    }))
}

async fn clear_messages(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    state.session.clear().await;
    Json(json!({ "ok": true }))
}

async fn quick_replies() -> impl IntoResponse {
    Json(json!({ "quick_replies": QUICK_REPLIES }))
}

async fn submit_lead(
    State(state): State<Arc<ServerState>>,
    Json(lead): Json<LeadSubmission>,
) -> impl IntoResponse {
    let outcome = state.leads.submit(&lead).await;
    Json(outcome)
}

async fn events(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let rx = state.session.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|item| {
        let event: SessionEvent = match item {
            Ok(ev) => ev,
            // Lagged receiver: clients resync via GET /api/messages.
            Err(_) => return None,
        };
        let data = serde_json::to_string(&event).ok()?;
        Some(Ok::<Event, Infallible>(Event::default().data(data)))
    });
    Sse::new(stream).keep_alive(axum::response::sse::KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::AssistantClient;
    use crate::config::{AgentIdentity, LeadsConfig, PlacesConfig};
    use crate::places::PlacesClient;
    use crate::store::ConversationStore;

    fn test_state(dir: &tempfile::TempDir) -> Arc<ServerState> {
        Arc::new(ServerState {
            session: ChatSession::new(
                ConversationStore::with_path(dir.path().join("history.json")),
                AssistantClient::new("http://127.0.0.1:1".into(), "test".into(), None),
                PlacesClient::new(&PlacesConfig::default()),
                AgentIdentity {
                    name: "Maya".into(),
                    email: "m@example.com".into(),
                    phone: "604-555-0184".into(),
                    brokerage: None,
                },
            ),
            leads: LeadSink::new(&LeadsConfig::default()),
        })
    }

    #[tokio::test]
    async fn test_health_and_messages_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let handle = prepare_server(test_state(&dir), 0).await.unwrap();
        let base = format!("http://127.0.0.1:{}", handle.port);
        let client = reqwest::Client::new();

        let resp = client.get(format!("{base}/api/health")).send().await.unwrap();
        assert!(resp.status().is_success());

        let resp = client
            .get(format!("{base}/api/messages?surface=hero"))
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_success());
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "idle");
        assert!(body["messages"].as_array().unwrap().is_empty());

        handle.task.abort();
    }

    #[tokio::test]
    async fn test_stop_is_idempotent_over_http() {
        let dir = tempfile::tempdir().unwrap();
        let handle = prepare_server(test_state(&dir), 0).await.unwrap();
        let base = format!("http://127.0.0.1:{}", handle.port);
        let client = reqwest::Client::new();

        for _ in 0..2 {
            let resp = client.post(format!("{base}/api/stop")).send().await.unwrap();
            assert!(resp.status().is_success());
        }
        handle.task.abort();
    }

    #[tokio::test]
    async fn test_lead_endpoint_log_only_path() {
        let dir = tempfile::tempdir().unwrap();
        let handle = prepare_server(test_state(&dir), 0).await.unwrap();
        let base = format!("http://127.0.0.1:{}", handle.port);

        let resp = reqwest::Client::new()
            .post(format!("{base}/api/lead"))
            .json(&serde_json::json!({
                "name": "Ana",
                "contact": "ana@example.com",
                "message": "Saturday works",
                "source": "page-contact-form"
            }))
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_success());
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["ok"], true);

        handle.task.abort();
    }
}
