//! Durable conversation history. One JSON file holds the whole persisted
//! message list; both surfaces share it, which is how the floating widget
//! and the hero panel show the same conversation. Persistence is
//! best-effort: a failed write never disturbs the live session, and a
//! corrupt or wrong-version file reads as an empty history.

use crate::chat::types::{Message, Part};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Bump on any incompatible change to the persisted shape. There is no
/// migration path: a mismatch wipes and starts fresh.
const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedHistory {
    version: u32,
    messages: Vec<Message>,
}

pub struct ConversationStore {
    path: PathBuf,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            path: crate::paths::history_file(),
        }
    }

    /// Explicit path, used by tests and by multi-conversation setups.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Previously persisted messages, or empty. Corrupt storage is treated
    /// as "no history" — this never returns an error.
    pub fn load(&self) -> Vec<Message> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str::<PersistedHistory>(&content) {
            Ok(history) if history.version == SCHEMA_VERSION => history.messages,
            Ok(history) => {
                warn!(
                    "history schema v{} != v{}, starting fresh",
                    history.version, SCHEMA_VERSION
                );
                Vec::new()
            }
            Err(e) => {
                warn!("corrupt history at {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// Persist a reduced projection of the message list. Text parts are
    /// kept verbatim; tool parts are kept only once they carry an input
    /// (so they can still be shown as submitted); spec parts and
    /// input-less tool parts are dropped to keep the payload bounded.
    /// Write failures are swallowed — persistence is not required for
    /// correctness of the live session.
    pub fn save(&self, messages: &[Message]) {
        let trimmed: Vec<Message> = messages
            .iter()
            .map(|m| Message {
                id: m.id.clone(),
                role: m.role,
                created_at: m.created_at,
                parts: m.parts.iter().filter(|p| keep_part(p)).cloned().collect(),
            })
            .collect();

        let history = PersistedHistory {
            version: SCHEMA_VERSION,
            messages: trimmed,
        };
        let payload = match serde_json::to_string(&history) {
            Ok(p) => p,
            Err(e) => {
                warn!("could not serialize history: {}", e);
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("could not create {}: {}", parent.display(), e);
                return;
            }
        }
        if let Err(e) = fs::write(&self.path, payload) {
            warn!("could not persist history: {}", e);
        }
    }

    /// Erase persisted history; used when the visitor starts over.
    pub fn clear(&self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!("could not clear history: {}", e);
            }
        }
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

fn keep_part(part: &Part) -> bool {
    match part {
        Part::Text { .. } => true,
        Part::Tool(tp) => tp.input.is_some(),
        Part::Spec { .. } => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::types::{Message, Part, ToolName, ToolPart, ToolState};
    use serde_json::json;

    fn temp_store() -> (ConversationStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = ConversationStore::with_path(dir.path().join("history.json"));
        (store, dir)
    }

    fn spec_part() -> Part {
        Part::Spec {
            spec: serde_json::from_value(json!({ "root": [] })).unwrap(),
        }
    }

    #[test]
    fn test_load_without_file_is_empty() {
        let (store, _dir) = temp_store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_round_trip_keeps_text_and_input_bearing_tools_only() {
        let (store, _dir) = temp_store();

        let mut assistant = Message::assistant();
        assistant.parts.push(Part::Text {
            text: "Here you go.".into(),
        });

        // Tool with input only.
        let mut submitted = ToolPart::new("c1", ToolName::PropertyTaxEstimate);
        submitted.input = Some(json!({ "price": 700000 }));
        submitted.advance(ToolState::InputAvailable);
        assistant.parts.push(Part::Tool(submitted));

        // Tool with input and output.
        let mut finished = ToolPart::new("c2", ToolName::NearbyPlaces);
        finished.input = Some(json!({ "query": "coffee" }));
        finished.output = Some(json!({ "results": [{ "name": "49th Parallel" }] }));
        finished.advance(ToolState::OutputAvailable);
        assistant.parts.push(Part::Tool(finished));

        // Output-only tool part (input never arrived) and a spec part:
        // both must be absent after the round trip.
        let mut orphan = ToolPart::new("c3", ToolName::NearbyPlaces);
        orphan.output = Some(json!({ "results": [] }));
        assistant.parts.push(Part::Tool(orphan));
        assistant.parts.push(spec_part());

        let messages = vec![Message::user("What about taxes?"), assistant];
        store.save(&messages);
        let loaded = store.load();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].text(), "What about taxes?");

        let parts = &loaded[1].parts;
        assert_eq!(parts.len(), 3, "orphan tool and spec must be trimmed");
        assert!(matches!(&parts[0], Part::Text { text } if text == "Here you go."));
        assert!(matches!(&parts[1], Part::Tool(tp) if tp.call_id == "c1"));
        match &parts[2] {
            Part::Tool(tp) => {
                assert_eq!(tp.call_id, "c2");
                assert!(tp.output.is_some());
            }
            other => panic!("unexpected part: {other:?}"),
        }
    }

    #[test]
    fn test_corrupt_file_loads_as_empty() {
        let (store, dir) = temp_store();
        std::fs::write(dir.path().join("history.json"), "{not json").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_schema_mismatch_wipes_and_starts_fresh() {
        let (store, dir) = temp_store();
        std::fs::write(
            dir.path().join("history.json"),
            r#"{"version": 99, "messages": [{"id":"x","role":"user","parts":[],"created_at":"2026-01-01T00:00:00Z"}]}"#,
        )
        .unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_clear_removes_history() {
        let (store, _dir) = temp_store();
        store.save(&[Message::user("hello")]);
        assert_eq!(store.load().len(), 1);
        store.clear();
        assert!(store.load().is_empty());
        // Clearing again is a no-op.
        store.clear();
    }

    #[test]
    fn test_save_to_unwritable_path_is_swallowed() {
        let store = ConversationStore::with_path(PathBuf::from(
            "/proc/hearth-nope/history.json",
        ));
        // Must not panic; the session keeps working in memory.
        store.save(&[Message::user("hi")]);
        assert!(store.load().is_empty());
    }
}
