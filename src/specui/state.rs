use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;

/// Key-value state scoped to one rendered spec instance. Writes are
/// last-write-wins per key; the version counter lets a surface cheaply
/// detect that a re-render is due.
#[derive(Debug, Clone, Default)]
pub struct StateBag {
    values: HashMap<String, JsonValue>,
    version: u64,
}

impl StateBag {
    pub fn seeded(initial: &Map<String, JsonValue>) -> Self {
        Self {
            values: initial
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            version: 0,
        }
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: JsonValue) {
        self.values.insert(key.into(), value);
        self.version += 1;
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

/// A user-initiated event emitted from a rendered component.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecAction {
    pub name: String,
    pub payload: JsonValue,
}

/// Dispatch seam for spec actions. The current catalog defines no
/// host-handled actions, so the default sink only records what arrived.
pub trait ActionSink {
    fn dispatch(&mut self, action: SpecAction);
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub received: Vec<SpecAction>,
}

impl ActionSink for RecordingSink {
    fn dispatch(&mut self, action: SpecAction) {
        tracing::debug!("spec action dispatched: {}", action.name);
        self.received.push(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seed_get_set() {
        let initial: Map<String, JsonValue> =
            serde_json::from_value(json!({ "budget": 750000 })).unwrap();
        let mut bag = StateBag::seeded(&initial);
        assert_eq!(bag.get("budget"), Some(&json!(750000)));
        assert_eq!(bag.version(), 0);

        bag.set("budget", json!(800000));
        bag.set("ftb", json!(true));
        assert_eq!(bag.get("budget"), Some(&json!(800000)));
        assert_eq!(bag.version(), 2);
    }

    #[test]
    fn test_last_write_wins_per_key() {
        let mut bag = StateBag::default();
        bag.set("q", json!("coffee"));
        bag.set("q", json!("schools"));
        assert_eq!(bag.get("q"), Some(&json!("schools")));
    }

    #[test]
    fn test_recording_sink_collects_actions() {
        let mut sink = RecordingSink::default();
        sink.dispatch(SpecAction {
            name: "book".into(),
            payload: json!({}),
        });
        assert_eq!(sink.received.len(), 1);
        assert_eq!(sink.received[0].name, "book");
    }
}
