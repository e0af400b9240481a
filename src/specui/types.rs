use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// A declarative UI tree the assistant emits alongside its prose. Rendered
/// against the closed component catalog; the shape is deliberately loose so
/// the catalog can grow without a client redeploy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiSpec {
    #[serde(default)]
    pub root: Vec<Element>,
    /// Seed values for the state bag scoped to one rendered instance.
    #[serde(default)]
    pub initial_state: Map<String, JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Element {
    /// Component type; must name a catalog entry, otherwise the renderer
    /// produces a visible fallback instead of failing the tree.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub props: Map<String, JsonValue>,
    /// Named slots, each an ordered sequence of child elements.
    #[serde(default)]
    pub slots: Map<String, JsonValue>,
    /// Key into the shared state bag this element reads/writes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_key: Option<String>,
    /// When present, the element renders only while the condition holds
    /// against the current state bag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_if: Option<Condition>,
}

impl Element {
    /// Children of a named slot. Slot payloads that are not arrays of
    /// elements decode as empty rather than failing the parent.
    pub fn slot_children(&self, slot: &str) -> Vec<Element> {
        let Some(raw) = self.slots.get(slot) else {
            return Vec::new();
        };
        match serde_json::from_value::<Vec<Element>>(raw.clone()) {
            Ok(children) => children,
            Err(_) => Vec::new(),
        }
    }
}

/// Visibility condition evaluated against the state bag. With `equals`
/// absent the condition is a truthiness check on the keyed value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Condition {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<JsonValue>,
}

impl Condition {
    pub fn holds(&self, value: Option<&JsonValue>) -> bool {
        match &self.equals {
            Some(expected) => value == Some(expected),
            None => value.map(is_truthy).unwrap_or(false),
        }
    }
}

fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_spec_parses_with_defaults() {
        let spec: UiSpec = serde_json::from_value(json!({
            "root": [{ "type": "heading", "props": { "text": "Hello" } }]
        }))
        .unwrap();
        assert_eq!(spec.root.len(), 1);
        assert!(spec.initial_state.is_empty());
    }

    #[test]
    fn test_malformed_slot_reads_as_empty() {
        let el: Element = serde_json::from_value(json!({
            "type": "card",
            "slots": { "body": "not an array" }
        }))
        .unwrap();
        assert!(el.slot_children("body").is_empty());
        assert!(el.slot_children("missing").is_empty());
    }

    #[test]
    fn test_condition_equals_and_truthy() {
        let eq = Condition {
            key: "tab".into(),
            equals: Some(json!("details")),
        };
        assert!(eq.holds(Some(&json!("details"))));
        assert!(!eq.holds(Some(&json!("summary"))));
        assert!(!eq.holds(None));

        let truthy = Condition {
            key: "open".into(),
            equals: None,
        };
        assert!(truthy.holds(Some(&json!(true))));
        assert!(truthy.holds(Some(&json!("yes"))));
        assert!(!truthy.holds(Some(&json!(""))));
        assert!(!truthy.holds(Some(&json!(0))));
        assert!(!truthy.holds(None));
    }
}
