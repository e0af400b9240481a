use super::catalog;
use super::state::StateBag;
use super::types::{Element, UiSpec};
use serde_json::{Map, Value as JsonValue};

/// Resolved render tree for one spec instance. Surfaces draw these nodes;
/// nothing here touches the chat transport.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "node", rename_all = "kebab-case")]
pub enum SpecNode {
    Component {
        kind: String,
        props: Map<String, JsonValue>,
        /// (slot name, children) pairs in the element's declaration order.
        slots: Vec<(String, Vec<SpecNode>)>,
        /// Current value of the bound state key, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        bound_state: Option<JsonValue>,
        #[serde(skip_serializing_if = "Option::is_none")]
        state_key: Option<String>,
    },
    /// Visible stand-in for an element whose type is not in the catalog.
    /// A malformed or newer-than-client spec degrades instead of breaking
    /// the surrounding message.
    Unknown { kind: String },
}

/// Render a whole spec against the current state bag. Hidden elements are
/// omitted entirely, not rendered invisible.
pub fn render(spec: &UiSpec, bag: &StateBag) -> Vec<SpecNode> {
    render_elements(&spec.root, bag)
}

fn render_elements(elements: &[Element], bag: &StateBag) -> Vec<SpecNode> {
    elements
        .iter()
        .filter_map(|el| render_element(el, bag))
        .collect()
}

fn render_element(el: &Element, bag: &StateBag) -> Option<SpecNode> {
    if let Some(cond) = &el.visible_if {
        if !cond.holds(bag.get(&cond.key)) {
            return None;
        }
    }

    let Some(entry) = catalog::lookup(&el.kind) else {
        return Some(SpecNode::Unknown {
            kind: el.kind.clone(),
        });
    };

    // Start from the declared props and fill required gaps with the
    // schema's per-kind default. Unknown extra props pass through.
    let mut props = el.props.clone();
    for spec in entry.props {
        if spec.required && !props.contains_key(spec.name) {
            props.insert(spec.name.to_string(), spec.kind.default_value());
        }
    }

    let slots = entry
        .slots
        .iter()
        .filter(|slot| el.slots.contains_key(**slot))
        .map(|slot| {
            (
                slot.to_string(),
                render_elements(&el.slot_children(slot), bag),
            )
        })
        .collect();

    let bound_state = el.state_key.as_deref().and_then(|k| bag.get(k)).cloned();

    Some(SpecNode::Component {
        kind: el.kind.clone(),
        props,
        slots,
        bound_state,
        state_key: el.state_key.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(value: serde_json::Value) -> UiSpec {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_unknown_type_renders_named_fallback_without_dropping_siblings() {
        let spec = spec(json!({
            "root": [
                { "type": "heading", "props": { "text": "Guide" } },
                { "type": "hologram", "props": { "x": 1 } },
                { "type": "paragraph", "props": { "text": "Still here." } }
            ]
        }));
        let nodes = render(&spec, &StateBag::default());
        assert_eq!(nodes.len(), 3);
        assert_eq!(
            nodes[1],
            SpecNode::Unknown {
                kind: "hologram".into()
            }
        );
        match &nodes[2] {
            SpecNode::Component { kind, .. } => assert_eq!(kind, "paragraph"),
            other => panic!("sibling after fallback lost: {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_prop_defaults_instead_of_failing() {
        let spec = spec(json!({ "root": [{ "type": "stat", "props": { "label": "Median" } }] }));
        let nodes = render(&spec, &StateBag::default());
        match &nodes[0] {
            SpecNode::Component { props, .. } => {
                assert_eq!(props["label"], json!("Median"));
                assert_eq!(props["value"], json!(""));
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn test_hidden_elements_are_omitted() {
        let spec = spec(json!({
            "initial_state": { "show_details": false },
            "root": [
                { "type": "paragraph", "props": { "text": "Always" } },
                {
                    "type": "paragraph",
                    "props": { "text": "Sometimes" },
                    "visible_if": { "key": "show_details" }
                }
            ]
        }));
        let mut bag = StateBag::seeded(&spec.initial_state);
        assert_eq!(render(&spec, &bag).len(), 1);

        bag.set("show_details", json!(true));
        assert_eq!(render(&spec, &bag).len(), 2);
    }

    #[test]
    fn test_visibility_inside_slots_follows_state() {
        let spec = spec(json!({
            "initial_state": { "tab": "pros" },
            "root": [{
                "type": "card",
                "props": { "title": "Trade-offs" },
                "slots": { "body": [
                    {
                        "type": "paragraph",
                        "props": { "text": "Pros" },
                        "visible_if": { "key": "tab", "equals": "pros" }
                    },
                    {
                        "type": "paragraph",
                        "props": { "text": "Cons" },
                        "visible_if": { "key": "tab", "equals": "cons" }
                    }
                ] }
            }]
        }));
        let mut bag = StateBag::seeded(&spec.initial_state);

        let body_texts = |bag: &StateBag| -> Vec<String> {
            match &render(&spec, bag)[0] {
                SpecNode::Component { slots, .. } => slots[0]
                    .1
                    .iter()
                    .map(|n| match n {
                        SpecNode::Component { props, .. } => {
                            props["text"].as_str().unwrap().to_string()
                        }
                        SpecNode::Unknown { kind } => kind.clone(),
                    })
                    .collect(),
                _ => panic!("expected card"),
            }
        };

        assert_eq!(body_texts(&bag), vec!["Pros"]);
        bag.set("tab", json!("cons"));
        assert_eq!(body_texts(&bag), vec!["Cons"]);
    }

    #[test]
    fn test_bound_state_resolves_from_bag() {
        let spec = spec(json!({
            "initial_state": { "budget": "900000" },
            "root": [{ "type": "input", "props": { "label": "Budget" }, "state_key": "budget" }]
        }));
        let bag = StateBag::seeded(&spec.initial_state);
        match &render(&spec, &bag)[0] {
            SpecNode::Component { bound_state, .. } => {
                assert_eq!(bound_state.as_ref(), Some(&json!("900000")));
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn test_undeclared_slot_names_are_ignored() {
        let spec = spec(json!({
            "root": [{
                "type": "card",
                "slots": {
                    "body": [{ "type": "paragraph", "props": { "text": "ok" } }],
                    "footer": [{ "type": "paragraph", "props": { "text": "dropped" } }]
                }
            }]
        }));
        match &render(&spec, &StateBag::default())[0] {
            SpecNode::Component { slots, .. } => {
                assert_eq!(slots.len(), 1);
                assert_eq!(slots[0].0, "body");
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }
}
