//! The streaming turn is an append-only event stream folded into the tail
//! assistant message. "Suspension" is just awaiting the next event; the
//! terminal events (`finish`, `error`) are handled by the session driver,
//! not here.

use crate::chat::types::{Message, Part, ToolName, ToolPart, ToolState};
use crate::specui::UiSpec;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::warn;

/// One incremental event from the assistant backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StreamEvent {
    TextDelta {
        delta: String,
    },
    ToolInputStart {
        call_id: String,
        tool: ToolName,
    },
    ToolInputAvailable {
        call_id: String,
        tool: ToolName,
        input: JsonValue,
    },
    ToolOutputAvailable {
        call_id: String,
        output: JsonValue,
    },
    SpecData {
        spec: JsonValue,
    },
    Finish,
    Error {
        message: String,
    },
}

impl StreamEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Finish | StreamEvent::Error { .. })
    }
}

/// Fold one content event into the message. Parts are append-only: text
/// deltas extend the trailing text part, tool events advance the matching
/// part monotonically, and nothing is ever removed or reordered.
pub fn apply_event(message: &mut Message, event: StreamEvent) {
    match event {
        StreamEvent::TextDelta { delta } => {
            if let Some(Part::Text { text }) = message.parts.last_mut() {
                text.push_str(&delta);
            } else {
                message.parts.push(Part::Text { text: delta });
            }
        }
        StreamEvent::ToolInputStart { call_id, tool } => {
            if find_tool_part(message, &call_id).is_none() {
                message.parts.push(Part::Tool(ToolPart::new(call_id, tool)));
            }
        }
        StreamEvent::ToolInputAvailable {
            call_id,
            tool,
            input,
        } => match find_tool_part(message, &call_id) {
            Some(part) => {
                part.input = Some(input);
                part.advance(ToolState::InputAvailable);
            }
            None => {
                // Backends may skip the start event for small inputs.
                let mut part = ToolPart::new(call_id, tool);
                part.input = Some(input);
                part.advance(ToolState::InputAvailable);
                message.parts.push(Part::Tool(part));
            }
        },
        StreamEvent::ToolOutputAvailable { call_id, output } => {
            match find_tool_part(message, &call_id) {
                Some(part) => {
                    part.output = Some(output);
                    part.advance(ToolState::OutputAvailable);
                }
                None => warn!("tool output for unknown call_id {}, dropped", call_id),
            }
        }
        StreamEvent::SpecData { spec } => match serde_json::from_value::<UiSpec>(spec) {
            Ok(spec) => message.parts.push(Part::Spec { spec }),
            Err(e) => warn!("unparseable spec payload dropped: {}", e),
        },
        StreamEvent::Finish | StreamEvent::Error { .. } => {
            // Terminal events carry no content.
        }
    }
}

fn find_tool_part<'a>(message: &'a mut Message, call_id: &str) -> Option<&'a mut ToolPart> {
    message.parts.iter_mut().find_map(|part| match part {
        Part::Tool(tp) if tp.call_id == call_id => Some(tp),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn msg() -> Message {
        Message::assistant()
    }

    #[test]
    fn test_text_deltas_extend_trailing_text_part() {
        let mut m = msg();
        apply_event(&mut m, StreamEvent::TextDelta { delta: "Kits".into() });
        apply_event(&mut m, StreamEvent::TextDelta { delta: " is ".into() });
        apply_event(&mut m, StreamEvent::TextDelta { delta: "great".into() });
        assert_eq!(m.parts.len(), 1);
        assert_eq!(m.text(), "Kits is great");
    }

    #[test]
    fn test_text_after_tool_starts_a_new_part() {
        let mut m = msg();
        apply_event(&mut m, StreamEvent::TextDelta { delta: "Here:".into() });
        apply_event(
            &mut m,
            StreamEvent::ToolInputStart {
                call_id: "c1".into(),
                tool: ToolName::ContactCard,
            },
        );
        apply_event(&mut m, StreamEvent::TextDelta { delta: "Bye.".into() });
        assert_eq!(m.parts.len(), 3);
    }

    #[test]
    fn test_tool_lifecycle_folds_into_one_part() {
        let mut m = msg();
        apply_event(
            &mut m,
            StreamEvent::ToolInputStart {
                call_id: "c1".into(),
                tool: ToolName::NearbyPlaces,
            },
        );
        apply_event(
            &mut m,
            StreamEvent::ToolInputAvailable {
                call_id: "c1".into(),
                tool: ToolName::NearbyPlaces,
                input: json!({ "query": "coffee" }),
            },
        );
        apply_event(
            &mut m,
            StreamEvent::ToolOutputAvailable {
                call_id: "c1".into(),
                output: json!({ "results": [] }),
            },
        );
        assert_eq!(m.parts.len(), 1);
        match &m.parts[0] {
            Part::Tool(tp) => {
                assert_eq!(tp.state, ToolState::OutputAvailable);
                assert!(tp.input.is_some());
                assert!(tp.output.is_some());
            }
            other => panic!("unexpected part: {other:?}"),
        }
    }

    #[test]
    fn test_input_available_without_start_creates_the_part() {
        let mut m = msg();
        apply_event(
            &mut m,
            StreamEvent::ToolInputAvailable {
                call_id: "c1".into(),
                tool: ToolName::PropertyTaxEstimate,
                input: json!({ "price": 700000 }),
            },
        );
        match &m.parts[0] {
            Part::Tool(tp) => assert_eq!(tp.state, ToolState::InputAvailable),
            other => panic!("unexpected part: {other:?}"),
        }
    }

    #[test]
    fn test_output_for_unknown_call_is_dropped() {
        let mut m = msg();
        apply_event(
            &mut m,
            StreamEvent::ToolOutputAvailable {
                call_id: "ghost".into(),
                output: json!({}),
            },
        );
        assert!(m.parts.is_empty());
    }

    #[test]
    fn test_duplicate_start_does_not_duplicate_the_part() {
        let mut m = msg();
        for _ in 0..2 {
            apply_event(
                &mut m,
                StreamEvent::ToolInputStart {
                    call_id: "c1".into(),
                    tool: ToolName::ContactCard,
                },
            );
        }
        assert_eq!(m.parts.len(), 1);
    }

    #[test]
    fn test_malformed_spec_payload_is_dropped() {
        let mut m = msg();
        apply_event(
            &mut m,
            StreamEvent::SpecData {
                spec: json!({ "root": "not an array" }),
            },
        );
        assert!(m.parts.is_empty());
    }

    #[test]
    fn test_event_wire_shape() {
        let ev: StreamEvent = serde_json::from_value(json!({
            "type": "tool-input-available",
            "call_id": "c3",
            "tool": "nearby-places",
            "input": { "query": "parks" }
        }))
        .unwrap();
        assert!(matches!(
            ev,
            StreamEvent::ToolInputAvailable {
                tool: ToolName::NearbyPlaces,
                ..
            }
        ));
        // Unknown event types fail to parse; the transport skips them.
        assert!(
            serde_json::from_value::<StreamEvent>(json!({ "type": "telemetry" })).is_err()
        );
    }
}
