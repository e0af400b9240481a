use crate::specui::UiSpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// Conversation messages and parts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One turn in the conversation. Parts are append-only while the turn
/// streams and frozen once it completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub parts: Vec<Part>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::User,
            parts: vec![Part::Text { text: text.into() }],
            created_at: Utc::now(),
        }
    }

    pub fn assistant() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::Assistant,
            parts: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// All text parts concatenated in arrival order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            if let Part::Text { text } = part {
                out.push_str(text);
            }
        }
        out
    }
}

/// One incremental unit of an assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Part {
    Text { text: String },
    Tool(ToolPart),
    Spec { spec: UiSpec },
}

/// A single invocation of a named capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolPart {
    /// Per-turn call id issued by the backend; stream events address the
    /// part through it.
    pub call_id: String,
    pub tool: ToolName,
    pub state: ToolState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<JsonValue>,
}

impl ToolPart {
    pub fn new(call_id: impl Into<String>, tool: ToolName) -> Self {
        Self {
            call_id: call_id.into(),
            tool,
            state: ToolState::InputStreaming,
            input: None,
            output: None,
        }
    }

    /// Forward-only state transition; a regression is ignored.
    pub fn advance(&mut self, next: ToolState) {
        if next.rank() > self.state.rank() {
            self.state = next;
        }
    }

    /// True once the part has everything its widget needs to render.
    pub fn is_ready(&self) -> bool {
        self.state.rank() >= self.tool.ready_state().rank()
    }
}

/// The closed set of capabilities the assistant can invoke. Adding a tool
/// is a compiler-enforced checklist: wire name, ready state, loading label,
/// and a resolver arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolName {
    MortgageCalculator,
    PropertyTaxEstimate,
    ContactCard,
    ScheduleViewing,
    NeighbourhoodMap,
    NearbyPlaces,
}

impl ToolName {
    /// The earliest lifecycle state at which this tool's widget can render.
    /// Nearby-places depends on an external lookup and must wait for output;
    /// everything else renders from its input alone.
    pub fn ready_state(&self) -> ToolState {
        match self {
            ToolName::NearbyPlaces => ToolState::OutputAvailable,
            ToolName::MortgageCalculator
            | ToolName::PropertyTaxEstimate
            | ToolName::ContactCard
            | ToolName::ScheduleViewing
            | ToolName::NeighbourhoodMap => ToolState::InputAvailable,
        }
    }

    /// Placeholder label shown while the part is not yet ready.
    pub fn loading_label(&self) -> &'static str {
        match self {
            ToolName::MortgageCalculator => "Setting up the mortgage calculator…",
            ToolName::PropertyTaxEstimate => "Working out the property transfer tax…",
            ToolName::ContactCard => "Pulling up contact details…",
            ToolName::ScheduleViewing => "Preparing the viewing request form…",
            ToolName::NeighbourhoodMap => "Loading the neighbourhood map…",
            ToolName::NearbyPlaces => "Getting ready to look around…",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToolName::MortgageCalculator => "Mortgage calculator",
            ToolName::PropertyTaxEstimate => "Property transfer tax estimate",
            ToolName::ContactCard => "Contact card",
            ToolName::ScheduleViewing => "Schedule a viewing",
            ToolName::NeighbourhoodMap => "Neighbourhood map",
            ToolName::NearbyPlaces => "Nearby places",
        }
    }
}

/// Tool-part lifecycle. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolState {
    InputStreaming,
    InputAvailable,
    OutputAvailable,
}

impl ToolState {
    pub fn rank(&self) -> u8 {
        match self {
            ToolState::InputStreaming => 0,
            ToolState::InputAvailable => 1,
            ToolState::OutputAvailable => 2,
        }
    }
}

/// Transport status for the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatStatus {
    Idle,
    Submitted,
    Streaming,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_state_is_monotonic() {
        let mut part = ToolPart::new("c1", ToolName::MortgageCalculator);
        assert_eq!(part.state, ToolState::InputStreaming);
        part.advance(ToolState::OutputAvailable);
        assert_eq!(part.state, ToolState::OutputAvailable);
        // No backward transitions.
        part.advance(ToolState::InputAvailable);
        assert_eq!(part.state, ToolState::OutputAvailable);
    }

    #[test]
    fn test_places_requires_output_to_be_ready() {
        let mut part = ToolPart::new("c1", ToolName::NearbyPlaces);
        part.advance(ToolState::InputAvailable);
        assert!(!part.is_ready());
        part.advance(ToolState::OutputAvailable);
        assert!(part.is_ready());
    }

    #[test]
    fn test_input_only_tools_ready_at_input_available() {
        for tool in [
            ToolName::MortgageCalculator,
            ToolName::PropertyTaxEstimate,
            ToolName::ContactCard,
            ToolName::ScheduleViewing,
            ToolName::NeighbourhoodMap,
        ] {
            let mut part = ToolPart::new("c1", tool);
            assert!(!part.is_ready());
            part.advance(ToolState::InputAvailable);
            assert!(part.is_ready(), "{tool:?} should render from input alone");
        }
    }

    #[test]
    fn test_part_wire_shape() {
        let part = Part::Tool(ToolPart::new("c7", ToolName::NeighbourhoodMap));
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["type"], "tool");
        assert_eq!(json["tool"], "neighbourhood-map");
        assert_eq!(json["state"], "input-streaming");
    }

    #[test]
    fn test_message_text_concatenates_in_arrival_order() {
        let mut msg = Message::assistant();
        msg.parts.push(Part::Text { text: "Kits ".into() });
        msg.parts
            .push(Part::Tool(ToolPart::new("c1", ToolName::ContactCard)));
        msg.parts.push(Part::Text {
            text: "is lovely.".into(),
        });
        assert_eq!(msg.text(), "Kits is lovely.");
    }
}
