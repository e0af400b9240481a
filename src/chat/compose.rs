//! Per-surface assembly of one assistant message's rendered children.
//!
//! The floating chat reads chronologically, so the inline surface keeps
//! arrival order. The landing hero wants the answer first: structured
//! content (spec, then tool widgets) above the trailing prose, and an
//! animated typing indicator in place of a message that is still streaming.

use crate::chat::classifier::{classify_message, RenderDecision};
use crate::chat::types::Message;
use crate::config::AgentIdentity;
use crate::specui::UiSpec;
use crate::widgets::{self, WidgetBlock};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// Floating/inline chat widget: strict arrival order.
    Inline,
    /// Hero/landing panel: spec → widgets → text, typing while streaming.
    Hero,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "block", rename_all = "kebab-case")]
pub enum RenderBlock {
    Text { text: String },
    Widget(WidgetBlock),
    /// The surface renders this with its own spec runtime and state bag.
    Spec { spec: UiSpec },
    /// Generic "assistant is typing" indicator (hero surface, streaming).
    Typing,
}

/// Compose the visual sequence for one assistant message. `in_progress`
/// marks the message whose turn is still streaming.
pub fn compose_message(
    message: &Message,
    surface: Surface,
    in_progress: bool,
    agent: &AgentIdentity,
) -> Vec<RenderBlock> {
    match surface {
        Surface::Inline => compose_inline(message, agent),
        Surface::Hero => {
            if in_progress {
                vec![RenderBlock::Typing]
            } else {
                compose_hero(message, agent)
            }
        }
    }
}

fn compose_inline(message: &Message, agent: &AgentIdentity) -> Vec<RenderBlock> {
    let mut blocks: Vec<RenderBlock> = Vec::new();
    for decision in classify_message(message) {
        match decision {
            RenderDecision::Text(text) => {
                // Consecutive text parts read as one paragraph run.
                if let Some(RenderBlock::Text { text: prev }) = blocks.last_mut() {
                    prev.push_str(text);
                } else {
                    blocks.push(RenderBlock::Text {
                        text: text.to_string(),
                    });
                }
            }
            RenderDecision::Tool(part) => {
                blocks.push(RenderBlock::Widget(widgets::resolve(part, agent)));
            }
            RenderDecision::Spec(spec) => {
                blocks.push(RenderBlock::Spec { spec: spec.clone() });
            }
            RenderDecision::Ignore => {}
        }
    }
    blocks
}

fn compose_hero(message: &Message, agent: &AgentIdentity) -> Vec<RenderBlock> {
    let mut spec_blocks = Vec::new();
    let mut widget_blocks = Vec::new();
    let mut text = String::new();

    for decision in classify_message(message) {
        match decision {
            RenderDecision::Text(t) => text.push_str(t),
            RenderDecision::Tool(part) => {
                widget_blocks.push(RenderBlock::Widget(widgets::resolve(part, agent)));
            }
            RenderDecision::Spec(spec) => {
                spec_blocks.push(RenderBlock::Spec { spec: spec.clone() });
            }
            RenderDecision::Ignore => {}
        }
    }

    let mut blocks = spec_blocks;
    blocks.extend(widget_blocks);
    if !text.is_empty() {
        blocks.push(RenderBlock::Text { text });
    }
    blocks
}
