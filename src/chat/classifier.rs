//! Part classification: a pure mapping from one incremental part to a
//! render decision, depending only on that part's type and current state.
//! The single exception is spec de-duplication, which is per-message: the
//! first spec payload wins and later occurrences are ignored.

use crate::chat::types::{Message, Part, ToolPart};
use crate::specui::UiSpec;

#[derive(Debug)]
pub enum RenderDecision<'a> {
    /// Inline prose.
    Text(&'a str),
    /// Known tool; the resolver owns the state-dependent rendering
    /// (ready widget, searching indicator, or loading placeholder).
    Tool(&'a ToolPart),
    /// First spec payload of the message.
    Spec(&'a UiSpec),
    /// Duplicate spec payloads and anything unrecognized render nothing.
    Ignore,
}

/// Classify one part. `seen_spec` is the per-message de-duplication flag;
/// start it false and thread it through the message's parts in order.
pub fn classify<'a>(part: &'a Part, seen_spec: &mut bool) -> RenderDecision<'a> {
    match part {
        Part::Text { text } => RenderDecision::Text(text),
        Part::Tool(tool_part) => RenderDecision::Tool(tool_part),
        Part::Spec { spec } => {
            if *seen_spec {
                RenderDecision::Ignore
            } else {
                *seen_spec = true;
                RenderDecision::Spec(spec)
            }
        }
    }
}

/// Classify all parts of a message in arrival order.
pub fn classify_message(message: &Message) -> Vec<RenderDecision<'_>> {
    let mut seen_spec = false;
    message
        .parts
        .iter()
        .map(|part| classify(part, &mut seen_spec))
        .collect()
}
