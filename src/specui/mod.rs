//! Generic declarative UI: the assistant can emit a JSON tree of typed
//! elements that renders against a fixed component catalog, with reactive
//! local state and conditional visibility independent of the chat transport.

pub mod catalog;
pub mod render;
pub mod state;
pub mod types;

pub use render::{render, SpecNode};
pub use state::{ActionSink, RecordingSink, SpecAction, StateBag};
pub use types::{Condition, Element, UiSpec};
