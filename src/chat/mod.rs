//! The chat core: message/part data model, the streaming-event reducer,
//! part classification, and the per-surface composer.

pub mod classifier;
pub mod compose;
pub mod reducer;
pub mod types;

pub use compose::{compose_message, RenderBlock, Surface};
pub use reducer::{apply_event, StreamEvent};
pub use types::{ChatStatus, Message, Part, Role, ToolName, ToolPart, ToolState};
