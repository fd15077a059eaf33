mod knowledge;
mod message;
mod slot;
mod tool;

pub use knowledge::{KnowledgeDocument, KnowledgeMatch, QaPair};
pub use message::{Message, Role};
pub use slot::{AvailabilitySlot, SlotIdentifier, SlotRecord};
pub use tool::{FunctionCall, ToolCall};
