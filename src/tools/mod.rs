mod batch;
mod definitions;
mod error;
mod invocation;
mod registry;
mod sanitize;

pub use batch::{is_weekend, parse_date, weekday_slots, CLOSING_HOUR, FIRST_LESSON_HOUR, MAX_BATCH_DAYS};
pub use definitions::{format_tools_for_llm, ToolKind};
pub use error::{ToolError, ToolResult};
pub use invocation::{
    validate_arguments, AddSlotArgs, AvailabilityArgs, BatchScheduleArgs, BookingArgs, ToolInvocation,
};
pub use registry::ToolRegistry;
pub use sanitize::{sanitize_contact_info, LITERAL_TEXT_MARKER};
