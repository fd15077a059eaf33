use serde_json::{json, Value};

/// The closed set of tools offered to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    GetAvailability,
    BookSlot,
    AddSlot,
    CreateBatchSchedule,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [
        ToolKind::GetAvailability,
        ToolKind::BookSlot,
        ToolKind::AddSlot,
        ToolKind::CreateBatchSchedule,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::GetAvailability => "getAvailability",
            ToolKind::BookSlot => "bookSlot",
            ToolKind::AddSlot => "addSlot",
            ToolKind::CreateBatchSchedule => "createBatchSchedule",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Tools that require the admin password.
    pub fn is_restricted(self) -> bool {
        matches!(self, ToolKind::AddSlot | ToolKind::CreateBatchSchedule)
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::GetAvailability => {
                "List open lesson slots for a subject on a given date. Convert relative dates such as 'next Monday' to YYYY-MM-DD first."
            }
            ToolKind::BookSlot => {
                "Book an open lesson slot for a student. Use the exact date, time, subject and teacher returned by getAvailability."
            }
            ToolKind::AddSlot => "Admin only: add a single open lesson slot to the schedule.",
            ToolKind::CreateBatchSchedule => {
                "Admin only: create hourly slots from 10:00 to 17:00 on every weekday for a number of days starting at startDate."
            }
        }
    }

    pub fn input_schema(self) -> Value {
        match self {
            ToolKind::GetAvailability => json!({
                "type": "object",
                "properties": {
                    "date": { "type": "string", "description": "Lesson date in YYYY-MM-DD format" },
                    "subject": { "type": "string", "description": "Subject name, e.g. Math" }
                },
                "required": ["date", "subject"]
            }),
            ToolKind::BookSlot => json!({
                "type": "object",
                "properties": {
                    "date": { "type": "string", "description": "Lesson date in YYYY-MM-DD format" },
                    "time": { "type": "string", "description": "Lesson start time, e.g. 10:00" },
                    "subject": { "type": "string" },
                    "teacher": { "type": "string" },
                    "studentName": { "type": "string", "description": "Full name of the student" },
                    "contactInfo": { "type": "string", "description": "Phone number or email address" }
                },
                "required": ["date", "time", "subject", "teacher", "studentName", "contactInfo"]
            }),
            ToolKind::AddSlot => json!({
                "type": "object",
                "properties": {
                    "adminPassword": { "type": "string", "description": "Admin password supplied by the user" },
                    "date": { "type": "string", "description": "Lesson date in YYYY-MM-DD format" },
                    "time": { "type": "string", "description": "Lesson start time, e.g. 14:00" },
                    "subject": { "type": "string" },
                    "teacher": { "type": "string" }
                },
                "required": ["adminPassword", "date", "time", "subject", "teacher"]
            }),
            ToolKind::CreateBatchSchedule => json!({
                "type": "object",
                "properties": {
                    "adminPassword": { "type": "string", "description": "Admin password supplied by the user" },
                    "startDate": { "type": "string", "description": "First day in YYYY-MM-DD format" },
                    "days": { "type": "number", "description": "Number of consecutive calendar days to cover" },
                    "subject": { "type": "string" },
                    "teacher": { "type": "string" }
                },
                "required": ["adminPassword", "startDate", "days", "subject", "teacher"]
            }),
        }
    }
}

/// Tool list in the chat-completions `tools` format.
pub fn format_tools_for_llm() -> Vec<Value> {
    ToolKind::ALL
        .iter()
        .map(|kind| {
            json!({
                "type": "function",
                "function": {
                    "name": kind.name(),
                    "description": kind.description(),
                    "parameters": kind.input_schema(),
                }
            })
        })
        .collect()
}
