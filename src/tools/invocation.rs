use jsonschema::{Draft, JSONSchema};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::definitions::ToolKind;
use super::error::ToolError;
use crate::models::{SlotIdentifier, ToolCall};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AvailabilityArgs {
    pub date: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingArgs {
    pub date: String,
    pub time: String,
    pub subject: String,
    pub teacher: String,
    pub student_name: String,
    pub contact_info: String,
}

impl BookingArgs {
    pub fn slot(&self) -> SlotIdentifier {
        SlotIdentifier::new(&self.date, &self.time, &self.subject, &self.teacher).normalized()
    }
}

#[derive(Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSlotArgs {
    pub admin_password: String,
    pub date: String,
    pub time: String,
    pub subject: String,
    pub teacher: String,
}

impl AddSlotArgs {
    pub fn slot(&self) -> SlotIdentifier {
        SlotIdentifier::new(&self.date, &self.time, &self.subject, &self.teacher).normalized()
    }
}

#[derive(Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchScheduleArgs {
    pub admin_password: String,
    pub start_date: String,
    pub days: f64,
    pub subject: String,
    pub teacher: String,
}

// Keep the password out of logs.
impl std::fmt::Debug for AddSlotArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddSlotArgs")
            .field("admin_password", &"[REDACTED]")
            .field("date", &self.date)
            .field("time", &self.time)
            .field("subject", &self.subject)
            .field("teacher", &self.teacher)
            .finish()
    }
}

impl std::fmt::Debug for BatchScheduleArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScheduleArgs")
            .field("admin_password", &"[REDACTED]")
            .field("start_date", &self.start_date)
            .field("days", &self.days)
            .field("subject", &self.subject)
            .field("teacher", &self.teacher)
            .finish()
    }
}

/// A validated, strongly typed tool request.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocation {
    GetAvailability(AvailabilityArgs),
    BookSlot(BookingArgs),
    AddSlot(AddSlotArgs),
    CreateBatchSchedule(BatchScheduleArgs),
}

impl ToolInvocation {
    /// Resolves the tool name, checks the arguments against the declared
    /// schema and decodes them.
    pub fn parse(call: &ToolCall) -> Result<Self, ToolError> {
        let name = call.function.name.as_str();
        let kind = ToolKind::from_name(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        let raw = call.function.arguments.trim();
        let arguments: Value = if raw.is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(raw)
                .map_err(|e| ToolError::invalid(name, format!("arguments are not valid JSON: {}", e)))?
        };

        validate_arguments(kind, &arguments)?;

        Ok(match kind {
            ToolKind::GetAvailability => ToolInvocation::GetAvailability(decode(kind, arguments)?),
            ToolKind::BookSlot => ToolInvocation::BookSlot(decode(kind, arguments)?),
            ToolKind::AddSlot => ToolInvocation::AddSlot(decode(kind, arguments)?),
            ToolKind::CreateBatchSchedule => ToolInvocation::CreateBatchSchedule(decode(kind, arguments)?),
        })
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            ToolInvocation::GetAvailability(_) => ToolKind::GetAvailability,
            ToolInvocation::BookSlot(_) => ToolKind::BookSlot,
            ToolInvocation::AddSlot(_) => ToolKind::AddSlot,
            ToolInvocation::CreateBatchSchedule(_) => ToolKind::CreateBatchSchedule,
        }
    }

    /// Password supplied with an admin tool call.
    pub fn admin_password(&self) -> Option<&str> {
        match self {
            ToolInvocation::AddSlot(args) => Some(&args.admin_password),
            ToolInvocation::CreateBatchSchedule(args) => Some(&args.admin_password),
            ToolInvocation::GetAvailability(_) | ToolInvocation::BookSlot(_) => None,
        }
    }
}

pub fn validate_arguments(kind: ToolKind, arguments: &Value) -> Result<(), ToolError> {
    let schema_value = kind.input_schema();
    let schema = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema_value)
        .map_err(|e| ToolError::invalid(kind.name(), format!("invalid tool schema: {}", e)))?;

    if let Err(errors) = schema.validate(arguments) {
        let error_messages: Vec<String> = errors
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{}: {}", path, e)
                }
            })
            .collect();
        return Err(ToolError::invalid(kind.name(), error_messages.join("; ")));
    }

    Ok(())
}

fn decode<T: DeserializeOwned>(kind: ToolKind, arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::invalid(kind.name(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, arguments: &str) -> ToolCall {
        ToolCall::function("call_1", name, arguments)
    }

    #[test]
    fn test_parse_availability() {
        let invocation =
            ToolInvocation::parse(&call("getAvailability", r#"{"date":"2025-06-02","subject":"Math"}"#)).unwrap();
        assert_eq!(
            invocation,
            ToolInvocation::GetAvailability(AvailabilityArgs {
                date: "2025-06-02".to_string(),
                subject: "Math".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_batch_accepts_numeric_days() {
        let invocation = ToolInvocation::parse(&call(
            "createBatchSchedule",
            r#"{"adminPassword":"pw","startDate":"2025-06-02","days":7,"subject":"Math","teacher":"Ms Tan"}"#,
        ))
        .unwrap();
        match invocation {
            ToolInvocation::CreateBatchSchedule(args) => assert_eq!(args.days, 7.0),
            other => panic!("unexpected invocation {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_argument_is_rejected() {
        let err = ToolInvocation::parse(&call("bookSlot", r#"{"date":"2025-06-02"}"#)).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Invalid arguments for tool 'bookSlot'"));
        assert!(message.contains("studentName"));
    }

    #[test]
    fn test_wrong_argument_type_is_rejected() {
        let err = ToolInvocation::parse(&call(
            "createBatchSchedule",
            r#"{"adminPassword":"pw","startDate":"2025-06-02","days":"seven","subject":"Math","teacher":"Ms Tan"}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = ToolInvocation::parse(&call("getAvailability", "{not json")).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_unknown_tool_is_an_explicit_error() {
        let err = ToolInvocation::parse(&call("deleteEverything", "{}")).unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool 'deleteEverything'");
    }

    #[test]
    fn test_debug_output_redacts_admin_password() {
        let invocation = ToolInvocation::parse(&call(
            "addSlot",
            r#"{"adminPassword":"hunter2","date":"2025-06-02","time":"10:00","subject":"Math","teacher":"Ms Tan"}"#,
        ))
        .unwrap();
        let debug = format!("{:?}", invocation);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_only_admin_tools_carry_a_password() {
        let add = ToolInvocation::parse(&call(
            "addSlot",
            r#"{"adminPassword":"pw","date":"2025-06-02","time":"10:00","subject":"Math","teacher":"Ms Tan"}"#,
        ))
        .unwrap();
        assert!(add.kind().is_restricted());
        assert_eq!(add.admin_password(), Some("pw"));

        let lookup =
            ToolInvocation::parse(&call("getAvailability", r#"{"date":"2025-06-02","subject":"Math"}"#)).unwrap();
        assert!(!lookup.kind().is_restricted());
        assert_eq!(lookup.admin_password(), None);
    }
}
