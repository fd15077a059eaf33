use crate::error::{BotError, Result};
use crate::models::{Message, ToolCall};
use serde_json::Value;

fn first_message(response_json: &Value) -> Result<&Value> {
    let choices = response_json
        .get("choices")
        .and_then(|c| c.as_array())
        .ok_or_else(|| BotError::Other("No choices in response".to_string()))?;

    let first_choice = choices
        .first()
        .ok_or_else(|| BotError::Other("Empty choices array".to_string()))?;

    first_choice
        .get("message")
        .ok_or_else(|| BotError::Other("No message in response".to_string()))
}

/// Parse a completion response and extract tool calls if present
pub fn parse_tool_calls(response_json: &Value) -> Result<Option<Vec<ToolCall>>> {
    let message = first_message(response_json)?;

    match message.get("tool_calls") {
        Some(Value::Array(calls)) if !calls.is_empty() => {
            let calls = calls
                .iter()
                .map(|call| serde_json::from_value::<ToolCall>(call.clone()))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(Some(calls))
        }
        _ => Ok(None),
    }
}

/// Extract content from a completion response
pub fn extract_content(response_json: &Value) -> Result<Option<String>> {
    let message = first_message(response_json)?;

    Ok(message
        .get("content")
        .and_then(|c| c.as_str())
        .map(|s| s.to_string()))
}

/// The assistant turn carried by a completion response.
pub fn parse_assistant_message(response_json: &Value) -> Result<Message> {
    let content = extract_content(response_json)?;
    match parse_tool_calls(response_json)? {
        Some(tool_calls) => Ok(Message::assistant_with_tools(content, tool_calls)),
        None => Ok(Message::assistant(content.unwrap_or_default())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use serde_json::json;

    #[test]
    fn test_extract_content_with_content() {
        let response = json!({
            "choices": [{
                "message": {
                    "content": "Hello, world!",
                    "role": "assistant"
                }
            }]
        });

        let content = extract_content(&response).unwrap();
        assert_eq!(content, Some("Hello, world!".to_string()));
    }

    #[test]
    fn test_extract_content_empty_choices() {
        let response = json!({
            "choices": []
        });

        let result = extract_content(&response);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_tool_calls_with_tools() {
        let response = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [
                        {
                            "id": "call_123",
                            "type": "function",
                            "function": {
                                "name": "getAvailability",
                                "arguments": "{\"date\": \"2025-06-02\", \"subject\": \"Math\"}"
                            }
                        }
                    ]
                }
            }]
        });

        let calls = parse_tool_calls(&response).unwrap().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "call_123");
        assert_eq!(calls[0].function.name, "getAvailability");
    }

    #[test]
    fn test_parse_tool_calls_empty_array() {
        let response = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "tool_calls": []
                }
            }]
        });

        assert!(parse_tool_calls(&response).unwrap().is_none());
    }

    #[test]
    fn test_parse_assistant_message_without_tools() {
        let response = json!({
            "choices": [{
                "message": { "role": "assistant", "content": "We open at 10am." }
            }]
        });

        let message = parse_assistant_message(&response).unwrap();
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.text_content(), "We open at 10am.");
        assert!(message.tool_calls.is_none());
    }
}
