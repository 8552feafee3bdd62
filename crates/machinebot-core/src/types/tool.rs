//! Tool calling types
//!
//! Tools take no arguments: a call is identified by the tool name alone.

use serde::{Deserialize, Serialize};

/// Tool definition as advertised to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name (unique registry key)
    pub name: String,
    /// Description of what the tool does
    pub description: String,
}

impl Tool {
    /// Create a new tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Render as a capability line for the system prompt
    pub fn prompt_line(&self) -> String {
        format!("- {}: {}", self.name, self.description)
    }
}

/// Tool call extracted from model text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool being called
    pub name: String,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Outcome of one tool execution, already normalized to text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was requested
    #[serde(rename = "toolName")]
    pub tool_name: String,
    /// Indented JSON on success, or an error sentence
    pub payload: String,
    /// Whether this result represents an error
    #[serde(rename = "isError", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(tool_name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            payload: payload.into(),
            is_error: false,
        }
    }

    /// Create an error tool result
    pub fn error(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            payload: message.into(),
            is_error: true,
        }
    }

    /// Section of the synthetic results turn for this result
    pub fn to_context_block(&self) -> String {
        format!("Results from {}:\n{}", self.tool_name, self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_line() {
        let tool = Tool::new("get_uptime", "Get system boot time and uptime duration");
        assert_eq!(
            tool.prompt_line(),
            "- get_uptime: Get system boot time and uptime duration"
        );
    }

    #[test]
    fn test_tool_result() {
        let success = ToolResult::success("get_cpu_info", "{}");
        assert!(!success.is_error);

        let error = ToolResult::error("get_cpu_info", "Error executing get_cpu_info: boom");
        assert!(error.is_error);
    }

    #[test]
    fn test_context_block() {
        let result = ToolResult::success("get_uptime", "{\n  \"uptime\": \"1d 0h 0m 0s\"\n}");
        assert_eq!(
            result.to_context_block(),
            "Results from get_uptime:\n{\n  \"uptime\": \"1d 0h 0m 0s\"\n}"
        );
    }

    #[test]
    fn test_error_flag_not_serialized_when_false() {
        let json = serde_json::to_string(&ToolResult::success("t", "p")).unwrap();
        assert!(!json.contains("isError"));
    }
}
