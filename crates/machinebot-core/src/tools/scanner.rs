//! Tool marker scanning
//!
//! A model asks for a tool by writing `[TOOL: name]` anywhere in its answer.
//! The text is untrusted: anything that does not match the grammar exactly is
//! ordinary prose, and names are not checked against the registry here.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::ToolCall;

static TOOL_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[TOOL:\s*(\w+)\]").expect("tool marker pattern is valid"));

/// Tool names requested in `text`, in order of appearance, duplicates kept
pub fn extract_tool_names(text: &str) -> Vec<String> {
    TOOL_MARKER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Tool calls requested in `text`
pub fn extract_tool_calls(text: &str) -> Vec<ToolCall> {
    extract_tool_names(text).into_iter().map(ToolCall::new).collect()
}

/// Whether `text` holds at least one well-formed marker
pub fn contains_markers(text: &str) -> bool {
    TOOL_MARKER.is_match(text)
}
