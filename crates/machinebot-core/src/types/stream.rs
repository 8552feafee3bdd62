//! Streaming response types

use serde::{Deserialize, Serialize};

/// Streaming chunk from an LLM response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamChunk {
    /// Answer text
    Text {
        text: String,
    },
    /// Reasoning text from thinking models; never part of the answer
    Reasoning {
        text: String,
    },
}

impl StreamChunk {
    /// Create a text chunk
    pub fn text(text: impl Into<String>) -> Self {
        StreamChunk::Text { text: text.into() }
    }

    /// Create a reasoning chunk
    pub fn reasoning(text: impl Into<String>) -> Self {
        StreamChunk::Reasoning { text: text.into() }
    }

    /// Check if this is a text chunk
    pub fn is_text(&self) -> bool {
        matches!(self, StreamChunk::Text { .. })
    }

    /// Get the text content if this is a text chunk
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StreamChunk::Text { text } => Some(text),
            _ => None,
        }
    }
}
