//! Core types for chat and tool interactions
//!
//! This module contains the shared types used across providers, tools and
//! the chat orchestrator.

mod message;
mod tool;
mod stream;
mod cancellation;

pub use message::{ChatMessage, MessageRole};
pub use tool::{Tool, ToolCall, ToolResult};
pub use stream::StreamChunk;
pub use cancellation::CancellationToken;
