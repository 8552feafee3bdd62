//! Tool management module
//!
//! This module provides the tool half of the chat protocol: what tools
//! exist, how a model asks for them, and how they are run.
//!
//! ## Architecture
//!
//! ```text
//! model text ──► scanner ──► [names] ──► ToolDispatcher ──► [ToolResult]
//!                                             │
//!                                             ▼
//!                                       ToolRegistry
//!                                  (name → SystemTool, ordered)
//! ```
//!
//! - `scanner`: finds `[TOOL: name]` markers in model output
//! - `ToolRegistry`: fixed, insertion-ordered catalogue built at startup
//! - `ToolDispatcher`: runs tools one at a time, turning every outcome
//!   into text
//! - `system`: the built-in host introspection tools

mod dispatcher;
mod error;
mod registry;
pub mod scanner;
pub mod system;

pub use dispatcher::ToolDispatcher;
pub use error::{RegistryError, RegistryResult, ToolError};
pub use registry::{SystemTool, ToolFilter, ToolRegistry};
pub use scanner::{contains_markers, extract_tool_calls, extract_tool_names};
