//! Chat session
//!
//! The `Orchestrator` owns one conversation and runs the tool round-trip
//! for each user turn; `ConversationHistory` is its append-only record and
//! `prompt` renders the system turn from the tool registry.

mod error;
mod history;
mod orchestrator;
mod prompt;

pub use error::{ChatError, ChatResult};
pub use history::ConversationHistory;
pub use orchestrator::{results_turn, NoOpObserver, Orchestrator, TurnObserver, TurnReply};
pub use prompt::{render_system_prompt, SYSTEM_PROMPT_TEMPLATE};
