//! Conversation history for one session

use crate::types::ChatMessage;

/// Ordered, append-only list of conversation turns
///
/// The system prompt is never stored here; it is rendered fresh for every
/// backend call and prepended by `messages_for_backend`.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: Vec<ChatMessage>,
}

impl ConversationHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, turn: ChatMessage) {
        self.turns.push(turn);
    }

    /// All turns, oldest first
    pub fn turns(&self) -> &[ChatMessage] {
        &self.turns
    }

    /// Most recent turn
    pub fn last(&self) -> Option<&ChatMessage> {
        self.turns.last()
    }

    /// Number of stored turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether nothing has been said yet
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The system turn followed by every stored turn
    pub fn messages_for_backend(&self, system_prompt: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.turns.len() + 1);
        messages.push(ChatMessage::system(system_prompt));
        messages.extend(self.turns.iter().cloned());
        messages
    }
}
