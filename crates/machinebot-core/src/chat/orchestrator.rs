//! Conversation orchestrator
//!
//! One `send` is one user turn, processed to completion:
//!
//! 1. The user text is appended to history.
//! 2. The backend sees a freshly rendered system prompt plus the history.
//! 3. If the reply holds no tool markers it is the answer.
//! 4. Otherwise every requested tool runs in order, the raw reply and a
//!    synthetic results turn are appended, and a second backend call
//!    produces the answer.
//!
//! At most two backend calls happen per turn; tool requests in the second
//! reply are not acted on.

use std::sync::Arc;

use crate::logging::Logger;
use crate::providers::{Provider, ProviderModelConfig, StreamChatOptions};
use crate::tools::{extract_tool_names, ToolDispatcher, ToolRegistry};
use crate::types::{CancellationToken, ChatMessage, ToolResult};

use super::error::ChatResult;
use super::history::ConversationHistory;
use super::prompt::render_system_prompt;

/// Hooks called while a turn runs tools
///
/// Both default to doing nothing.
pub trait TurnObserver: Send + Sync {
    /// A tool is about to run
    fn tool_started(&self, _name: &str) {}

    /// A tool finished (successfully or not)
    fn tool_finished(&self, _result: &ToolResult) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpObserver;

impl TurnObserver for NoOpObserver {}

/// The answer to one user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReply {
    /// Final assistant text
    pub content: String,
    /// Tools run during the turn, in execution order
    pub tool_results: Vec<ToolResult>,
}

impl TurnReply {
    /// Whether any tools ran during the turn
    pub fn used_tools(&self) -> bool {
        !self.tool_results.is_empty()
    }
}

/// Owns one session's history and drives the tool round-trip
pub struct Orchestrator {
    provider: Arc<dyn Provider>,
    model: ProviderModelConfig,
    options: StreamChatOptions,
    cancel_token: CancellationToken,
    dispatcher: ToolDispatcher,
    history: ConversationHistory,
    observer: Arc<dyn TurnObserver>,
    logger: Arc<dyn Logger>,
}

impl Orchestrator {
    /// Create an orchestrator with an empty history
    pub fn new(
        provider: Arc<dyn Provider>,
        model: ProviderModelConfig,
        registry: Arc<ToolRegistry>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            provider,
            model,
            options: StreamChatOptions::default(),
            cancel_token: CancellationToken::new(),
            dispatcher: ToolDispatcher::new(registry, Arc::clone(&logger)),
            history: ConversationHistory::new(),
            observer: Arc::new(NoOpObserver),
            logger,
        }
    }

    /// Set the generation options used for every backend call
    pub fn with_options(mut self, options: StreamChatOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the token backend calls observe
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// Set the tool progress observer
    pub fn with_observer(mut self, observer: Arc<dyn TurnObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Conversation so far
    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Tool registry the session runs against
    pub fn registry(&self) -> &ToolRegistry {
        self.dispatcher.registry()
    }

    /// Token observed by backend calls; cancel it to abort a running turn
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel_token
    }

    /// Model requests are sent to
    pub fn model(&self) -> &ProviderModelConfig {
        &self.model
    }

    /// System prompt as it is sent to the backend
    pub fn system_prompt(&self) -> String {
        render_system_prompt(self.registry())
    }

    /// Process one user turn to completion
    ///
    /// Backend failures propagate; the user turn (and, after a failed second
    /// call, the tool exchange) stays in history.
    pub async fn send(&mut self, user_text: &str) -> ChatResult<TurnReply> {
        self.history.push(ChatMessage::user(user_text));

        let first = self.call_backend().await?;
        let tool_names = extract_tool_names(&first);

        if tool_names.is_empty() {
            self.logger.debug("[Orchestrator] No tool markers in reply");
            self.history.push(ChatMessage::assistant(first.clone()));
            return Ok(TurnReply {
                content: first,
                tool_results: Vec::new(),
            });
        }

        self.logger.info(&format!(
            "[Orchestrator] Reply requested {} tool(s): {}",
            tool_names.len(),
            tool_names.join(", ")
        ));

        let mut tool_results = Vec::with_capacity(tool_names.len());
        for name in &tool_names {
            self.observer.tool_started(name);
            let result = self.dispatcher.execute(name).await;
            self.observer.tool_finished(&result);
            tool_results.push(result);
        }

        self.history.push(ChatMessage::assistant(first));
        self.history.push(ChatMessage::user(results_turn(&tool_results)));

        let answer = self.call_backend().await?;
        self.history.push(ChatMessage::assistant(answer.clone()));

        Ok(TurnReply {
            content: answer,
            tool_results,
        })
    }

    async fn call_backend(&self) -> ChatResult<String> {
        let messages = self.history.messages_for_backend(&self.system_prompt());
        self.logger.debug(&format!(
            "[Orchestrator] Calling {} with {} messages",
            self.provider.name(),
            messages.len()
        ));

        let reply = self
            .provider
            .chat(
                messages,
                self.model.clone(),
                self.options.clone(),
                self.cancel_token.clone(),
            )
            .await
            .map_err(|e| {
                self.logger.error(&format!("[Orchestrator] Backend call failed: {}", e));
                e
            })?;

        Ok(reply.content)
    }
}

/// Text of the synthetic user turn carrying tool results
pub fn results_turn(results: &[ToolResult]) -> String {
    let blocks: Vec<String> = results.iter().map(ToolResult::to_context_block).collect();
    format!(
        "Here are the tool results:\n\n{}\n\nPlease explain these results to me in a friendly, easy-to-understand way.",
        blocks.join("\n\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatError;
    use crate::logging::NoOpLogger;
    use crate::providers::MockProvider;
    use crate::tools::{SystemTool, ToolError};
    use crate::types::MessageRole;
    use parking_lot::Mutex;
    use serde_json::{json, Value};

    struct FixedTool(&'static str, Value);

    impl SystemTool for FixedTool {
        fn name(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            "Fixed output"
        }
        fn invoke(&self) -> Result<Value, ToolError> {
            Ok(self.1.clone())
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl TurnObserver for RecordingObserver {
        fn tool_started(&self, name: &str) {
            self.events.lock().push(format!("start {}", name));
        }
        fn tool_finished(&self, result: &ToolResult) {
            self.events.lock().push(format!("done {} error={}", result.tool_name, result.is_error));
        }
    }

    fn registry() -> Arc<ToolRegistry> {
        let registry = ToolRegistry::new()
            .with_tool(Arc::new(FixedTool("get_cpu_info", json!({ "cores": 8 }))))
            .unwrap()
            .with_tool(Arc::new(FixedTool("get_uptime", json!({ "uptime": "1d 0h 0m 0s" }))))
            .unwrap();
        Arc::new(registry)
    }

    fn orchestrator(provider: Arc<MockProvider>) -> Orchestrator {
        Orchestrator::new(
            provider,
            ProviderModelConfig::new("llama3.2"),
            registry(),
            Arc::new(NoOpLogger),
        )
    }

    #[tokio::test]
    async fn test_plain_reply() {
        let provider = Arc::new(MockProvider::scripted(["Hello there!"], Arc::new(NoOpLogger)));
        let mut bot = orchestrator(Arc::clone(&provider));

        let reply = bot.send("hi").await.unwrap();

        assert_eq!(reply.content, "Hello there!");
        assert!(!reply.used_tools());
        assert_eq!(provider.call_count(), 1);
        assert_eq!(bot.history().len(), 2);

        let request = &provider.requests()[0];
        assert_eq!(request.len(), 2);
        assert_eq!(request[0].role, MessageRole::System);
        assert_eq!(request[0].content, bot.system_prompt());
        assert_eq!(request[1], ChatMessage::user("hi"));
    }

    #[tokio::test]
    async fn test_tool_round_trip() {
        let provider = Arc::new(MockProvider::scripted(
            ["Checking [TOOL: get_uptime] and [TOOL: get_cpu_info]", "All good."],
            Arc::new(NoOpLogger),
        ));
        let observer = Arc::new(RecordingObserver::default());
        let mut bot = orchestrator(Arc::clone(&provider)).with_observer(observer.clone());

        let reply = bot.send("how is my machine?").await.unwrap();

        assert_eq!(reply.content, "All good.");
        assert_eq!(provider.call_count(), 2);

        let turns = bot.history().turns();
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0], ChatMessage::user("how is my machine?"));
        assert_eq!(
            turns[1],
            ChatMessage::assistant("Checking [TOOL: get_uptime] and [TOOL: get_cpu_info]")
        );
        assert_eq!(
            turns[2],
            ChatMessage::user(
                "Here are the tool results:\n\n\
                 Results from get_uptime:\n{\n  \"uptime\": \"1d 0h 0m 0s\"\n}\n\n\
                 Results from get_cpu_info:\n{\n  \"cores\": 8\n}\n\n\
                 Please explain these results to me in a friendly, easy-to-understand way."
            )
        );
        assert_eq!(turns[3], ChatMessage::assistant("All good."));

        // Second request carries a fresh system turn and the whole history so far
        let second = &provider.requests()[1];
        assert_eq!(second.len(), 4);
        assert_eq!(second[0].role, MessageRole::System);
        assert_eq!(&second[1..], &turns[..3]);

        assert_eq!(
            *observer.events.lock(),
            vec![
                "start get_uptime",
                "done get_uptime error=false",
                "start get_cpu_info",
                "done get_cpu_info error=false",
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_goes_to_the_model() {
        let provider = Arc::new(MockProvider::scripted(
            ["[TOOL: get_weather]", "I can't check the weather."],
            Arc::new(NoOpLogger),
        ));
        let mut bot = orchestrator(Arc::clone(&provider));

        let reply = bot.send("weather?").await.unwrap();

        assert_eq!(reply.tool_results.len(), 1);
        assert!(reply.tool_results[0].is_error);
        assert!(bot.history().turns()[2]
            .content
            .contains("Results from get_weather:\nUnknown tool: get_weather"));
    }

    #[tokio::test]
    async fn test_second_reply_markers_are_not_followed() {
        let provider = Arc::new(MockProvider::scripted(
            ["[TOOL: get_uptime]", "Let me also check [TOOL: get_cpu_info]"],
            Arc::new(NoOpLogger),
        ));
        let mut bot = orchestrator(Arc::clone(&provider));

        let reply = bot.send("uptime?").await.unwrap();

        assert_eq!(reply.content, "Let me also check [TOOL: get_cpu_info]");
        assert_eq!(reply.tool_results.len(), 1);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_backend_failure_keeps_user_turn() {
        let provider = Arc::new(MockProvider::scripted(
            ["__ERROR__:connection refused", "Back online."],
            Arc::new(NoOpLogger),
        ));
        let mut bot = orchestrator(Arc::clone(&provider));

        let err = bot.send("hello?").await.unwrap_err();
        assert!(matches!(err, ChatError::Backend(_)));
        assert_eq!(bot.history().len(), 1);

        let reply = bot.send("still there?").await.unwrap();
        assert_eq!(reply.content, "Back online.");
        assert_eq!(bot.history().len(), 3);
    }

    #[tokio::test]
    async fn test_cancelled_token_fails_the_turn() {
        let provider = Arc::new(
            MockProvider::scripted(["a reply long enough to need several chunks"], Arc::new(NoOpLogger))
                .with_chunk_size(4),
        );
        let token = CancellationToken::new();
        let mut bot = orchestrator(Arc::clone(&provider)).with_cancel_token(token.clone());

        bot.cancel_token().cancel();
        assert!(token.is_cancelled());

        let err = bot.send("hello").await.unwrap_err();
        assert!(matches!(err, ChatError::Backend(crate::providers::ProviderError::Cancelled)));
    }

    #[test]
    fn test_results_turn_format() {
        let text = results_turn(&[
            ToolResult::success("a", "1"),
            ToolResult::error("b", "Unknown tool: b"),
        ]);
        assert_eq!(
            text,
            "Here are the tool results:\n\nResults from a:\n1\n\nResults from b:\nUnknown tool: b\n\n\
             Please explain these results to me in a friendly, easy-to-understand way."
        );
    }
}
