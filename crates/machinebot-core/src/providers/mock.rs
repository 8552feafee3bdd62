//! Mock provider for testing
//!
//! Provides deterministic, configurable responses without network dependencies.
//! Every request is recorded so tests can assert how many backend calls a
//! chat turn made and which messages they carried.

use async_trait::async_trait;
use futures::{stream, StreamExt};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use super::error::{ProviderError, ProviderResult};
use super::traits::{Provider, ProviderModelConfig, StreamChatOptions, StreamResponse};
use crate::logging::Logger;
use crate::types::{CancellationToken, ChatMessage, MessageRole, StreamChunk};

const ERROR_MARKER: &str = "__ERROR__:";

/// Mock response mode
#[derive(Debug, Clone, Default)]
pub enum MockMode {
    /// Echo back the last user message
    #[default]
    Echo,
    /// Return the n-th reply on the n-th request; a reply starting with
    /// `__ERROR__:` fails that request instead
    Scripted(Vec<String>),
}

/// Configuration for the mock provider
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Response mode
    pub mode: MockMode,
    /// Delay between chunks in milliseconds (0 = no delay)
    pub chunk_delay_ms: u64,
    /// Size of each chunk when splitting replies
    pub chunk_size: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            mode: MockMode::Echo,
            chunk_delay_ms: 0,
            chunk_size: 10,
        }
    }
}

/// Mock LLM provider for testing
pub struct MockProvider {
    config: MockConfig,
    logger: Arc<dyn Logger>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockProvider {
    /// Create a new mock provider with default config
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self::with_config(MockConfig::default(), logger)
    }

    /// Create with specific config
    pub fn with_config(config: MockConfig, logger: Arc<dyn Logger>) -> Self {
        Self {
            config,
            logger,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create an echo provider (echoes back user message)
    pub fn echo(logger: Arc<dyn Logger>) -> Self {
        Self::with_config(
            MockConfig {
                mode: MockMode::Echo,
                ..Default::default()
            },
            logger,
        )
    }

    /// Create a provider replying from a script, one entry per request
    pub fn scripted<I, S>(replies: I, logger: Arc<dyn Logger>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(
            MockConfig {
                mode: MockMode::Scripted(replies.into_iter().map(Into::into).collect()),
                ..Default::default()
            },
            logger,
        )
    }

    /// Set chunk delay
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.config.chunk_delay_ms = delay_ms;
        self
    }

    /// Set chunk size for splitting responses
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Messages of every request received so far, oldest first
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().clone()
    }

    /// Extract last user message content
    fn get_last_user_message(&self, messages: &[ChatMessage]) -> String {
        messages
            .iter()
            .rev()
            .find(|msg| msg.role == MessageRole::User && !msg.content.is_empty())
            .map(|msg| msg.content.clone())
            .unwrap_or_else(|| "Hello from MockProvider!".to_string())
    }

    /// Split text into chunks
    fn split_into_chunks(&self, text: &str) -> Vec<String> {
        if self.config.chunk_size == 0 || text.is_empty() {
            return vec![text.to_string()];
        }

        text.chars()
            .collect::<Vec<_>>()
            .chunks(self.config.chunk_size)
            .map(|c| c.iter().collect())
            .collect()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn default_api_base(&self) -> &str {
        "http://localhost:0/mock"
    }

    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        _model: ProviderModelConfig,
        _options: StreamChatOptions,
        cancel_token: CancellationToken,
    ) -> ProviderResult<StreamResponse> {
        self.logger.debug("MockProvider: stream_chat called");

        let request_index = {
            let mut requests = self.requests.lock();
            requests.push(messages.clone());
            requests.len() - 1
        };

        let chunks: Vec<String> = match &self.config.mode {
            MockMode::Echo => {
                let user_msg = self.get_last_user_message(&messages);
                self.logger.debug(&format!("MockProvider: Echo mode, echoing: {}", user_msg));
                self.split_into_chunks(&format!("Echo: {}", user_msg))
            }
            MockMode::Scripted(replies) => {
                let reply = replies.get(request_index).ok_or_else(|| {
                    ProviderError::Other(format!(
                        "Mock script exhausted after {} replies",
                        replies.len()
                    ))
                })?;
                self.logger.debug(&format!("MockProvider: Scripted reply #{}", request_index));
                if reply.starts_with(ERROR_MARKER) {
                    vec![reply.clone()]
                } else {
                    self.split_into_chunks(reply)
                }
            }
        };

        let delay_ms = self.config.chunk_delay_ms;
        let logger = self.logger.clone();

        let stream = stream::iter(chunks.into_iter().enumerate())
            .then(move |(i, chunk)| {
                let logger = logger.clone();
                let cancel = cancel_token.clone();
                async move {
                    if cancel.is_cancelled() {
                        return Err(ProviderError::Cancelled);
                    }

                    // Apply delay (except for first chunk)
                    if i > 0 && delay_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    }

                    if let Some(msg) = chunk.strip_prefix(ERROR_MARKER) {
                        return Err(ProviderError::Other(format!("Mock error: {}", msg)));
                    }

                    logger.debug(&format!("MockProvider: Yielding chunk {}: '{}'", i, chunk));
                    Ok(StreamChunk::Text { text: chunk })
                }
            });

        Ok(Box::pin(stream))
    }
}
