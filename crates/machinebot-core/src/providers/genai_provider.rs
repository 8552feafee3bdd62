//! GenaiProvider - Unified provider using the genai crate
//!
//! Handles Ollama (the default local backend) as well as the hosted
//! providers genai supports, through one streaming code path.

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;

use genai::chat::{ChatRequest, ChatStreamEvent};

use crate::logging::Logger;
use crate::types::{CancellationToken, ChatMessage};

use super::error::{ProviderError, ProviderResult};
use super::genai_adapter::{
    create_client, from_genai_event, is_genai_supported, to_genai_messages, to_genai_options,
    ProviderConfig,
};
use super::traits::{Provider, ProviderModelConfig, StreamChatOptions, StreamResponse};

/// Unified provider using genai for all supported LLM APIs
pub struct GenaiProvider {
    /// Provider identifier
    provider_id: String,
    /// Logger for debug output
    logger: Arc<dyn Logger>,
}

impl GenaiProvider {
    /// Create a new GenaiProvider
    pub fn new(provider_id: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self {
            provider_id: provider_id.into(),
            logger,
        }
    }

    /// Check if this provider can handle the given provider ID
    pub fn supports(provider_id: &str) -> bool {
        is_genai_supported(provider_id)
    }

    /// Strip a leading `provider/` from a model string
    ///
    /// Only the provider's own prefix is removed: Ollama model names such as
    /// `library/llama3` legitimately contain slashes.
    pub fn strip_provider_prefix<'a>(provider_id: &str, model: &'a str) -> &'a str {
        match model.split_once('/') {
            Some((prefix, rest)) if prefix.eq_ignore_ascii_case(provider_id) => rest,
            _ => model,
        }
    }
}

#[async_trait]
impl Provider for GenaiProvider {
    fn name(&self) -> &str {
        &self.provider_id
    }

    fn default_api_base(&self) -> &str {
        match self.provider_id.as_str() {
            "ollama" => "http://localhost:11434/",
            "openai" => "https://api.openai.com/v1/",
            "anthropic" => "https://api.anthropic.com/",
            "gemini" => "https://generativelanguage.googleapis.com/",
            "groq" => "https://api.groq.com/openai/v1/",
            "xai" => "https://api.x.ai/v1/",
            "deepseek" => "https://api.deepseek.com/",
            "cohere" => "https://api.cohere.ai/",
            "openrouter" => "https://openrouter.ai/api/v1/",
            "mistral" => "https://api.mistral.ai/v1/",
            _ => "https://api.openai.com/v1/",
        }
    }

    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        model_config: ProviderModelConfig,
        options: StreamChatOptions,
        cancel_token: CancellationToken,
    ) -> ProviderResult<StreamResponse> {
        self.logger.info(&format!(
            "[GenaiProvider] stream_chat called: provider={}, model={}, endpoint={}, messages={}",
            self.provider_id,
            model_config.model,
            self.get_api_base(&model_config),
            messages.len()
        ));

        let config = ProviderConfig {
            provider: self.provider_id.clone(),
            api_key: model_config.api_key.clone(),
            api_base: model_config.api_base.clone(),
        };
        let client = create_client(&config);

        let chat_req = ChatRequest::new(to_genai_messages(messages));
        let genai_options = to_genai_options(&options);
        let model_name = Self::strip_provider_prefix(&self.provider_id, &model_config.model);

        let chat_stream = client
            .exec_chat_stream(model_name, chat_req, Some(&genai_options))
            .await
            .map_err(|e| ProviderError::ApiError {
                status: 500,
                message: e.to_string(),
                provider: self.provider_id.clone(),
            })?;

        self.logger.debug("[GenaiProvider] Stream started successfully");

        let cancel = cancel_token.clone();
        let logger = Arc::clone(&self.logger);
        let provider_id = self.provider_id.clone();

        let stream = chat_stream.stream.filter_map(move |result| {
            let cancel = cancel.clone();
            let logger = Arc::clone(&logger);
            let provider_id = provider_id.clone();

            async move {
                if cancel.is_cancelled() {
                    logger.info("[GenaiProvider] Stream cancelled");
                    return Some(Err(ProviderError::Cancelled));
                }

                match result {
                    Ok(event) => {
                        match &event {
                            ChatStreamEvent::Start => {
                                logger.debug("[GenaiProvider] Stream event: Start");
                            }
                            ChatStreamEvent::End(_) => {
                                logger.debug("[GenaiProvider] Stream event: End");
                            }
                            _ => {}
                        }

                        from_genai_event(event)
                    }
                    Err(e) => {
                        logger.error(&format!("[GenaiProvider] Stream error: {}", e));
                        Some(Err(ProviderError::ApiError {
                            status: 500,
                            message: e.to_string(),
                            provider: provider_id,
                        }))
                    }
                }
            }
        });

        Ok(Box::pin(stream))
    }
}
