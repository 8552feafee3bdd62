//! Adapter between machinebot-core types and genai types
//!
//! This module provides conversion functions between our types and genai's types,
//! allowing us to leverage genai's streaming and provider implementations.
//!
//! Auth comes from the configured API key first and the provider's
//! environment variable second; Ollama needs neither.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use genai::chat::{
    ChatMessage as GenaiMessage, ChatOptions as GenaiOptions, ChatRole as GenaiRole,
    ChatStreamEvent,
};
use genai::resolver::{AuthData, AuthResolver, Endpoint, ServiceTargetResolver};
use genai::{adapter::AdapterKind, Client, ModelIden, ServiceTarget};
use once_cell::sync::Lazy;

use crate::types::{ChatMessage, MessageRole, StreamChunk};

use super::error::ProviderError;
use super::traits::StreamChatOptions;

// ============================================================================
// Message Conversion: machinebot -> genai
// ============================================================================

/// Convert a ChatMessage to genai ChatMessage
pub fn to_genai_message(msg: ChatMessage) -> GenaiMessage {
    match msg.role {
        MessageRole::System => GenaiMessage::system(msg.content),
        MessageRole::User => GenaiMessage::user(msg.content),
        MessageRole::Assistant => GenaiMessage::assistant(msg.content),
    }
}

/// Convert a vector of messages to genai messages
pub fn to_genai_messages(messages: Vec<ChatMessage>) -> Vec<GenaiMessage> {
    messages.into_iter().map(to_genai_message).collect()
}

// ============================================================================
// Options Conversion: machinebot -> genai
// ============================================================================

/// Convert StreamChatOptions to genai ChatOptions
pub fn to_genai_options(options: &StreamChatOptions) -> GenaiOptions {
    let mut genai_opts = GenaiOptions::default();

    if let Some(temp) = options.temperature {
        genai_opts = genai_opts.with_temperature(temp as f64);
    }

    if let Some(max_tokens) = options.max_tokens {
        genai_opts = genai_opts.with_max_tokens(max_tokens);
    }

    genai_opts
}

// ============================================================================
// Response Conversion: genai -> machinebot
// ============================================================================

/// Convert genai stream event to a StreamChunk
///
/// Native tool-call events are dropped: tool requests are read from the
/// answer text, never from function-calling fields.
pub fn from_genai_event(event: ChatStreamEvent) -> Option<Result<StreamChunk, ProviderError>> {
    match event {
        ChatStreamEvent::Chunk(chunk) => Some(Ok(StreamChunk::Text {
            text: chunk.content,
        })),
        ChatStreamEvent::ReasoningChunk(chunk) => Some(Ok(StreamChunk::Reasoning {
            text: chunk.content,
        })),
        _ => None,
    }
}

// ============================================================================
// Provider Resolution
// ============================================================================

/// Provider configuration for routing
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider identifier (e.g., "ollama", "openai", "openrouter")
    pub provider: String,
    /// API key for authentication
    pub api_key: Option<String>,
    /// Custom API base URL
    pub api_base: Option<String>,
}

/// Map a provider ID to the genai adapter that speaks its protocol
pub fn adapter_kind_for(provider: &str) -> Option<AdapterKind> {
    match provider.to_lowercase().as_str() {
        "ollama" => Some(AdapterKind::Ollama),
        "openai" => Some(AdapterKind::OpenAI),
        "anthropic" => Some(AdapterKind::Anthropic),
        "gemini" | "google" => Some(AdapterKind::Gemini),
        "groq" => Some(AdapterKind::Groq),
        "xai" => Some(AdapterKind::Xai),
        "deepseek" => Some(AdapterKind::DeepSeek),
        "cohere" => Some(AdapterKind::Cohere),
        // OpenAI-compatible endpoints
        "openrouter" | "mistral" => Some(AdapterKind::OpenAI),
        _ => None,
    }
}

/// Fixed endpoint for OpenAI-compatible providers genai does not know natively
fn compat_endpoint(provider: &str) -> Option<&'static str> {
    match provider.to_lowercase().as_str() {
        "openrouter" => Some("https://openrouter.ai/api/v1/"),
        "mistral" => Some("https://api.mistral.ai/v1/"),
        _ => None,
    }
}

/// Mapping from provider names to environment variable names
static ENV_VAR_MAP: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("openai", vec!["OPENAI_API_KEY"]);
    m.insert("anthropic", vec!["ANTHROPIC_API_KEY"]);
    m.insert("gemini", vec!["GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    m.insert("google", vec!["GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    m.insert("groq", vec!["GROQ_API_KEY"]);
    m.insert("xai", vec!["XAI_API_KEY"]);
    m.insert("deepseek", vec!["DEEPSEEK_API_KEY"]);
    m.insert("cohere", vec!["COHERE_API_KEY"]);
    m.insert("mistral", vec!["MISTRAL_API_KEY"]);
    m.insert("openrouter", vec!["OPENROUTER_API_KEY"]);
    m.insert("ollama", vec![]); // Ollama doesn't need an API key
    m
});

/// Environment variables consulted for a provider's API key, in order
pub fn api_key_env_vars(provider: &str) -> Vec<String> {
    let provider = provider.to_lowercase();
    match ENV_VAR_MAP.get(provider.as_str()) {
        Some(vars) => vars.iter().map(|v| v.to_string()).collect(),
        None => vec![format!("{}_API_KEY", provider.to_uppercase())],
    }
}

/// Resolve an API key: explicit value first, then the environment
pub fn resolve_api_key(provider: &str, explicit: Option<&str>) -> Option<String> {
    if let Some(key) = explicit {
        return Some(key.to_string());
    }

    api_key_env_vars(provider)
        .into_iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
}

// ============================================================================
// Client Creation with Custom Auth
// ============================================================================

/// Create a genai Client with custom auth and endpoint resolution
pub fn create_client(config: &ProviderConfig) -> Client {
    let auth_provider = config.provider.clone();
    let auth_explicit_key = config.api_key.clone();

    let auth_resolver = AuthResolver::from_resolver_async_fn(
        move |_model_iden: ModelIden| -> Pin<Box<dyn Future<Output = genai::resolver::Result<Option<AuthData>>> + Send>> {
            let provider = auth_provider.clone();
            let explicit_key = auth_explicit_key.clone();

            Box::pin(async move {
                // None lets genai proceed without auth, which is what Ollama wants
                Ok(resolve_api_key(&provider, explicit_key.as_deref()).map(AuthData::from_single))
            })
        },
    );

    let target_provider = config.provider.clone();
    let target_api_base = config.api_base.clone();

    let target_resolver = ServiceTargetResolver::from_resolver_fn(
        move |target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
            let Some(adapter_kind) = adapter_kind_for(&target_provider) else {
                // Unknown provider - let genai infer from the model name
                return Ok(target);
            };

            let endpoint = match (&target_api_base, compat_endpoint(&target_provider)) {
                (Some(base), _) => Endpoint::from_owned(base.clone()),
                (None, Some(url)) => Endpoint::from_static(url),
                (None, None) => target.endpoint,
            };
            let model = ModelIden::new(adapter_kind, target.model.model_name.clone());

            Ok(ServiceTarget {
                endpoint,
                auth: target.auth, // Auth is handled by AuthResolver
                model,
            })
        },
    );

    Client::builder()
        .with_auth_resolver(auth_resolver)
        .with_service_target_resolver(target_resolver)
        .build()
}

/// Check if a provider can be handled by genai
pub fn is_genai_supported(provider: &str) -> bool {
    adapter_kind_for(provider).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_conversion() {
        let msg = ChatMessage::user("Hello, world!");
        let genai_msg = to_genai_message(msg);
        assert!(matches!(genai_msg.role, GenaiRole::User));

        let msg = ChatMessage::system("You are helpful");
        let genai_msg = to_genai_message(msg);
        assert!(matches!(genai_msg.role, GenaiRole::System));

        let msg = ChatMessage::assistant("[TOOL: get_uptime]");
        let genai_msg = to_genai_message(msg);
        assert!(matches!(genai_msg.role, GenaiRole::Assistant));
    }

    #[test]
    fn test_provider_detection() {
        assert!(matches!(adapter_kind_for("ollama"), Some(AdapterKind::Ollama)));
        assert!(matches!(adapter_kind_for("OpenAI"), Some(AdapterKind::OpenAI)));
        assert!(matches!(adapter_kind_for("openrouter"), Some(AdapterKind::OpenAI)));
        assert!(adapter_kind_for("unknown_provider").is_none());

        assert!(is_genai_supported("anthropic"));
        assert!(is_genai_supported("mistral"));
        assert!(!is_genai_supported("unknown_provider"));
    }

    #[test]
    fn test_api_key_env_vars() {
        assert_eq!(api_key_env_vars("openai"), vec!["OPENAI_API_KEY".to_string()]);
        assert!(api_key_env_vars("ollama").is_empty());
        assert_eq!(api_key_env_vars("acme"), vec!["ACME_API_KEY".to_string()]);
    }

    #[test]
    fn test_explicit_api_key_wins() {
        assert_eq!(
            resolve_api_key("openai", Some("sk-explicit")),
            Some("sk-explicit".to_string())
        );
        assert_eq!(resolve_api_key("ollama", None), None);
    }
}
