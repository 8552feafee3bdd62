//! LLM Provider implementations
//!
//! This module contains the provider abstraction the chat orchestrator talks
//! to, and its implementations.
//!
//! ## Architecture
//!
//! All real backends use the `genai` crate, which handles streaming and the
//! provider-specific protocols. Ollama is the default and needs no API key.
//!
//! Model provisioning (listing and pulling Ollama models) is separate from
//! chatting and lives in `ollama`.
//!
//! The `MockProvider` is kept for testing purposes.

mod traits;
mod error;
mod genai_adapter;
mod genai_provider;
mod mock;
mod ollama;

// Core traits and types
pub use traits::{Provider, ProviderModelConfig, StreamChatOptions, StreamResponse};
pub use error::{ProviderError, ProviderResult};

// The main provider - handles all LLM providers via genai
pub use genai_provider::GenaiProvider;
pub use genai_adapter::{api_key_env_vars, is_genai_supported, resolve_api_key};

// Mock provider for testing
pub use mock::{MockProvider, MockConfig, MockMode};

// Startup provisioning
pub use ollama::{ensure_model, is_model_listed, ModelProvisioner, OllamaClient, ProvisionOutcome};

use crate::logging::Logger;
use std::sync::Arc;

/// Create a provider for the given provider ID
///
/// `mock` gives an echoing `MockProvider`; every other ID goes to
/// `GenaiProvider`, which lets genai infer the protocol for IDs it does not
/// know explicitly.
pub fn create_provider(provider_id: &str, logger: Arc<dyn Logger>) -> Arc<dyn Provider> {
    match provider_id.to_lowercase().as_str() {
        "mock" => Arc::new(MockProvider::echo(logger)),
        _ => Arc::new(GenaiProvider::new(provider_id, logger)),
    }
}

/// List all supported provider IDs
pub fn supported_providers() -> Vec<&'static str> {
    vec![
        "ollama",
        "openai",
        "anthropic",
        "gemini",
        "groq",
        "xai",
        "deepseek",
        "cohere",
        "openrouter",
        "mistral",
        // Testing
        "mock",
    ]
}
