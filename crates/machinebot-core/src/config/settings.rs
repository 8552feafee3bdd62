//! Settings model for the bot

use serde::{Deserialize, Serialize};

use crate::providers::StreamChatOptions;

/// Complete bot configuration (one YAML document)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BotConfig {
    /// Chat backend selection
    #[serde(default)]
    pub model: ModelSettings,

    /// Startup model provisioning
    #[serde(default)]
    pub provisioning: ProvisionSettings,

    /// Built-in tool behaviour
    #[serde(default)]
    pub tools: ToolSettings,
}

impl BotConfig {
    /// Whether chat goes to an Ollama server
    pub fn uses_ollama(&self) -> bool {
        self.model.provider.eq_ignore_ascii_case("ollama")
    }

    /// Ollama server to provision models on
    ///
    /// When chatting with Ollama through a custom `model.api_base`, models
    /// must be provisioned on that same server.
    pub fn provisioning_host(&self) -> &str {
        match &self.model.api_base {
            Some(base) if self.uses_ollama() => base.trim_end_matches('/'),
            _ => &self.provisioning.ollama_host,
        }
    }
}

/// Which backend and model answer the chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Provider identifier (ollama, openai, anthropic, ...)
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model name as the provider knows it
    #[serde(default = "default_model")]
    pub name: String,
    /// Custom API base URL for the chat backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// API key; falls back to the provider's environment variable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens per reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ModelSettings {
    /// Generation options for every backend call
    pub fn stream_options(&self) -> StreamChatOptions {
        let mut options = StreamChatOptions::new();
        if let Some(temperature) = self.temperature {
            options = options.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            options = options.with_max_tokens(max_tokens);
        }
        options
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            name: default_model(),
            api_base: None,
            api_key: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

fn default_provider() -> String {
    "ollama".to_string()
}

fn default_model() -> String {
    "llama3.2".to_string()
}

/// Model provisioning performed once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionSettings {
    /// Pull the model when the Ollama server does not have it
    #[serde(default = "default_auto_pull")]
    pub auto_pull: bool,
    /// Base URL of the Ollama server
    #[serde(default = "default_ollama_host")]
    pub ollama_host: String,
}

impl Default for ProvisionSettings {
    fn default() -> Self {
        Self {
            auto_pull: default_auto_pull(),
            ollama_host: default_ollama_host(),
        }
    }
}

fn default_auto_pull() -> bool {
    true
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

/// Built-in tool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Tool names left out of the registry
    #[serde(default)]
    pub disabled: Vec<String>,
    /// Number of processes reported by `get_process_info`
    #[serde(default = "default_process_limit")]
    pub process_limit: usize,
    /// CPU usage sampling window in milliseconds
    #[serde(default = "default_cpu_sample_ms")]
    pub cpu_sample_ms: u64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            disabled: Vec::new(),
            process_limit: default_process_limit(),
            cpu_sample_ms: default_cpu_sample_ms(),
        }
    }
}

fn default_process_limit() -> usize {
    10
}

fn default_cpu_sample_ms() -> u64 {
    1000
}
