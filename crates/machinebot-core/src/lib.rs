//! machinebot core
//!
//! A local chat agent that answers questions about the machine it runs on.
//! The model asks for system data by writing `[TOOL: name]` markers; the
//! orchestrator runs those tools and feeds the results back for a final,
//! plain-language answer.
//!
//! ## Tool round-trip
//!
//! ```rust,ignore
//! use machinebot_core::{Orchestrator, ToolRegistry, ToolFilter, create_provider};
//!
//! let registry = Arc::new(ToolRegistry::builtin(&settings.tools, &ToolFilter::all())?);
//! let provider = create_provider("ollama", logger.clone());
//! let mut bot = Orchestrator::new(provider, ProviderModelConfig::new("llama3.2"), registry, logger);
//!
//! let reply = bot.send("How much RAM am I using?").await?;
//! println!("{}", reply.content);
//! ```

pub mod types;
pub mod logging;
pub mod config;
pub mod providers;
pub mod tools;
pub mod chat;

// Re-export commonly used types
pub use types::{
    ChatMessage, MessageRole,
    Tool, ToolCall, ToolResult,
    StreamChunk,
    CancellationToken,
};

pub use logging::{Logger, NoOpLogger, ConsoleLogger, FileLogger, LogLevel};

pub use config::{
    BotConfig, ConfigProvider, ConfigError, ConfigResult,
    FileConfigProvider, MemoryConfigProvider,
};

pub use providers::{
    Provider, ProviderError, ProviderResult, ProviderModelConfig, StreamChatOptions,
    GenaiProvider, MockProvider,
    ModelProvisioner, OllamaClient, ProvisionOutcome, ensure_model,
    create_provider, supported_providers,
};

pub use tools::{
    SystemTool, ToolDispatcher, ToolError, ToolFilter, ToolRegistry, RegistryError,
    extract_tool_names,
};

pub use chat::{ChatError, ChatResult, Orchestrator, TurnObserver, TurnReply};
