//! Configuration provider trait

use async_trait::async_trait;

use super::settings::BotConfig;

/// Configuration provider abstraction
///
/// Implementations:
/// - `MemoryConfigProvider`: In-memory for testing
/// - `FileConfigProvider`: Reads from YAML file (~/.config/machinebot/config.yaml)
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Load the configuration; a missing source yields defaults
    async fn load(&self) -> ConfigResult<BotConfig>;

    /// Persist the configuration
    async fn save(&self, config: &BotConfig) -> ConfigResult<()>;
}

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Other(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
