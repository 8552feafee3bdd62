//! In-memory configuration provider

use async_trait::async_trait;
use parking_lot::RwLock;

use super::settings::BotConfig;
use super::traits::{ConfigProvider, ConfigResult};

/// In-memory configuration provider for testing
#[derive(Debug, Default)]
pub struct MemoryConfigProvider {
    config: RwLock<BotConfig>,
}

impl MemoryConfigProvider {
    /// Create a provider holding the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider holding `config`
    pub fn with_config(config: BotConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }
}

#[async_trait]
impl ConfigProvider for MemoryConfigProvider {
    async fn load(&self) -> ConfigResult<BotConfig> {
        Ok(self.config.read().clone())
    }

    async fn save(&self, config: &BotConfig) -> ConfigResult<()> {
        *self.config.write() = config.clone();
        Ok(())
    }
}
