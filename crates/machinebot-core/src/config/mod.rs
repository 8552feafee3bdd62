//! Configuration provider abstractions
//!
//! Supports multiple configuration sources:
//! - `MemoryConfigProvider`: In-memory for testing
//! - `FileConfigProvider`: YAML file-based

mod traits;
mod settings;
mod memory;
mod file;

pub use traits::{ConfigProvider, ConfigError, ConfigResult};
pub use settings::{BotConfig, ModelSettings, ProvisionSettings, ToolSettings};
pub use memory::MemoryConfigProvider;
pub use file::FileConfigProvider;
