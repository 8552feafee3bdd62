//! Logging abstractions for runtime-agnostic logging

mod traits;
mod console;
pub mod file_logger;

pub use traits::{Logger, NoOpLogger};
pub use console::ConsoleLogger;
pub use file_logger::{FileLogger, LogLevel, log_file_path};
