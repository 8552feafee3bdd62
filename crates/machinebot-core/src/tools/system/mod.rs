//! Built-in system introspection tools
//!
//! Each tool is a small struct implementing `SystemTool`, reading host state
//! through `sysinfo` (and `/sys` for batteries). Outputs are serde structs
//! converted to JSON values; sizes are reported in GB or MB rounded to two
//! decimals.

mod battery;
mod cpu;
mod disk;
mod host;
mod memory;
mod network;
mod process;

use std::sync::Arc;
use std::time::Duration;

use crate::config::ToolSettings;

use super::registry::SystemTool;

pub use battery::BatteryInfoTool;
pub use cpu::CpuInfoTool;
pub use disk::DiskInfoTool;
pub use host::{format_uptime, SystemInfoTool, UptimeTool};
pub use memory::MemoryInfoTool;
pub use network::NetworkInfoTool;
pub use process::ProcessInfoTool;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// The built-in tools in registration order
pub fn builtin_tools(settings: &ToolSettings) -> Vec<Arc<dyn SystemTool>> {
    vec![
        Arc::new(SystemInfoTool),
        Arc::new(CpuInfoTool::new(Duration::from_millis(settings.cpu_sample_ms))),
        Arc::new(MemoryInfoTool),
        Arc::new(DiskInfoTool),
        Arc::new(NetworkInfoTool),
        Arc::new(ProcessInfoTool::new(settings.process_limit)),
        Arc::new(BatteryInfoTool::default()),
        Arc::new(UptimeTool),
    ]
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn bytes_to_gb(bytes: u64) -> f64 {
    round2(bytes as f64 / GIB)
}

pub(crate) fn bytes_to_mb(bytes: u64) -> f64 {
    round2(bytes as f64 / MIB)
}

/// `part` as a percentage of `whole`, one decimal; zero when `whole` is zero
pub(crate) fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 1000.0).round() / 10.0
}
