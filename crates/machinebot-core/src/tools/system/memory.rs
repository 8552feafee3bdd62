//! RAM and swap usage

use serde::Serialize;
use serde_json::Value;
use sysinfo::System;

use super::{bytes_to_gb, percent};
use crate::tools::error::ToolError;
use crate::tools::registry::SystemTool;

#[derive(Debug, Serialize)]
struct MemoryInfo {
    total_gb: f64,
    available_gb: f64,
    used_gb: f64,
    usage_percent: f64,
    swap_total_gb: f64,
    swap_used_gb: f64,
    swap_percent: f64,
}

/// `get_memory_info`
pub struct MemoryInfoTool;

impl SystemTool for MemoryInfoTool {
    fn name(&self) -> &str {
        "get_memory_info"
    }

    fn description(&self) -> &str {
        "Get RAM and swap memory usage"
    }

    fn invoke(&self) -> Result<Value, ToolError> {
        let mut sys = System::new();
        sys.refresh_memory();

        let total = sys.total_memory();
        if total == 0 {
            return Err(ToolError::Unavailable("Memory information".to_string()));
        }
        let available = sys.available_memory();
        let used = total.saturating_sub(available);

        let info = MemoryInfo {
            total_gb: bytes_to_gb(total),
            available_gb: bytes_to_gb(available),
            used_gb: bytes_to_gb(sys.used_memory()),
            usage_percent: percent(used, total),
            swap_total_gb: bytes_to_gb(sys.total_swap()),
            swap_used_gb: bytes_to_gb(sys.used_swap()),
            swap_percent: percent(sys.used_swap(), sys.total_swap()),
        };
        Ok(serde_json::to_value(info)?)
    }
}
