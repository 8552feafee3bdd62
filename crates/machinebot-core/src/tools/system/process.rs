//! Top processes by memory

use serde::Serialize;
use serde_json::Value;
use sysinfo::System;

use super::{bytes_to_mb, percent, round2};
use crate::tools::error::ToolError;
use crate::tools::registry::SystemTool;

#[derive(Debug, Serialize)]
struct ProcessEntry {
    pid: u32,
    name: String,
    memory_mb: f64,
    memory_percent: f64,
    cpu_percent: f64,
}

#[derive(Debug, Serialize)]
struct ProcessInfo {
    top_processes_by_memory: Vec<ProcessEntry>,
}

/// `get_process_info`
pub struct ProcessInfoTool {
    limit: usize,
}

impl ProcessInfoTool {
    /// Create the tool reporting at most `limit` processes
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl SystemTool for ProcessInfoTool {
    fn name(&self) -> &str {
        "get_process_info"
    }

    fn description(&self) -> &str {
        "Get top processes by memory usage"
    }

    fn invoke(&self) -> Result<Value, ToolError> {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_processes();

        let total = sys.total_memory();
        let mut processes: Vec<_> = sys.processes().values().collect();
        processes.sort_by(|a, b| b.memory().cmp(&a.memory()));

        let top = processes
            .into_iter()
            .take(self.limit)
            .map(|p| ProcessEntry {
                pid: p.pid().as_u32(),
                name: p.name().to_string(),
                memory_mb: bytes_to_mb(p.memory()),
                memory_percent: percent(p.memory(), total),
                cpu_percent: round2(p.cpu_usage() as f64),
            })
            .collect();

        Ok(serde_json::to_value(ProcessInfo {
            top_processes_by_memory: top,
        })?)
    }
}
