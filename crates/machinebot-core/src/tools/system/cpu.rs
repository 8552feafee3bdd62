//! CPU usage sampling

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use sysinfo::{CpuRefreshKind, System, MINIMUM_CPU_UPDATE_INTERVAL};

use super::round2;
use crate::tools::error::ToolError;
use crate::tools::registry::SystemTool;

#[derive(Debug, Serialize)]
struct CpuInfo {
    brand: String,
    physical_cores: Option<usize>,
    total_cores: usize,
    current_frequency_mhz: u64,
    cpu_usage_percent: f64,
    per_core_usage: Vec<f64>,
}

/// `get_cpu_info`
///
/// Usage is measured over a sampling window, so a call blocks for at least
/// that long.
pub struct CpuInfoTool {
    sample: Duration,
}

impl CpuInfoTool {
    /// Create the tool with the given sampling window
    pub fn new(sample: Duration) -> Self {
        Self {
            sample: sample.max(MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }

    /// Effective sampling window
    pub fn sample(&self) -> Duration {
        self.sample
    }
}

impl SystemTool for CpuInfoTool {
    fn name(&self) -> &str {
        "get_cpu_info"
    }

    fn description(&self) -> &str {
        "Get CPU usage, core count, and frequency information"
    }

    fn invoke(&self) -> Result<Value, ToolError> {
        let mut sys = System::new();
        sys.refresh_cpu_specifics(CpuRefreshKind::everything());
        std::thread::sleep(self.sample);
        sys.refresh_cpu_specifics(CpuRefreshKind::everything());

        let cpus = sys.cpus();
        if cpus.is_empty() {
            return Err(ToolError::Unavailable("CPU information".to_string()));
        }

        let info = CpuInfo {
            brand: cpus[0].brand().trim().to_string(),
            physical_cores: sys.physical_core_count(),
            total_cores: cpus.len(),
            current_frequency_mhz: cpus[0].frequency(),
            cpu_usage_percent: round2(sys.global_cpu_info().cpu_usage() as f64),
            per_core_usage: cpus.iter().map(|c| round2(c.cpu_usage() as f64)).collect(),
        };
        Ok(serde_json::to_value(info)?)
    }
}
