//! Host identity and uptime

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use serde_json::Value;
use sysinfo::{CpuRefreshKind, RefreshKind, System};

use crate::tools::error::ToolError;
use crate::tools::registry::SystemTool;

#[derive(Debug, Serialize)]
struct SystemInfo {
    system: String,
    node_name: String,
    release: String,
    version: String,
    distribution: String,
    machine: &'static str,
    processor: String,
}

/// `get_system_info`
pub struct SystemInfoTool;

impl SystemTool for SystemInfoTool {
    fn name(&self) -> &str {
        "get_system_info"
    }

    fn description(&self) -> &str {
        "Get basic system information like OS, hostname, and processor"
    }

    fn invoke(&self) -> Result<Value, ToolError> {
        let sys = System::new_with_specifics(
            RefreshKind::new().with_cpu(CpuRefreshKind::new()),
        );
        let unknown = || "unknown".to_string();

        let info = SystemInfo {
            system: System::name().unwrap_or_else(unknown),
            node_name: System::host_name().unwrap_or_else(unknown),
            release: System::kernel_version().unwrap_or_else(unknown),
            version: System::os_version().unwrap_or_else(unknown),
            distribution: System::long_os_version().unwrap_or_else(unknown),
            machine: std::env::consts::ARCH,
            processor: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().trim().to_string())
                .filter(|brand| !brand.is_empty())
                .unwrap_or_else(unknown),
        };
        Ok(serde_json::to_value(info)?)
    }
}

#[derive(Debug, Serialize)]
struct Uptime {
    boot_time: String,
    uptime: String,
    uptime_seconds: u64,
}

/// `get_uptime`
pub struct UptimeTool;

impl SystemTool for UptimeTool {
    fn name(&self) -> &str {
        "get_uptime"
    }

    fn description(&self) -> &str {
        "Get system boot time and uptime duration"
    }

    fn invoke(&self) -> Result<Value, ToolError> {
        let boot = System::boot_time();
        let boot_time = i64::try_from(boot)
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .ok_or_else(|| ToolError::other(format!("invalid boot timestamp {}", boot)))?
            .with_timezone(&Local);
        let uptime_seconds = System::uptime();

        let info = Uptime {
            boot_time: boot_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            uptime: format_uptime(uptime_seconds),
            uptime_seconds,
        };
        Ok(serde_json::to_value(info)?)
    }
}

/// Render a duration in seconds as `{d}d {h}h {m}m {s}s`
pub fn format_uptime(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0), "0d 0h 0m 0s");
        assert_eq!(format_uptime(59), "0d 0h 0m 59s");
        assert_eq!(format_uptime(3_661), "0d 1h 1m 1s");
        assert_eq!(format_uptime(2 * 86_400 + 5 * 3_600 + 7 * 60 + 9), "2d 5h 7m 9s");
    }

    #[test]
    fn test_system_info_shape() {
        let value = SystemInfoTool.invoke().unwrap();
        for key in ["system", "node_name", "release", "version", "machine", "processor"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["machine"], std::env::consts::ARCH);
    }

    #[test]
    fn test_uptime_shape() {
        let value = UptimeTool.invoke().unwrap();
        let boot = value["boot_time"].as_str().unwrap();
        assert_eq!(boot.len(), "2024-01-01 00:00:00".len());
        assert!(value["uptime"].as_str().unwrap().ends_with('s'));
    }
}
