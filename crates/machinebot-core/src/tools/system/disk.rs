//! Mounted partitions and their usage

use serde::Serialize;
use serde_json::Value;
use sysinfo::Disks;

use super::{bytes_to_gb, percent};
use crate::tools::error::ToolError;
use crate::tools::registry::SystemTool;

#[derive(Debug, Serialize)]
struct Partition {
    device: String,
    mountpoint: String,
    filesystem: String,
    total_gb: f64,
    used_gb: f64,
    free_gb: f64,
    usage_percent: f64,
}

#[derive(Debug, Serialize)]
struct DiskInfo {
    partitions: Vec<Partition>,
}

/// `get_disk_info`
pub struct DiskInfoTool;

impl SystemTool for DiskInfoTool {
    fn name(&self) -> &str {
        "get_disk_info"
    }

    fn description(&self) -> &str {
        "Get disk partition and storage usage information"
    }

    fn invoke(&self) -> Result<Value, ToolError> {
        let disks = Disks::new_with_refreshed_list();

        // Pseudo filesystems report zero capacity
        let partitions = disks
            .list()
            .iter()
            .filter(|disk| disk.total_space() > 0)
            .map(|disk| {
                let total = disk.total_space();
                let free = disk.available_space();
                let used = total.saturating_sub(free);
                Partition {
                    device: disk.name().to_string_lossy().into_owned(),
                    mountpoint: disk.mount_point().display().to_string(),
                    filesystem: disk.file_system().to_string_lossy().into_owned(),
                    total_gb: bytes_to_gb(total),
                    used_gb: bytes_to_gb(used),
                    free_gb: bytes_to_gb(free),
                    usage_percent: percent(used, total),
                }
            })
            .collect();

        Ok(serde_json::to_value(DiskInfo { partitions })?)
    }
}
