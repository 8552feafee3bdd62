//! Battery status from the kernel power-supply class
//!
//! Batteries are read from `/sys/class/power_supply`; on machines without
//! that directory (or without a battery in it) the tool reports that no
//! battery was found rather than failing.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{json, Value};

use crate::tools::error::ToolError;
use crate::tools::registry::SystemTool;

const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
enum TimeLeft {
    Minutes(f64),
    Status(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct BatteryReading {
    percent: u8,
    power_plugged: bool,
    status: String,
    time_left_minutes: TimeLeft,
}

/// `get_battery_info`
pub struct BatteryInfoTool {
    root: PathBuf,
}

impl Default for BatteryInfoTool {
    fn default() -> Self {
        Self::with_root(POWER_SUPPLY_ROOT)
    }
}

impl BatteryInfoTool {
    /// Read power supplies from a different directory
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SystemTool for BatteryInfoTool {
    fn name(&self) -> &str {
        "get_battery_info"
    }

    fn description(&self) -> &str {
        "Get battery status and charge level (for laptops)"
    }

    fn invoke(&self) -> Result<Value, ToolError> {
        match read_battery(&self.root)? {
            Some(reading) => Ok(serde_json::to_value(reading)?),
            None => Ok(json!({ "status": "No battery detected (desktop or not available)" })),
        }
    }
}

fn read_battery(root: &Path) -> Result<Option<BatteryReading>, ToolError> {
    if !root.is_dir() {
        return Ok(None);
    }

    for entry in fs::read_dir(root)? {
        let dir = entry?.path();
        if read_attr(&dir, "type").as_deref() != Some("Battery") {
            continue;
        }
        let Some(percent) = read_attr(&dir, "capacity").and_then(|v| v.parse::<u8>().ok()) else {
            continue;
        };

        let status = read_attr(&dir, "status").unwrap_or_else(|| "Unknown".to_string());
        let discharging = status == "Discharging";
        let time_left_minutes = if discharging {
            minutes_left(&dir)
                .map(TimeLeft::Minutes)
                .unwrap_or_else(|| TimeLeft::Status("Unknown".to_string()))
        } else {
            TimeLeft::Status("Charging/Full".to_string())
        };

        return Ok(Some(BatteryReading {
            percent: percent.min(100),
            power_plugged: !discharging,
            status,
            time_left_minutes,
        }));
    }

    Ok(None)
}

/// Remaining minutes from energy/power or charge/current counters
fn minutes_left(dir: &Path) -> Option<f64> {
    let read_num = |name: &str| read_attr(dir, name).and_then(|v| v.parse::<f64>().ok());

    let (remaining, rate) = match (read_num("energy_now"), read_num("power_now")) {
        (Some(energy), Some(power)) => (energy, power),
        _ => (read_num("charge_now")?, read_num("current_now")?),
    };
    if rate <= 0.0 {
        return None;
    }
    Some((remaining / rate * 600.0).round() / 10.0)
}

fn read_attr(dir: &Path, name: &str) -> Option<String> {
    fs::read_to_string(dir.join(name))
        .ok()
        .map(|s| s.trim().to_string())
}
