//! Network interfaces and traffic counters

use std::collections::BTreeMap;
use std::net::{IpAddr, ToSocketAddrs};

use serde::Serialize;
use serde_json::Value;
use sysinfo::{Networks, System};

use super::bytes_to_mb;
use crate::tools::error::ToolError;
use crate::tools::registry::SystemTool;

#[derive(Debug, Serialize)]
struct Interface {
    mac_address: String,
    bytes_sent_mb: f64,
    bytes_received_mb: f64,
}

#[derive(Debug, Serialize)]
struct NetworkInfo {
    hostname: String,
    local_ip: String,
    interfaces: BTreeMap<String, Interface>,
    bytes_sent_mb: f64,
    bytes_received_mb: f64,
}

/// `get_network_info`
pub struct NetworkInfoTool;

impl SystemTool for NetworkInfoTool {
    fn name(&self) -> &str {
        "get_network_info"
    }

    fn description(&self) -> &str {
        "Get network interfaces, IP addresses, and data transfer stats"
    }

    fn invoke(&self) -> Result<Value, ToolError> {
        let hostname = System::host_name().unwrap_or_else(|| "localhost".to_string());
        let local_ip = resolve_host(&hostname)
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "Unable to resolve".to_string());

        let networks = Networks::new_with_refreshed_list();
        let mut sent = 0u64;
        let mut received = 0u64;
        let interfaces = networks
            .iter()
            .map(|(name, data)| {
                sent += data.total_transmitted();
                received += data.total_received();
                let interface = Interface {
                    mac_address: data.mac_address().to_string(),
                    bytes_sent_mb: bytes_to_mb(data.total_transmitted()),
                    bytes_received_mb: bytes_to_mb(data.total_received()),
                };
                (name.clone(), interface)
            })
            .collect();

        let info = NetworkInfo {
            hostname,
            local_ip,
            interfaces,
            bytes_sent_mb: bytes_to_mb(sent),
            bytes_received_mb: bytes_to_mb(received),
        };
        Ok(serde_json::to_value(info)?)
    }
}

/// First address the hostname resolves to, IPv4 preferred
fn resolve_host(hostname: &str) -> Option<IpAddr> {
    let addrs: Vec<IpAddr> = (hostname, 0)
        .to_socket_addrs()
        .ok()?
        .map(|addr| addr.ip())
        .collect();

    addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
}
