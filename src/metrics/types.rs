use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GpuReading {
    pub index: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub vendor: String,
    pub gpu_percent: f64,
    pub mem_percent: f64,
    pub mem_used_mb: f64,
    pub mem_total_mb: f64,
    pub temp_c: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiskPartition {
    pub device: String,
    pub mountpoint: String,
    pub fstype: String,
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
    pub percent: f64,
}

/// Cumulative disk I/O since boot, summed over physical devices.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DiskIoTotals {
    pub read_mb: f64,
    pub write_mb: f64,
    pub read_count: u64,
    pub write_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub mem_percent: f64,
    pub status: String,
}

/// One immutable point-in-time bundle of host metrics, serialized verbatim
/// as the `/metrics` request body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub system_name: String,
    pub location: String,
    pub timestamp: DateTime<Utc>,
    pub cpu_percent: f64,
    pub cpu_per_core: Vec<f64>,
    pub cpu_freq_mhz: f64,
    pub cpu_temp: Option<f64>,
    pub ram_total_gb: f64,
    pub ram_used_gb: f64,
    pub ram_percent: f64,
    pub swap_total_gb: f64,
    pub swap_used_gb: f64,
    pub swap_percent: f64,
    pub gpu_info: Option<Vec<GpuReading>>,
    pub disk_partitions: Vec<DiskPartition>,
    pub disk_io: Option<DiskIoTotals>,
    pub net_bytes_sent: f64,
    pub net_bytes_recv: f64,
    pub net_packets_sent: f64,
    pub net_packets_recv: f64,
    pub public_ip: Option<String>,
    pub top_processes: Vec<ProcessSample>,
    pub uptime_seconds: f64,
    pub boot_time: DateTime<Utc>,
    pub os_version: String,
    pub hostname: String,
    pub status: String,
}

impl MetricsSnapshot {
    /// A snapshot with every reading zeroed or absent. Production code never
    /// sends one of these; it exists so tests can fabricate queue traffic
    /// without touching the host.
    pub fn blank(system_name: &str) -> Self {
        let now = Utc::now();
        MetricsSnapshot {
            system_name: system_name.to_string(),
            location: String::new(),
            timestamp: now,
            cpu_percent: 0.0,
            cpu_per_core: Vec::new(),
            cpu_freq_mhz: 0.0,
            cpu_temp: None,
            ram_total_gb: 0.0,
            ram_used_gb: 0.0,
            ram_percent: 0.0,
            swap_total_gb: 0.0,
            swap_used_gb: 0.0,
            swap_percent: 0.0,
            gpu_info: None,
            disk_partitions: Vec::new(),
            disk_io: None,
            net_bytes_sent: 0.0,
            net_bytes_recv: 0.0,
            net_packets_sent: 0.0,
            net_packets_recv: 0.0,
            public_ip: None,
            top_processes: Vec::new(),
            uptime_seconds: 0.0,
            boot_time: now,
            os_version: String::new(),
            hostname: String::new(),
            status: STATUS_ONLINE.to_string(),
        }
    }
}

/// Liveness marker the server filters on.
pub const STATUS_ONLINE: &str = "online";

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn bytes_to_gb(bytes: u64) -> f64 {
    round2(bytes as f64 / 1024.0 / 1024.0 / 1024.0)
}

pub(crate) fn bytes_to_mb(bytes: u64) -> f64 {
    round2(bytes as f64 / 1024.0 / 1024.0)
}
