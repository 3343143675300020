use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::info;
use sysinfo::{Networks, System};

use super::disk::collect_partitions;
use super::diskio::DiskIoSensor;
use super::gpu::GpuSensor;
use super::net::{NetRateTracker, NetTotals};
use super::processes::{top_processes, TOP_PROCESS_COUNT};
use super::public_ip::PublicIpCache;
use super::sensors::{CpuTempSensor, Sensor};
use super::types::{bytes_to_gb, round1, MetricsSnapshot, STATUS_ONLINE};

/// Constant-for-process-lifetime identity stamped onto every snapshot.
#[derive(Clone, Debug)]
pub struct Identity {
    pub system_name: String,
    pub location: String,
    pub hostname: String,
    pub os_version: String,
}

impl Identity {
    pub fn detect(system_name: &str, location: &str) -> Self {
        Identity {
            system_name: system_name.to_string(),
            location: location.to_string(),
            hostname: System::host_name().unwrap_or_default(),
            os_version: System::long_os_version().unwrap_or_default(),
        }
    }
}

/// A tick's collection failed entirely. Individual absent sub-readings are
/// not errors; this fires only when the host backend yields nothing usable.
#[derive(Debug)]
pub enum CollectError {
    NoCpus,
}

impl fmt::Display for CollectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectError::NoCpus => write!(f, "host reported an empty cpu list"),
        }
    }
}

impl std::error::Error for CollectError {}

/// What the sampler loop needs from a collector: one "collect a snapshot
/// now" operation that either yields a complete snapshot or fails the tick.
pub trait SnapshotSource: Send {
    fn collect(&mut self)
        -> impl Future<Output = Result<MetricsSnapshot, CollectError>> + Send;
}

/// Gathers one [`MetricsSnapshot`] on demand. Owns the sysinfo handles, the
/// network-rate baseline, the public-IP cache, and whichever optional
/// sensors were detected at startup.
pub struct MetricsCollector {
    identity: Identity,
    system: System,
    networks: Networks,
    net_rates: NetRateTracker,
    public_ip: PublicIpCache,
    cpu_temp: Option<CpuTempSensor>,
    gpu: Option<GpuSensor>,
    disk_io: Option<DiskIoSensor>,
    http: reqwest::Client,
}

impl MetricsCollector {
    pub fn new(identity: Identity, http: reqwest::Client) -> Self {
        let cpu_temp = CpuTempSensor::detect();
        let gpu = GpuSensor::detect();
        let disk_io = DiskIoSensor::detect();
        if let Some(sensor) = &cpu_temp {
            info!("sensor detected: {}", sensor.name());
        }
        if let Some(sensor) = &gpu {
            info!("sensor detected: {}", sensor.name());
        }
        if let Some(sensor) = &disk_io {
            info!("sensor detected: {}", sensor.name());
        }

        MetricsCollector {
            identity,
            system: System::new_all(),
            networks: Networks::new_with_refreshed_list(),
            net_rates: NetRateTracker::new(),
            public_ip: PublicIpCache::new(),
            cpu_temp,
            gpu,
            disk_io,
            http,
        }
    }

    /// Primes the cpu usage counters so the first tick reports a real value
    /// instead of zero.
    pub async fn warm_up(&mut self) {
        self.system.refresh_cpu();
        tokio::time::sleep(Duration::from_millis(125)).await;
        self.system.refresh_cpu();
    }

    pub async fn public_ip(&mut self) -> Option<String> {
        self.public_ip.get(&self.http).await
    }

    async fn collect_snapshot(&mut self) -> Result<MetricsSnapshot, CollectError> {
        let timestamp = Utc::now();

        self.system.refresh_cpu();
        self.system.refresh_memory();
        self.system.refresh_processes();

        let cpus = self.system.cpus();
        if cpus.is_empty() {
            return Err(CollectError::NoCpus);
        }
        let cpu_percent = round1(self.system.global_cpu_info().cpu_usage() as f64);
        let cpu_per_core: Vec<f64> = cpus.iter().map(|c| round1(c.cpu_usage() as f64)).collect();
        let cpu_freq_mhz = round1(cpus.first().map(|c| c.frequency()).unwrap_or(0) as f64);

        let ram_total = self.system.total_memory();
        let ram_used = self.system.used_memory();
        let swap_total = self.system.total_swap();
        let swap_used = self.system.used_swap();

        self.networks.refresh();
        let rates = self
            .net_rates
            .rates(NetTotals::from_networks(&self.networks), Instant::now());

        let boot_time = DateTime::<Utc>::from_timestamp(System::boot_time() as i64, 0)
            .unwrap_or(timestamp);

        Ok(MetricsSnapshot {
            system_name: self.identity.system_name.clone(),
            location: self.identity.location.clone(),
            timestamp,
            cpu_percent,
            cpu_per_core,
            cpu_freq_mhz,
            cpu_temp: self.cpu_temp.as_mut().and_then(Sensor::sample),
            ram_total_gb: bytes_to_gb(ram_total),
            ram_used_gb: bytes_to_gb(ram_used),
            ram_percent: percent_of(ram_used, ram_total),
            swap_total_gb: bytes_to_gb(swap_total),
            swap_used_gb: bytes_to_gb(swap_used),
            swap_percent: percent_of(swap_used, swap_total),
            gpu_info: self.gpu.as_mut().and_then(Sensor::sample),
            disk_partitions: collect_partitions(),
            disk_io: self.disk_io.as_mut().and_then(Sensor::sample),
            net_bytes_sent: rates.bytes_sent,
            net_bytes_recv: rates.bytes_recv,
            net_packets_sent: rates.packets_sent,
            net_packets_recv: rates.packets_recv,
            public_ip: self.public_ip.get(&self.http).await,
            top_processes: top_processes(&self.system, TOP_PROCESS_COUNT),
            uptime_seconds: System::uptime() as f64,
            boot_time,
            os_version: self.identity.os_version.clone(),
            hostname: self.identity.hostname.clone(),
            status: STATUS_ONLINE.to_string(),
        })
    }
}

impl SnapshotSource for MetricsCollector {
    fn collect(
        &mut self,
    ) -> impl Future<Output = Result<MetricsSnapshot, CollectError>> + Send {
        self.collect_snapshot()
    }
}

fn percent_of(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(used as f64 / total as f64 * 100.0)
}
