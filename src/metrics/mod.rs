mod collector;
mod disk;
mod diskio;
mod gpu;
mod net;
mod processes;
mod public_ip;
mod sensors;
#[cfg(test)]
mod tests;
mod types;

pub use collector::{CollectError, Identity, MetricsCollector, SnapshotSource};
pub use sensors::Sensor;
pub use types::{
    DiskIoTotals, DiskPartition, GpuReading, MetricsSnapshot, ProcessSample, STATUS_ONLINE,
};
