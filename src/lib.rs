mod config;
mod metrics;
mod pipeline;
mod server;

pub use config::{AgentConfig, QUEUE_CAPACITY};
pub use metrics::{
    CollectError, DiskIoTotals, DiskPartition, GpuReading, Identity, MetricsCollector,
    MetricsSnapshot, ProcessSample, Sensor, SnapshotSource, STATUS_ONLINE,
};
pub use pipeline::{
    bounded, run_sampler, run_sender, QueueItem, ReachabilityTracker, SenderReport,
    SnapshotReceiver, SnapshotSender,
};
pub use server::{
    register_with_retry, MetricsTransport, RegisterError, RegisterRequest, RegisterResponse,
    RegistrationExhausted, RegistrationTransport, ServerClient, REGISTER_ATTEMPTS,
    REGISTER_RETRY_DELAY,
};
