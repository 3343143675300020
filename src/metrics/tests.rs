#![cfg(test)]

use super::{Identity, MetricsCollector, SnapshotSource};

#[tokio::test]
async fn collector_produces_live_snapshots() {
    let identity = Identity::detect("test-host", "test-lab");
    let mut collector = MetricsCollector::new(identity, reqwest::Client::new());
    collector.warm_up().await;

    let first = collector.collect().await.expect("first collection");
    assert_eq!(first.system_name, "test-host");
    assert_eq!(first.location, "test-lab");
    assert_eq!(first.status, "online");
    assert!(!first.cpu_per_core.is_empty());
    assert!(first.ram_total_gb > 0.0);
    assert!(first.uptime_seconds > 0.0);

    // No baseline yet, so all four rates are defined as zero.
    assert_eq!(first.net_bytes_sent, 0.0);
    assert_eq!(first.net_bytes_recv, 0.0);
    assert_eq!(first.net_packets_sent, 0.0);
    assert_eq!(first.net_packets_recv, 0.0);

    let second = collector.collect().await.expect("second collection");
    assert!(second.timestamp >= first.timestamp);
    assert_eq!(second.cpu_per_core.len(), first.cpu_per_core.len());
}
