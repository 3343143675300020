use log::{info, warn};

use super::queue::{QueueItem, SnapshotReceiver, SnapshotSender};
use crate::server::MetricsTransport;

const WARN_EVERY: u32 = 10;

/// Consecutive-failure streak owned by the delivery worker. Drives the
/// throttled outage warning and the one-time recovery notice.
pub struct ReachabilityTracker {
    streak: u32,
}

impl ReachabilityTracker {
    pub fn new() -> Self {
        ReachabilityTracker { streak: 0 }
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Returns true when this success ends an outage (exactly once per
    /// failure run).
    pub fn record_success(&mut self) -> bool {
        let recovered = self.streak > 0;
        self.streak = 0;
        recovered
    }

    /// Returns true when this failure should be logged: the first of a run,
    /// then every tenth after that (1, 11, 21, ...).
    pub fn record_failure(&mut self) -> bool {
        self.streak += 1;
        self.streak % WARN_EVERY == 1
    }
}

impl Default for ReachabilityTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters the delivery worker hands back when it exits. Steady-state
/// operation never exits; tests read these after sending the sentinel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SenderReport {
    pub delivered: u64,
    pub failed: u64,
    pub warnings: u64,
    pub recoveries: u64,
}

/// Drains the queue and attempts best-effort delivery of each snapshot,
/// exactly once each. Failures drop the snapshot and bump the streak; they
/// never pause the loop or requeue the item.
pub async fn run_sender<T: MetricsTransport>(
    mut queue: SnapshotReceiver,
    transport: T,
    depth: SnapshotSender,
) -> SenderReport {
    let mut reachability = ReachabilityTracker::new();
    let mut report = SenderReport::default();

    loop {
        let snapshot = match queue.dequeue().await {
            QueueItem::Snapshot(snapshot) => snapshot,
            QueueItem::Shutdown => break,
        };

        if transport.send_metrics(&snapshot).await {
            report.delivered += 1;
            if reachability.record_success() {
                report.recoveries += 1;
                info!("connection restored");
            }
        } else {
            report.failed += 1;
            if reachability.record_failure() {
                report.warnings += 1;
                warn!(
                    "server unreachable, buffering ({} queued)",
                    depth.len()
                );
            }
        }
    }

    report
}
