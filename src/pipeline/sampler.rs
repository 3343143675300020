use std::time::{Duration, Instant};

use log::{error, info};
use tokio::time::sleep;

use super::queue::SnapshotSender;
use crate::metrics::SnapshotSource;

const PROGRESS_EVERY: u64 = 30;

/// Produces one snapshot per cadence tick and offers it to the queue,
/// never blocking on delivery. A failed collection skips the tick; a full
/// queue drops the fresh snapshot and keeps the older backlog. Runs until
/// the process exits.
pub async fn run_sampler<S: SnapshotSource>(
    mut source: S,
    queue: SnapshotSender,
    cadence: Duration,
) {
    let mut produced: u64 = 0;
    loop {
        let started = Instant::now();
        match source.collect().await {
            Ok(snapshot) => {
                let cpu_percent = snapshot.cpu_percent;
                let ram_percent = snapshot.ram_percent;
                queue.try_enqueue(snapshot);
                produced += 1;
                if produced % PROGRESS_EVERY == 0 {
                    info!(
                        "{produced} collected | cpu {cpu_percent:.1}% | ram {ram_percent:.1}% | queue {}",
                        queue.len()
                    );
                }
            }
            Err(err) => error!("collection failed, skipping tick: {err}"),
        }
        sleep(tick_remainder(cadence, started.elapsed())).await;
    }
}

/// Drift correction: the next tick starts `cadence` after this one began,
/// or immediately when the tick itself ran long.
fn tick_remainder(cadence: Duration, elapsed: Duration) -> Duration {
    cadence.saturating_sub(elapsed)
}
