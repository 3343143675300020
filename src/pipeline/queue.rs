use tokio::sync::mpsc;

use crate::metrics::MetricsSnapshot;

/// One queue slot: either a snapshot to deliver or the shutdown sentinel
/// that tells the sender to exit.
#[derive(Debug)]
pub enum QueueItem {
    Snapshot(Box<MetricsSnapshot>),
    Shutdown,
}

/// Creates the bounded snapshot queue that decouples the sampler from the
/// sender. Single producer, single consumer, hard capacity bound.
pub fn bounded(capacity: usize) -> (SnapshotSender, SnapshotReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (SnapshotSender { tx }, SnapshotReceiver { rx })
}

#[derive(Clone)]
pub struct SnapshotSender {
    tx: mpsc::Sender<QueueItem>,
}

impl SnapshotSender {
    /// Appends the snapshot unless the queue is at capacity. Never blocks;
    /// returns false (and the snapshot is gone) when full. Drop-newest: the
    /// buffered backlog is always older than anything being rejected.
    pub fn try_enqueue(&self, snapshot: MetricsSnapshot) -> bool {
        self.tx
            .try_send(QueueItem::Snapshot(Box::new(snapshot)))
            .is_ok()
    }

    /// Enqueues the shutdown sentinel, waiting for a slot if the queue is
    /// full. Steady-state operation never calls this.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(QueueItem::Shutdown).await;
    }

    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.tx.capacity() == 0
    }
}

pub struct SnapshotReceiver {
    rx: mpsc::Receiver<QueueItem>,
}

impl SnapshotReceiver {
    /// Waits for the next item in FIFO order. A closed channel (producer
    /// dropped) is reported as shutdown so the sender can never hang.
    pub async fn dequeue(&mut self) -> QueueItem {
        self.rx.recv().await.unwrap_or(QueueItem::Shutdown)
    }
}
