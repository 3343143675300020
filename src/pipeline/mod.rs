mod queue;
mod sampler;
mod sender;

pub use queue::{bounded, QueueItem, SnapshotReceiver, SnapshotSender};
pub use sampler::run_sampler;
pub use sender::{run_sender, ReachabilityTracker, SenderReport};
