mod mappers;
pub mod metrics;
mod rows;
pub mod sqlite_store;
pub mod status_poller;
pub mod sync_job;

pub use metrics::{SyncMetrics, SyncMetricsSnapshot};
pub use sqlite_store::SqliteQueueStore;
pub use status_poller::QueueStatusPoller;
pub use sync_job::{BroadcastSyncEmitter, OfflineSyncJob, SyncEvent, SyncEventEmitter};
