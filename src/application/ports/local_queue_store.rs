use crate::domain::entities::offline::QueueItem;
use crate::domain::value_objects::offline::{QueueItemId, QueueKind, QueueStatus};
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Durable per-install storage for the four offline queues.
///
/// Every method opens the store lazily; when it cannot be opened the call fails with
/// `AppError::LocalStorageUnavailable`.
#[async_trait]
pub trait LocalQueueStore: Send + Sync {
    async fn open(&self) -> Result<(), AppError>;
    /// Upsert keyed by the item's id inside its own queue.
    async fn put(&self, item: &QueueItem) -> Result<(), AppError>;
    async fn get_all(&self, kind: QueueKind) -> Result<Vec<QueueItem>, AppError>;
    /// Records in any of `statuses`, in insertion order.
    async fn get_by_status(
        &self,
        kind: QueueKind,
        statuses: &[QueueStatus],
    ) -> Result<Vec<QueueItem>, AppError>;
    async fn get(&self, kind: QueueKind, id: &QueueItemId) -> Result<Option<QueueItem>, AppError>;
    async fn delete(&self, kind: QueueKind, id: &QueueItemId) -> Result<bool, AppError>;
    async fn delete_by_status(&self, kind: QueueKind, status: QueueStatus)
    -> Result<u64, AppError>;
    /// Number of records whose status is anything but completed.
    async fn count_unfinished(&self, kind: QueueKind) -> Result<u64, AppError>;
}
