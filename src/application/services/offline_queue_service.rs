use crate::application::ports::local_queue_store::LocalQueueStore;
use crate::domain::entities::offline::{
    NoteDraft, PhotoDraft, QueueCounts, QueueDraft, QueueItem, TimeClockDraft, VoiceNoteDraft,
};
use crate::domain::value_objects::offline::{QueueItemId, QueueKind, QueueStatus, RetryPolicy};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[async_trait]
pub trait QueueManager: Send + Sync {
    async fn enqueue(&self, draft: QueueDraft) -> Result<QueueItemId, AppError>;
    async fn get(&self, kind: QueueKind, id: &QueueItemId) -> Result<Option<QueueItem>, AppError>;
    async fn list_all(&self, kind: QueueKind) -> Result<Vec<QueueItem>, AppError>;
    async fn list_pending(&self, kind: QueueKind) -> Result<Vec<QueueItem>, AppError>;
    async fn update_status(
        &self,
        kind: QueueKind,
        id: &QueueItemId,
        status: QueueStatus,
        error: Option<String>,
    ) -> Result<QueueItem, AppError>;
    /// Returns items left in progress for at least `stale_after` to pending.
    async fn recover_interrupted(
        &self,
        kind: QueueKind,
        stale_after: Duration,
    ) -> Result<u64, AppError>;
    async fn reset_failed(&self, kind: QueueKind, id: &QueueItemId) -> Result<QueueItem, AppError>;
    async fn clear_completed(&self, kind: QueueKind) -> Result<u64, AppError>;
    async fn get_counts(&self) -> Result<QueueCounts, AppError>;
}

/// The only component that touches the local queue store.
///
/// Status writes are read-modify-write, so each queue kind has its own lock; calls on
/// different kinds never wait on each other.
pub struct OfflineQueueService {
    store: Arc<dyn LocalQueueStore>,
    retry_policy: RetryPolicy,
    photo_lock: Mutex<()>,
    note_lock: Mutex<()>,
    time_clock_lock: Mutex<()>,
    voice_note_lock: Mutex<()>,
}

impl OfflineQueueService {
    pub fn new(store: Arc<dyn LocalQueueStore>, retry_policy: RetryPolicy) -> Self {
        Self {
            store,
            retry_policy,
            photo_lock: Mutex::new(()),
            note_lock: Mutex::new(()),
            time_clock_lock: Mutex::new(()),
            voice_note_lock: Mutex::new(()),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    pub async fn enqueue_photo(&self, draft: PhotoDraft) -> Result<QueueItemId, AppError> {
        self.enqueue(QueueDraft::Photo(draft)).await
    }

    pub async fn enqueue_note(&self, draft: NoteDraft) -> Result<QueueItemId, AppError> {
        self.enqueue(QueueDraft::Note(draft)).await
    }

    pub async fn enqueue_time_clock(&self, draft: TimeClockDraft) -> Result<QueueItemId, AppError> {
        self.enqueue(QueueDraft::TimeClock(draft)).await
    }

    pub async fn enqueue_voice_note(
        &self,
        draft: VoiceNoteDraft,
    ) -> Result<QueueItemId, AppError> {
        self.enqueue(QueueDraft::VoiceNote(draft)).await
    }

    fn lock_for(&self, kind: QueueKind) -> &Mutex<()> {
        match kind {
            QueueKind::Photo => &self.photo_lock,
            QueueKind::Note => &self.note_lock,
            QueueKind::TimeClock => &self.time_clock_lock,
            QueueKind::VoiceNote => &self.voice_note_lock,
        }
    }

    async fn require(&self, kind: QueueKind, id: &QueueItemId) -> Result<QueueItem, AppError> {
        self.store
            .get(kind, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{kind} queue item {id}")))
    }
}

#[async_trait]
impl QueueManager for OfflineQueueService {
    async fn enqueue(&self, draft: QueueDraft) -> Result<QueueItemId, AppError> {
        draft.validate().map_err(AppError::ValidationError)?;

        let kind = draft.kind();
        let id = QueueItemId::generate();
        let item = draft.into_item(id.clone(), Utc::now());

        let _guard = self.lock_for(kind).lock().await;
        self.store.put(&item).await?;

        tracing::debug!(target: "offline::queue", kind = %kind, id = %id, "item enqueued");
        Ok(id)
    }

    async fn get(&self, kind: QueueKind, id: &QueueItemId) -> Result<Option<QueueItem>, AppError> {
        self.store.get(kind, id).await
    }

    async fn list_all(&self, kind: QueueKind) -> Result<Vec<QueueItem>, AppError> {
        self.store.get_all(kind).await
    }

    async fn list_pending(&self, kind: QueueKind) -> Result<Vec<QueueItem>, AppError> {
        let now = Utc::now();
        let items = self
            .store
            .get_by_status(kind, &[QueueStatus::Pending, QueueStatus::Failed])
            .await?;
        Ok(items
            .into_iter()
            .filter(|item| {
                let meta = item.meta();
                self.retry_policy
                    .is_eligible(meta.status, meta.retry_count, meta.updated_at, now)
            })
            .collect())
    }

    async fn update_status(
        &self,
        kind: QueueKind,
        id: &QueueItemId,
        status: QueueStatus,
        error: Option<String>,
    ) -> Result<QueueItem, AppError> {
        let _guard = self.lock_for(kind).lock().await;

        let mut item = self.require(kind, id).await?;
        item.meta_mut()
            .transition(status, error, Utc::now())
            .map_err(AppError::InvalidTransition)?;
        self.store.put(&item).await?;

        Ok(item)
    }

    async fn recover_interrupted(
        &self,
        kind: QueueKind,
        stale_after: Duration,
    ) -> Result<u64, AppError> {
        let _guard = self.lock_for(kind).lock().await;

        let now = Utc::now();
        let cutoff = chrono::Duration::from_std(stale_after)
            .ok()
            .and_then(|age| now.checked_sub_signed(age));
        let Some(cutoff) = cutoff else {
            return Ok(0);
        };

        let mut recovered = 0u64;
        for mut item in self
            .store
            .get_by_status(kind, &[QueueStatus::InProgress])
            .await?
        {
            // 更新が新しいものは別プロセスが処理中の可能性がある
            if item.meta().updated_at > cutoff {
                continue;
            }
            item.meta_mut()
                .transition(QueueStatus::Pending, None, now)
                .map_err(AppError::InvalidTransition)?;
            self.store.put(&item).await?;
            recovered += 1;
        }

        if recovered > 0 {
            tracing::info!(
                target: "offline::queue",
                kind = %kind,
                recovered,
                "recovered interrupted queue items"
            );
        }
        Ok(recovered)
    }

    async fn reset_failed(&self, kind: QueueKind, id: &QueueItemId) -> Result<QueueItem, AppError> {
        let _guard = self.lock_for(kind).lock().await;

        let mut item = self.require(kind, id).await?;
        if item.status() != QueueStatus::Failed {
            return Err(AppError::InvalidTransition(format!(
                "only failed items can be reset, {kind} item {id} is {}",
                item.status()
            )));
        }

        let meta = item.meta_mut();
        meta.transition(QueueStatus::Pending, None, Utc::now())
            .map_err(AppError::InvalidTransition)?;
        meta.retry_count = 0;
        meta.last_error = None;
        self.store.put(&item).await?;

        Ok(item)
    }

    async fn clear_completed(&self, kind: QueueKind) -> Result<u64, AppError> {
        let _guard = self.lock_for(kind).lock().await;

        let removed = self
            .store
            .delete_by_status(kind, QueueStatus::Completed)
            .await?;

        tracing::debug!(target: "offline::queue", kind = %kind, removed, "cleared completed items");
        Ok(removed)
    }

    async fn get_counts(&self) -> Result<QueueCounts, AppError> {
        let mut counts = QueueCounts::default();
        for kind in QueueKind::ALL {
            counts.set(kind, self.store.count_unfinished(kind).await?);
        }
        Ok(counts)
    }
}
