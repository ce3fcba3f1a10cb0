use super::{note, photo, time_clock, voice_note};
use crate::application::ports::{IdentityProvider, ObjectStorage, RecordStore, Transcriber};
use crate::application::services::offline_queue_service::QueueManager;
use crate::domain::entities::offline::{DrainReport, DrainTrigger, KindDrainReport, QueueItem};
use crate::domain::value_objects::offline::{QueueKind, QueueStatus};
use crate::infrastructure::offline::metrics::{SyncMetrics, SyncOutcomeMetadata, SyncOutcomeStatus};
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Remote collaborators used by the per-kind operations.
#[derive(Clone)]
pub struct RemoteServices {
    pub storage: Arc<dyn ObjectStorage>,
    pub records: Arc<dyn RecordStore>,
    pub transcriber: Arc<dyn Transcriber>,
    pub identity: Arc<dyn IdentityProvider>,
}

#[derive(Debug, Clone)]
pub struct ReconciliationSettings {
    pub remote_timeout: Duration,
    /// In-progress items younger than this may belong to another running process.
    pub interrupted_after: Duration,
    pub photo_table: String,
    /// Queues whose completed items are deleted after a full drain.
    pub clear_completed_kinds: Vec<QueueKind>,
}

impl Default for ReconciliationSettings {
    fn default() -> Self {
        Self {
            remote_timeout: Duration::from_secs(30),
            interrupted_after: Duration::from_secs(120),
            photo_table: "project_photos".to_string(),
            clear_completed_kinds: vec![QueueKind::Photo, QueueKind::VoiceNote],
        }
    }
}

impl ReconciliationSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            remote_timeout: config.sync.remote_timeout(),
            interrupted_after: config.sync.interrupted_after(),
            photo_table: config.backend.photo_table.clone(),
            clear_completed_kinds: config.sync.clear_completed_kinds.clone(),
        }
    }

    fn clears(&self, kind: QueueKind) -> bool {
        self.clear_completed_kinds.contains(&kind)
    }
}

/// Drains the offline queues against the remote backend.
pub struct ReconciliationService {
    queue: Arc<dyn QueueManager>,
    remote: RemoteServices,
    settings: ReconciliationSettings,
    metrics: Arc<SyncMetrics>,
    gate: Mutex<()>,
}

impl ReconciliationService {
    pub fn new(
        queue: Arc<dyn QueueManager>,
        remote: RemoteServices,
        settings: ReconciliationSettings,
    ) -> Self {
        Self {
            queue,
            remote,
            settings,
            metrics: Arc::new(SyncMetrics::new()),
            gate: Mutex::new(()),
        }
    }

    pub fn metrics(&self) -> Arc<SyncMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn settings(&self) -> &ReconciliationSettings {
        &self.settings
    }

    /// 他のドレインが実行中かどうか
    pub fn is_draining(&self) -> bool {
        self.gate.try_lock().is_err()
    }

    /// Runs one full reconciliation pass over every queue.
    ///
    /// Only one drain runs at a time; a call made while another drain is in flight waits
    /// for it and then performs its own pass. Items left in progress for longer than
    /// `interrupted_after` are returned to pending first. The four queues are then drained
    /// concurrently (items inside one queue in order), and finally completed items of the
    /// configured queues are cleared.
    pub async fn drain_all(&self, trigger: DrainTrigger) -> DrainReport {
        let _guard = self.gate.lock().await;
        let started_at = Utc::now();

        tracing::info!(target: "offline::sync", trigger = %trigger, "drain started");

        let mut recovered = [0u64; 4];
        let mut recovery_errors: [Option<String>; 4] = Default::default();
        for (index, kind) in QueueKind::ALL.into_iter().enumerate() {
            match self
                .queue
                .recover_interrupted(kind, self.settings.interrupted_after)
                .await
            {
                Ok(count) => recovered[index] = count,
                Err(err) => recovery_errors[index] = Some(err.to_string()),
            }
        }

        let (photo, note, time_clock, voice_note) = tokio::join!(
            self.pass(QueueKind::Photo, trigger),
            self.pass(QueueKind::Note, trigger),
            self.pass(QueueKind::TimeClock, trigger),
            self.pass(QueueKind::VoiceNote, trigger),
        );

        let mut kinds = vec![photo, note, time_clock, voice_note];
        for (index, report) in kinds.iter_mut().enumerate() {
            report.recovered = recovered[index];
            if report.error.is_none() {
                report.error = recovery_errors[index].take();
            }
        }

        let report = DrainReport {
            trigger,
            recovered: recovered.iter().sum(),
            kinds,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            target: "offline::sync",
            trigger = %trigger,
            completed = report.completed(),
            failed = report.failed(),
            skipped = report.skipped(),
            recovered = report.recovered,
            "drain finished"
        );
        report
    }

    /// Drains a single queue under the same gate as `drain_all`.
    pub async fn drain(&self, kind: QueueKind) -> KindDrainReport {
        let _guard = self.gate.lock().await;

        let recovered = self
            .queue
            .recover_interrupted(kind, self.settings.interrupted_after)
            .await;
        let mut report = self.pass(kind, DrainTrigger::Manual).await;
        match recovered {
            Ok(count) => report.recovered = count,
            Err(err) => {
                if report.error.is_none() {
                    report.error = Some(err.to_string());
                }
            }
        }
        report
    }

    async fn pass(&self, kind: QueueKind, trigger: DrainTrigger) -> KindDrainReport {
        let mut report = KindDrainReport::new(kind);

        if let Err(err) = self.drain_items(kind, trigger, &mut report).await {
            tracing::error!(
                target: "offline::sync",
                kind = %kind,
                error = %err,
                "queue drain stopped by local store failure"
            );
            report.error = Some(err.to_string());
            return report;
        }

        if self.settings.clears(kind) {
            match self.queue.clear_completed(kind).await {
                Ok(cleared) => report.cleared = cleared,
                Err(err) => {
                    tracing::warn!(
                        target: "offline::sync",
                        kind = %kind,
                        error = %err,
                        "failed to clear completed items"
                    );
                    report.error = Some(err.to_string());
                }
            }
        }

        report
    }

    /// Returns `Err` only for local store failures; remote failures are recorded on the item.
    async fn drain_items(
        &self,
        kind: QueueKind,
        trigger: DrainTrigger,
        report: &mut KindDrainReport,
    ) -> Result<(), AppError> {
        let items = self.queue.list_pending(kind).await?;
        if items.is_empty() {
            return Ok(());
        }

        if kind == QueueKind::Note && !note::HAS_REMOTE_OPERATION {
            report.skipped += items.len() as u32;
            tracing::debug!(
                target: "offline::sync",
                skipped = items.len(),
                "note queue has no remote operation, items stay queued"
            );
            return Ok(());
        }

        for item in items {
            self.process(item, trigger, report).await?;
        }
        Ok(())
    }

    async fn process(
        &self,
        item: QueueItem,
        trigger: DrainTrigger,
        report: &mut KindDrainReport,
    ) -> Result<(), AppError> {
        let kind = item.kind();
        let id = item.id().clone();
        let started = Instant::now();

        match self
            .queue
            .update_status(kind, &id, QueueStatus::InProgress, None)
            .await
        {
            Ok(_) => {}
            // 別プロセスが先に取得した、または削除した
            Err(AppError::InvalidTransition(reason) | AppError::NotFound(reason)) => {
                report.skipped += 1;
                tracing::debug!(
                    target: "offline::sync",
                    kind = %kind,
                    id = %id,
                    reason = %reason,
                    "item already claimed elsewhere"
                );
                return Ok(());
            }
            Err(err) => return Err(err),
        }
        report.attempted += 1;

        match self.reconcile(&item).await {
            Ok(()) => {
                let updated = self
                    .queue
                    .update_status(kind, &id, QueueStatus::Completed, None)
                    .await?;
                report.completed += 1;
                self.metrics.record(
                    SyncOutcomeStatus::Success,
                    SyncOutcomeMetadata {
                        kind: Some(kind),
                        item_id: Some(id.to_string()),
                        trigger: Some(trigger),
                        retry_count: Some(updated.retry_count()),
                        duration_ms: Some(started.elapsed().as_millis() as u64),
                        error: None,
                    },
                );
                tracing::debug!(target: "offline::sync", kind = %kind, id = %id, "item reconciled");
            }
            Err(err) => {
                let message = err.to_string();
                let updated = self
                    .queue
                    .update_status(kind, &id, QueueStatus::Failed, Some(message.clone()))
                    .await?;
                report.failed += 1;
                self.metrics.record(
                    SyncOutcomeStatus::Failure,
                    SyncOutcomeMetadata {
                        kind: Some(kind),
                        item_id: Some(id.to_string()),
                        trigger: Some(trigger),
                        retry_count: Some(updated.retry_count()),
                        duration_ms: Some(started.elapsed().as_millis() as u64),
                        error: Some(message),
                    },
                );
                tracing::warn!(
                    target: "offline::sync",
                    kind = %kind,
                    id = %id,
                    retry_count = updated.retry_count(),
                    error = %err,
                    "item reconciliation failed"
                );
            }
        }
        Ok(())
    }

    async fn reconcile(&self, item: &QueueItem) -> Result<(), AppError> {
        match item {
            QueueItem::Photo(photo) => {
                photo::reconcile(&self.remote, &self.settings, photo).await
            }
            QueueItem::Note(note) => note::reconcile(&self.remote, note).await,
            QueueItem::TimeClock(entry) => {
                time_clock::reconcile(&self.remote, &self.settings, entry).await
            }
            QueueItem::VoiceNote(voice) => {
                voice_note::reconcile(&self.remote, &self.settings, voice).await
            }
        }
    }
}

/// Bounds one remote call; running out of time is an ordinary failure.
pub(super) async fn within<T, F>(limit: Duration, operation: &str, future: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout(format!(
            "{operation} did not finish within {}ms",
            limit.as_millis()
        ))),
    }
}
