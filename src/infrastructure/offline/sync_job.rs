use crate::application::services::ReconciliationService;
use crate::domain::entities::offline::{DrainReport, DrainTrigger};
use crate::infrastructure::network::ConnectivitySignal;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

pub trait SyncEventEmitter: Send + Sync {
    fn emit_report(&self, report: &DrainReport) -> Result<(), String>;
    fn emit_failure(&self, trigger: DrainTrigger, message: &str) -> Result<(), String>;
}

#[derive(Debug, Clone)]
pub enum SyncEvent {
    Completed(DrainReport),
    Failed {
        trigger: DrainTrigger,
        message: String,
    },
}

/// Publishes drain outcomes to in-process subscribers (status poller, CLI).
pub struct BroadcastSyncEmitter {
    tx: broadcast::Sender<SyncEvent>,
}

impl BroadcastSyncEmitter {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.tx.subscribe()
    }
}

impl SyncEventEmitter for BroadcastSyncEmitter {
    fn emit_report(&self, report: &DrainReport) -> Result<(), String> {
        // 購読者がいないのはエラーではない
        let _ = self.tx.send(SyncEvent::Completed(report.clone()));
        Ok(())
    }

    fn emit_failure(&self, trigger: DrainTrigger, message: &str) -> Result<(), String> {
        let _ = self.tx.send(SyncEvent::Failed {
            trigger,
            message: message.to_string(),
        });
        Ok(())
    }
}

/// Connects the reconciliation driver to its triggers.
pub struct OfflineSyncJob {
    reconciler: Arc<ReconciliationService>,
    event_emitter: Option<Arc<dyn SyncEventEmitter>>,
    auto_sync: bool,
}

impl OfflineSyncJob {
    pub fn create(
        reconciler: Arc<ReconciliationService>,
        event_emitter: Option<Arc<dyn SyncEventEmitter>>,
        auto_sync: bool,
    ) -> Arc<Self> {
        Arc::new(Self {
            reconciler,
            event_emitter,
            auto_sync,
        })
    }

    pub fn auto_sync(&self) -> bool {
        self.auto_sync
    }

    pub fn trigger(self: &Arc<Self>, trigger: DrainTrigger) -> JoinHandle<DrainReport> {
        let job = Arc::clone(self);
        tokio::spawn(async move { job.run_once(trigger).await })
    }

    /// One guarded drain; concurrent calls queue behind the driver's gate.
    pub async fn run_once(&self, trigger: DrainTrigger) -> DrainReport {
        let report = self.reconciler.drain_all(trigger).await;

        let errors: Vec<String> = report
            .kinds
            .iter()
            .filter_map(|kind| {
                kind.error
                    .as_ref()
                    .map(|error| format!("{}: {error}", kind.kind))
            })
            .collect();

        if errors.is_empty() {
            self.emit_success(&report);
        } else {
            self.emit_failure(trigger, &errors.join("; "));
        }
        report
    }

    /// Drains once at start when online, then on every offline→online edge until
    /// `shutdown` flips to `true`.
    pub async fn run(self: Arc<Self>, connectivity: ConnectivitySignal, mut shutdown: watch::Receiver<bool>) {
        if !self.auto_sync {
            tracing::info!(target: "offline::sync", "automatic sync disabled");
            return;
        }

        let mut online_rx = connectivity.subscribe();
        if *online_rx.borrow_and_update() {
            self.run_once(DrainTrigger::AppStart).await;
        }

        loop {
            tokio::select! {
                changed = online_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    // 同じ値は通知されないので、online での通知は必ず offline からの復帰
                    if *online_rx.borrow_and_update() {
                        self.run_once(DrainTrigger::BecameOnline).await;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::debug!(target: "offline::sync", "sync job stopped");
    }

    fn emit_success(&self, report: &DrainReport) {
        if let Some(emitter) = &self.event_emitter
            && let Err(err) = emitter.emit_report(report)
        {
            tracing::warn!(
                target: "offline::sync",
                error = %err,
                "failed to emit drain completion event"
            );
        }
    }

    fn emit_failure(&self, trigger: DrainTrigger, message: &str) {
        if let Some(emitter) = &self.event_emitter
            && let Err(err) = emitter.emit_failure(trigger, message)
        {
            tracing::warn!(
                target: "offline::sync",
                error = %err,
                "failed to emit drain failure event"
            );
        }
        tracing::error!(
            target: "offline::sync",
            trigger = %trigger,
            error = message,
            "offline drain finished with local errors"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        IdentityProvider, LocalQueueStore, ObjectStorage, RecordFilter, RecordStore, Transcriber,
    };
    use crate::application::services::{
        OfflineQueueService, QueueManager, ReconciliationSettings, RemoteServices,
    };
    use crate::domain::entities::offline::TimeClockDraft;
    use crate::domain::value_objects::offline::{
        ClockAction, QueueKind, QueueStatus, RemoteRecordId, RetryPolicy, UserId,
    };
    use crate::infrastructure::offline::SqliteQueueStore;
    use crate::shared::error::AppError;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingRemote {
        updates: AtomicUsize,
    }

    #[async_trait]
    impl RecordStore for CountingRemote {
        async fn insert(&self, _table: &str, _record: Value) -> Result<(), AppError> {
            Ok(())
        }

        async fn update(
            &self,
            _table: &str,
            _filter: RecordFilter,
            _patch: Value,
        ) -> Result<(), AppError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[async_trait]
    impl ObjectStorage for CountingRemote {
        async fn upload(
            &self,
            path: &str,
            _bytes: Vec<u8>,
            _content_type: Option<&str>,
        ) -> Result<String, AppError> {
            Ok(path.to_string())
        }

        fn public_url(&self, path: &str) -> String {
            path.to_string()
        }

        async fn remove(&self, _paths: &[String]) -> Result<(), AppError> {
            Ok(())
        }
    }

    #[async_trait]
    impl Transcriber for CountingRemote {
        async fn transcribe(&self, _audio: &str, _mime: &str) -> Result<String, AppError> {
            Ok("transcript".into())
        }
    }

    impl IdentityProvider for CountingRemote {
        fn current_user_id(&self) -> Option<UserId> {
            UserId::new("U1".into()).ok()
        }
    }

    async fn setup() -> (Arc<OfflineQueueService>, Arc<CountingRemote>, Arc<ReconciliationService>) {
        let store: Arc<dyn LocalQueueStore> = Arc::new(SqliteQueueStore::in_memory());
        let queue = Arc::new(OfflineQueueService::new(store, RetryPolicy::unbounded()));
        let remote = Arc::new(CountingRemote::default());
        let services = RemoteServices {
            storage: remote.clone(),
            records: remote.clone(),
            transcriber: remote.clone(),
            identity: remote.clone(),
        };
        let reconciler = Arc::new(ReconciliationService::new(
            queue.clone(),
            services,
            ReconciliationSettings::default(),
        ));
        (queue, remote, reconciler)
    }

    async fn enqueue_clock_out(queue: &OfflineQueueService) {
        queue
            .enqueue_time_clock(TimeClockDraft {
                entry_id: RemoteRecordId::new("E1".into()).unwrap(),
                user_id: UserId::new("U1".into()).unwrap(),
                action: ClockAction::ClockOut,
                clock_out_time: None,
                total_hours: None,
            })
            .await
            .unwrap();
    }

    async fn wait_for_completed(queue: &OfflineQueueService, expected: usize) {
        for _ in 0..200 {
            let done = queue
                .list_all(QueueKind::TimeClock)
                .await
                .unwrap()
                .iter()
                .filter(|item| item.status() == QueueStatus::Completed)
                .count();
            if done == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("queue did not reach {expected} completed items");
    }

    #[tokio::test]
    async fn test_run_drains_on_start_and_on_online_edge() {
        let (queue, remote, reconciler) = setup().await;
        enqueue_clock_out(&queue).await;

        let emitter = Arc::new(BroadcastSyncEmitter::new(8));
        let mut events = emitter.subscribe();
        let job = OfflineSyncJob::create(reconciler, Some(emitter.clone()), true);

        let connectivity = ConnectivitySignal::new(true);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(job.clone().run(connectivity.clone(), shutdown_rx));

        match events.recv().await.unwrap() {
            SyncEvent::Completed(report) => {
                assert_eq!(report.trigger, DrainTrigger::AppStart);
                assert_eq!(report.completed(), 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        connectivity.set_online(false);
        enqueue_clock_out(&queue).await;
        connectivity.set_online(true);

        match events.recv().await.unwrap() {
            SyncEvent::Completed(report) => {
                assert_eq!(report.trigger, DrainTrigger::BecameOnline);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        wait_for_completed(&queue, 2).await;
        assert_eq!(remote.updates.load(Ordering::SeqCst), 2);

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_run_waits_while_offline() {
        let (queue, remote, reconciler) = setup().await;
        enqueue_clock_out(&queue).await;

        let job = OfflineSyncJob::create(reconciler, None, true);
        let connectivity = ConnectivitySignal::new(false);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(job.run(connectivity.clone(), shutdown_rx));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(remote.updates.load(Ordering::SeqCst), 0);

        connectivity.set_online(true);
        wait_for_completed(&queue, 1).await;

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_auto_sync_disabled_returns_immediately() {
        let (queue, remote, reconciler) = setup().await;
        enqueue_clock_out(&queue).await;

        let job = OfflineSyncJob::create(reconciler, None, false);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        job.run(ConnectivitySignal::new(true), shutdown_rx).await;

        assert_eq!(remote.updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_trigger_spawns_a_manual_drain() {
        let (queue, _remote, reconciler) = setup().await;
        enqueue_clock_out(&queue).await;

        let job = OfflineSyncJob::create(reconciler, None, true);
        let report = job.trigger(DrainTrigger::Manual).await.unwrap();

        assert_eq!(report.trigger, DrainTrigger::Manual);
        assert_eq!(report.completed(), 1);
    }
}
