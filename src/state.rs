use crate::application::ports::{IdentityProvider, LocalQueueStore};
use crate::application::services::{
    OfflineQueueService, QueueManager, ReconciliationService, ReconciliationSettings,
    RemoteServices,
};
use crate::infrastructure::network::ConnectivitySignal;
use crate::infrastructure::offline::{
    BroadcastSyncEmitter, OfflineSyncJob, QueueStatusPoller, SqliteQueueStore, SyncEventEmitter,
};
use crate::infrastructure::remote::{
    BackendClient, HttpObjectStorage, HttpRecordStore, HttpTranscriber, StaticIdentity,
};
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use std::sync::Arc;

const SYNC_EVENT_CAPACITY: usize = 32;

/// アプリケーション全体の状態を管理する構造体
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub queue: Arc<OfflineQueueService>,
    pub reconciler: Arc<ReconciliationService>,
    pub sync_job: Arc<OfflineSyncJob>,
    pub sync_events: Arc<BroadcastSyncEmitter>,
    pub status: Arc<QueueStatusPoller>,
    pub connectivity: ConnectivitySignal,
}

impl AppState {
    /// Opens the on-disk queue store and wires the HTTP backend from `config`.
    ///
    /// Fails with `LocalStorageUnavailable` when the store cannot be opened.
    pub async fn new(config: AppConfig) -> Result<Self, AppError> {
        config.validate()?;

        let store: Arc<dyn LocalQueueStore> = Arc::new(SqliteQueueStore::new(&config.database));
        store.open().await?;

        let remote = remote_services(&config)?;
        Ok(Self::assemble(config, store, remote))
    }

    /// Wires the services around an already constructed store and remote backend.
    pub fn assemble(
        config: AppConfig,
        store: Arc<dyn LocalQueueStore>,
        remote: RemoteServices,
    ) -> Self {
        let queue = Arc::new(OfflineQueueService::new(
            store,
            config.sync.retry_policy(),
        ));
        let reconciler = Arc::new(ReconciliationService::new(
            queue.clone() as Arc<dyn QueueManager>,
            remote,
            ReconciliationSettings::from_config(&config),
        ));

        let sync_events = Arc::new(BroadcastSyncEmitter::new(SYNC_EVENT_CAPACITY));
        let sync_job = OfflineSyncJob::create(
            reconciler.clone(),
            Some(sync_events.clone() as Arc<dyn SyncEventEmitter>),
            config.sync.auto_sync,
        );
        let status = Arc::new(QueueStatusPoller::new(
            queue.clone(),
            config.status.poll_interval(),
        ));

        Self {
            config,
            queue,
            reconciler,
            sync_job,
            sync_events,
            status,
            connectivity: ConnectivitySignal::default(),
        }
    }
}

pub fn remote_services(config: &AppConfig) -> Result<RemoteServices, AppError> {
    let client = BackendClient::new(&config.backend)?;
    let identity = StaticIdentity::from_config(config.identity.user_id.as_deref())
        .map_err(AppError::ConfigurationError)?;

    Ok(RemoteServices {
        storage: Arc::new(HttpObjectStorage::new(
            client.clone(),
            config.backend.photo_bucket.clone(),
        )),
        records: Arc::new(HttpRecordStore::new(client.clone())),
        transcriber: Arc::new(HttpTranscriber::new(
            client,
            config.backend.transcribe_function.clone(),
        )),
        identity: Arc::new(identity) as Arc<dyn IdentityProvider>,
    })
}
