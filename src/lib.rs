pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;

pub use application::{
    OfflineQueueService, QueueManager, ReconciliationService, ReconciliationSettings,
    RemoteServices,
};
pub use domain::{QueueCounts, QueueDraft, QueueItem, QueueItemId, QueueKind, QueueStatus};
pub use infrastructure::network::{ConnectivitySignal, HttpConnectivityProbe};
pub use infrastructure::offline::{OfflineSyncJob, QueueStatusPoller, SqliteQueueStore};
pub use shared::{AppConfig, AppError, Result};
pub use state::AppState;

/// ログ設定の初期化（`RUST_LOG` が優先）
pub fn init_logging(json: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fieldsync=debug,offline=debug,info"));

    let fmt_layer = if json {
        fmt::layer().json().with_current_span(false).boxed()
    } else {
        fmt::layer()
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|err| AppError::Internal(format!("Failed to initialise logging: {err}")))
}
